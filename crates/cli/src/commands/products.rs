//! Catalog inspection.

use glowishii_core::{Product, ProductQuery};

use super::{CommandError, api_client};

fn row(product: &Product) -> String {
    let price = if product.has_discount() {
        format!("{} (was {})", product.effective_price(), product.price)
    } else {
        product.price.to_string()
    };
    format!(
        "{:<26} {:<28} {:<12} {:<22} {}",
        product.id.as_str(),
        product.name,
        product.category,
        price,
        product.status().as_str()
    )
}

/// Print the catalog, optionally limited to one category.
pub async fn list(category: Option<&str>) -> Result<(), CommandError> {
    let api = api_client()?;
    let products = api.list_products().await?;
    let query = ProductQuery::from_params(None, category, Some("name"));
    let shown = query.apply(&products);

    #[allow(clippy::print_stdout)]
    {
        for product in &shown {
            println!("{}", row(product));
        }
    }
    tracing::info!(shown = shown.len(), total = products.len(), "Listed products");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_shows_discount_and_status() {
        let product: Product = serde_json::from_str(
            r#"{"_id": "p1", "name": "Amber Glow", "category": "Jar",
                "price": 500, "discountedPrice": 450, "inStock": false}"#,
        )
        .unwrap();

        let line = row(&product);
        assert!(line.starts_with("p1 "));
        assert!(line.contains("₹450.00 (was ₹500.00)"));
        assert!(line.ends_with("inactive"));
    }
}
