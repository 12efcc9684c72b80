//! Back-office product handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowishii_core::{Product, ProductForm, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, push_flash};
use crate::models::Flash;
use crate::routes::products::ProductDetailView;
use crate::routes::sentence;
use crate::state::AppState;

/// Product table search parameters.
#[derive(Debug, Deserialize)]
pub struct AdminProductsQuery {
    pub q: Option<String>,
}

/// Product row for the back-office table.
#[derive(Debug, Clone)]
pub struct AdminProductView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub discounted_price: String,
    pub status: String,
    pub special: bool,
    pub image: String,
}

impl From<&Product> for AdminProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            discounted_price: product
                .discounted_price
                .filter(|_| product.has_discount())
                .map(|p| p.display())
                .unwrap_or_default(),
            status: product.status().as_str().to_string(),
            special: product.special,
            image: product.primary_image().unwrap_or_default().to_string(),
        }
    }
}

/// Product table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct AdminProductsTemplate {
    pub page: PageContext,
    pub products: Vec<AdminProductView>,
    pub search: String,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/show.html")]
pub struct AdminProductShowTemplate {
    pub page: PageContext,
    pub product: ProductDetailView,
    pub status: String,
    pub special: bool,
}

/// Product editor template, shared by create and edit.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct AdminProductFormTemplate {
    pub page: PageContext,
    pub title: String,
    pub action: String,
    pub form: ProductForm,
    pub in_stock: bool,
    pub special: bool,
    pub error: String,
}

impl AdminProductFormTemplate {
    fn new(page: PageContext, title: &str, action: String, form: ProductForm, error: String) -> Self {
        Self {
            page,
            title: title.to_string(),
            action,
            in_stock: form.in_stock.is_some(),
            special: form.special.is_some(),
            form,
            error,
        }
    }
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|_| AppError::NotFound("product".to_string()))
}

fn matches_search(product: &Product, search: &str) -> bool {
    let needle = search.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product.category.to_lowercase().contains(&needle)
}

/// Display the product table.
#[instrument(skip(state, _admin, page))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    page: PageContext,
    Query(query): Query<AdminProductsQuery>,
) -> Result<AdminProductsTemplate> {
    let search = query.q.unwrap_or_default().trim().to_string();
    let mut products = state.api().list_products().await?;
    products.sort_by_key(|p| p.name.to_lowercase());

    Ok(AdminProductsTemplate {
        page,
        products: products
            .iter()
            .filter(|p| search.is_empty() || matches_search(p, &search))
            .map(AdminProductView::from)
            .collect(),
        search,
    })
}

/// Display the new product form.
pub async fn new(RequireAdmin(_admin): RequireAdmin, page: PageContext) -> AdminProductFormTemplate {
    AdminProductFormTemplate::new(
        page,
        "New product",
        "/admin/products".to_string(),
        ProductForm::new_product(),
        String::new(),
    )
}

/// Create a product.
#[instrument(skip(state, admin, page, session, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let action = "/admin/products".to_string();
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            let error = sentence(&e);
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                AdminProductFormTemplate::new(page, "New product", action, form, error),
            )
                .into_response());
        }
    };

    match state.api().create_product(&admin.api_session, &draft).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, admin_id = %admin.id, "Product created");
            push_flash(&session, Flash::success("Product created successfully")).await;
            Ok(Redirect::to(&format!("/admin/products/{}", product.id)).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, admin_id = %admin.id, "Product create rejected");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                AdminProductFormTemplate::new(page, "New product", action, form, e.user_message()),
            )
                .into_response())
        }
    }
}

/// Display one product.
#[instrument(skip(state, _admin, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<AdminProductShowTemplate> {
    let id = parse_product_id(&id)?;
    let product = state.api().get_product(&id).await?;

    Ok(AdminProductShowTemplate {
        page,
        status: product.status().as_str().to_string(),
        special: product.special,
        product: ProductDetailView::from(&product),
    })
}

/// Display the edit form for a product.
#[instrument(skip(state, _admin, page))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<AdminProductFormTemplate> {
    let id = parse_product_id(&id)?;
    let product = state.api().get_product(&id).await?;

    Ok(AdminProductFormTemplate::new(
        page,
        "Edit product",
        format!("/admin/products/{id}"),
        ProductForm::from_product(&product),
        String::new(),
    ))
}

/// Update a product.
#[instrument(skip(state, admin, page, session, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let action = format!("/admin/products/{id}");
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            let error = sentence(&e);
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                AdminProductFormTemplate::new(page, "Edit product", action, form, error),
            )
                .into_response());
        }
    };

    match state.api().update_product(&admin.api_session, &id, &draft).await {
        Ok(_) => {
            tracing::info!(product_id = %id, admin_id = %admin.id, "Product updated");
            push_flash(&session, Flash::success("Product updated successfully")).await;
            Ok(Redirect::to(&action).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Product update rejected");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                AdminProductFormTemplate::new(page, "Edit product", action, form, e.user_message()),
            )
                .into_response())
        }
    }
}

/// Delete a product.
#[instrument(skip(state, admin, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_product_id(&id)?;

    match state.api().delete_product(&admin.api_session, &id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, admin_id = %admin.id, "Product deleted");
            push_flash(&session, Flash::success("Product deleted")).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Product delete rejected");
            push_flash(&session, Flash::error(e.user_message())).await;
        }
    }
    Ok(Redirect::to("/admin/products"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(json: &str) -> Product {
        serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_row_hides_discount_that_is_not_lower() {
        let p = product(
            r#"{"_id": "p1", "name": "Amber Glow", "category": "Jar", "price": 500,
                "discountedPrice": 500, "images": ["https://cdn.example/a.jpg"]}"#,
        );
        let row = AdminProductView::from(&p);
        assert_eq!(row.price, "₹500.00");
        assert!(row.discounted_price.is_empty());
        assert_eq!(row.status, "active");
        assert_eq!(row.image, "https://cdn.example/a.jpg");
    }

    #[test]
    fn test_search_matches_name_or_category() {
        let p = product(r#"{"_id": "p1", "name": "Amber Glow", "category": "Pillar", "price": 500}"#);
        assert!(matches_search(&p, "amber"));
        assert!(matches_search(&p, "PILL"));
        assert!(!matches_search(&p, "lavender"));
    }

    #[test]
    fn test_form_template_reads_checkboxes() {
        let page = PageContext::new(None, &glowishii_core::Cart::default(), None);
        let template = AdminProductFormTemplate::new(
            page,
            "New product",
            "/admin/products".to_string(),
            ProductForm::new_product(),
            String::new(),
        );
        assert!(template.in_stock);
        assert!(!template.special);
    }
}
