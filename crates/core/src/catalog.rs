//! Filtering and sorting of the product listing.

use core::fmt;
use core::str::FromStr;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Sort order for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortOrder {
    pub const ALL: [Self; 4] = [Self::Name, Self::PriceLow, Self::PriceHigh, Self::Rating];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
        }
    }

    /// Label for the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Rating => "Rating",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::PriceLow => a.effective_price().cmp(&b.effective_price()),
            Self::PriceHigh => b.effective_price().cmp(&a.effective_price()),
            Self::Rating => b.avg_rating.total_cmp(&a.avg_rating),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = core::convert::Infallible;

    /// Unknown values fall back to [`SortOrder::Name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s.trim())
            .unwrap_or_default())
    }
}

/// Listing filters taken from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: String,
    /// Exact category, or `None` for all.
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl ProductQuery {
    /// Build a query from raw query-string values.
    #[must_use]
    pub fn from_params(search: Option<&str>, category: Option<&str>, sort: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
            .map(str::to_string);
        Self {
            search: search.unwrap_or_default().trim().to_string(),
            category,
            sort: sort.and_then(|s| s.parse().ok()).unwrap_or_default(),
        }
    }

    /// Whether a product passes the search and category filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && &product.category != category
        {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product
                .fragrances
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))
    }

    /// Filter and sort products.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut matched: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }

    /// The category filter as shown in the dropdown.
    #[must_use]
    pub fn category_or_all(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_CATEGORIES)
    }
}

/// Distinct categories, sorted.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.trim())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// The first `n` featured products.
#[must_use]
pub fn featured(products: &[Product], n: usize) -> Vec<&Product> {
    products.iter().filter(|p| p.special).take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::tests::candle;

    fn catalog() -> Vec<Product> {
        let mut lavender = candle("1", "lavender dream", 600, Some(450));
        lavender.category = "Jar".to_string();
        lavender.fragrances = vec!["Lavender".to_string(), "Chamomile".to_string()];
        lavender.avg_rating = 4.2;

        let mut cedar = candle("2", "Cedar Hearth", 500, None);
        cedar.fragrances = vec!["Cedarwood".to_string()];
        cedar.avg_rating = 4.8;
        cedar.special = true;

        let mut bloom = candle("3", "Bloom", 900, Some(1000));
        bloom.category = "Jar".to_string();
        bloom.fragrances = vec!["Rose".to_string(), "Vanilla".to_string()];
        bloom.avg_rating = 3.9;
        bloom.special = true;

        vec![lavender, cedar, bloom]
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_default_sort_is_name_case_insensitive() {
        let products = catalog();
        let listed = ProductQuery::default().apply(&products);
        assert_eq!(names(&listed), ["Bloom", "Cedar Hearth", "lavender dream"]);
    }

    #[test]
    fn test_search_matches_name_or_fragrance() {
        let products = catalog();
        let by_fragrance = ProductQuery::from_params(Some("VANILLA"), None, None).apply(&products);
        assert_eq!(names(&by_fragrance), ["Bloom"]);

        let by_name = ProductQuery::from_params(Some("hearth"), None, None).apply(&products);
        assert_eq!(names(&by_name), ["Cedar Hearth"]);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        let jars = ProductQuery::from_params(None, Some("Jar"), None).apply(&products);
        assert_eq!(names(&jars), ["Bloom", "lavender dream"]);

        let all = ProductQuery::from_params(None, Some("all"), None);
        assert_eq!(all.category, None);
        assert_eq!(all.apply(&products).len(), 3);
    }

    #[test]
    fn test_price_sorts_use_effective_price() {
        let products = catalog();
        let low = ProductQuery::from_params(None, None, Some("price-low")).apply(&products);
        assert_eq!(names(&low), ["lavender dream", "Cedar Hearth", "Bloom"]);

        let high = ProductQuery::from_params(None, None, Some("price-high")).apply(&products);
        assert_eq!(names(&high), ["Bloom", "Cedar Hearth", "lavender dream"]);
    }

    #[test]
    fn test_rating_sort_highest_first() {
        let products = catalog();
        let rated = ProductQuery::from_params(None, None, Some("rating")).apply(&products);
        assert_eq!(names(&rated), ["Cedar Hearth", "lavender dream", "Bloom"]);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_name() {
        assert_eq!("cheapest".parse::<SortOrder>(), Ok(SortOrder::Name));
    }

    #[test]
    fn test_categories_and_featured() {
        let products = catalog();
        assert_eq!(categories(&products), ["Jar", "Pillar"]);
        assert_eq!(names(&featured(&products, 3)), ["Cedar Hearth", "Bloom"]);
        assert_eq!(featured(&products, 1).len(), 1);
    }
}
