//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use glowishii_core::catalog::{self, ALL_CATEGORIES};
use glowishii_core::{Product, ProductId, ProductQuery, SortOrder};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Number of stars in a rating row.
const STAR_COUNT: u8 = 5;

/// Product card data for listing grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub has_discount: bool,
    pub original_price: String,
    pub discount_percent: u32,
    pub image: String,
    pub in_stock: bool,
    pub fragrances: String,
    pub stars: Vec<&'static str>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.effective_price().display(),
            has_discount: product.has_discount(),
            original_price: product.price.display(),
            discount_percent: product.discount_percentage(),
            image: product.primary_image().unwrap_or_default().to_string(),
            in_stock: product.in_stock,
            fragrances: product.fragrances.join(", "),
            stars: stars(product),
        }
    }
}

/// CSS class for each star in a rating row: `on` when filled.
pub fn stars(product: &Product) -> Vec<&'static str> {
    star_row(product.filled_stars())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
fn review_stars(ratings: f64) -> u8 {
    ratings.clamp(0.0, f64::from(STAR_COUNT)).floor() as u8
}

fn star_row(filled: u8) -> Vec<&'static str> {
    (0..STAR_COUNT)
        .map(|i| if i < filled { "on" } else { "off" })
        .collect()
}

/// A dropdown option.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Review display data.
#[derive(Clone)]
pub struct ReviewView {
    pub comment: String,
    pub stars: Vec<&'static str>,
    pub date: String,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub card: ProductCardView,
    pub description: String,
    pub images: Vec<String>,
    pub size: String,
    pub burn_time: String,
    pub ingredients: Vec<String>,
    pub fragrance_list: Vec<String>,
    pub rating: String,
    pub reviews: Vec<ReviewView>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            card: ProductCardView::from(product),
            description: product.description.clone(),
            images: product.images.clone(),
            size: product.size.clone(),
            burn_time: product.burn_time.clone().unwrap_or_default(),
            ingredients: product.ingredients.clone(),
            fragrance_list: product.fragrances.clone(),
            rating: format!("{:.1}", product.avg_rating),
            reviews: product
                .reviews
                .iter()
                .map(|review| ReviewView {
                    comment: review.comment.clone(),
                    stars: star_row(review_stars(review.ratings)),
                    date: review
                        .created_at
                        .map(|at| at.format("%d %b %Y").to_string())
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductCardView>,
    pub search: String,
    pub categories: Vec<OptionView>,
    pub sorts: Vec<OptionView>,
    pub total: usize,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductDetailView,
}

/// Display product listing with search, category filter and sort.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(params): Query<ListingParams>,
) -> Result<ProductsIndexTemplate> {
    let all = state.api().list_products().await?;
    let query = ProductQuery::from_params(
        params.q.as_deref(),
        params.category.as_deref(),
        params.sort.as_deref(),
    );

    let products: Vec<ProductCardView> = query
        .apply(&all)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    let selected_category = query.category_or_all();
    let categories = std::iter::once(ALL_CATEGORIES.to_string())
        .chain(catalog::categories(&all))
        .map(|value| OptionView {
            label: if value == ALL_CATEGORIES {
                "All categories".to_string()
            } else {
                value.clone()
            },
            selected: value == selected_category,
            value,
        })
        .collect();

    let sorts = SortOrder::ALL
        .iter()
        .map(|sort| OptionView {
            value: sort.as_str().to_string(),
            label: sort.label().to_string(),
            selected: *sort == query.sort,
        })
        .collect();

    Ok(ProductsIndexTemplate {
        page,
        total: products.len(),
        products,
        search: query.search,
        categories,
        sorts,
    })
}

/// Display product detail page.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let id = ProductId::parse(&id).map_err(|_| AppError::NotFound("product".to_string()))?;
    let product = state.api().get_product(&id).await?;

    Ok(ProductShowTemplate {
        page,
        product: ProductDetailView::from(&product),
    })
}
