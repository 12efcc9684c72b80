//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use glowishii_core::catalog;

use crate::filters;
use crate::middleware::PageContext;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Number of products in the featured strip.
const FEATURED_COUNT: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub featured: Vec<ProductCardView>,
}

/// Display the home page.
///
/// Uses the API's featured list, falling back to special products from the
/// full catalog. The page still renders if both fail.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> HomeTemplate {
    let featured = match state.api().featured_products().await {
        Ok(products) => products
            .iter()
            .take(FEATURED_COUNT)
            .map(ProductCardView::from)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch featured products");
            match state.api().list_products().await {
                Ok(products) => catalog::featured(&products, FEATURED_COUNT)
                    .into_iter()
                    .map(ProductCardView::from)
                    .collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch catalog for home page");
                    Vec::new()
                }
            }
        }
    };

    HomeTemplate { page, featured }
}
