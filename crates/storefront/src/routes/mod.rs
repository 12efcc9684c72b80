//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (shop API + session database)
//!
//! # Products
//! GET  /products               - Listing (?q=&category=&sort=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (sign-in required for changes)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/{id}/increment    - One more unit
//! POST /cart/{id}/decrement    - One fewer unit
//! POST /cart/{id}/remove       - Remove line
//! GET  /cart/count             - Cart count badge (plain text)
//!
//! # Checkout and orders (sign-in required)
//! GET  /checkout               - Address and payment selection
//! POST /checkout               - Place order
//! GET  /orders                 - Order history (?status=)
//! GET  /orders/{id}            - Order detail
//! POST /orders/{id}/reorder    - Put an order's items back in the cart
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /signup                 - Signup page
//! POST /signup                 - Signup action
//! GET  /verify-email           - OTP page
//! POST /verify-email           - OTP action
//! POST /verify-email/resend    - Send a fresh OTP
//! POST /logout                 - Logout action
//!
//! # Profile (sign-in required)
//! GET  /profile                         - Profile and saved addresses
//! POST /profile/addresses               - Add address
//! GET  /profile/addresses/{id}/edit     - Edit address form
//! POST /profile/addresses/{id}          - Update address
//! POST /profile/addresses/{id}/delete   - Delete address
//!
//! # JSON helpers
//! GET  /api/pincode/{code}     - City/state lookup
//!
//! # Back-office (admin only)
//! GET  /admin                           - Redirect to products
//! GET  /admin/products                  - Product table
//! GET  /admin/products/new              - New product form
//! POST /admin/products                  - Create product
//! GET  /admin/products/{id}             - Product details
//! GET  /admin/products/{id}/edit        - Edit product form
//! POST /admin/products/{id}             - Update product
//! POST /admin/products/{id}/delete      - Delete product
//! GET  /admin/orders                    - Order table
//! GET  /admin/orders/{id}               - Order details
//! POST /admin/orders/{id}/status        - Change order status
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod orders;
pub mod products;
pub mod profile;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{MethodRouter, get, post},
};

use crate::filters;
use crate::middleware::{PageContext, RateLimiterLayer, api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Rate limiters for sensitive routes. `None` leaves a group unlimited.
#[derive(Clone, Default)]
pub struct RateLimits {
    pub auth: Option<RateLimiterLayer>,
    pub api: Option<RateLimiterLayer>,
}

impl RateLimits {
    /// Limits used when serving real traffic.
    #[must_use]
    pub fn production() -> Self {
        Self {
            auth: Some(auth_rate_limiter()),
            api: Some(api_rate_limiter()),
        }
    }
}

fn limited(
    route: MethodRouter<AppState>,
    limiter: Option<&RateLimiterLayer>,
) -> MethodRouter<AppState> {
    match limiter {
        Some(layer) => route.layer(layer.clone()),
        None => route,
    }
}

/// Resolve a user-supplied return path, accepting only local paths.
#[must_use]
pub fn safe_redirect(next: Option<&str>, fallback: &str) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Render a validation error as a sentence for a flash message.
#[must_use]
pub fn sentence(error: &impl std::fmt::Display) -> String {
    let message = error.to_string();
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Create the auth routes router.
pub fn auth_routes(limits: &RateLimits) -> Router<AppState> {
    let limiter = limits.auth.as_ref();
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(limited(post(auth::login), limiter)),
        )
        .route(
            "/signup",
            get(auth::signup_page).merge(limited(post(auth::signup), limiter)),
        )
        .route(
            "/verify-email",
            get(auth::verify_page).merge(limited(post(auth::verify), limiter)),
        )
        .route(
            "/verify-email/resend",
            limited(post(auth::resend), limiter),
        )
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/count", get(cart::count))
        .route("/{id}/increment", post(cart::increment))
        .route("/{id}/decrement", post(cart::decrement))
        .route("/{id}/remove", post(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/reorder", post(orders::reorder))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show))
        .route("/addresses", post(profile::create_address))
        .route("/addresses/{id}", post(profile::update_address))
        .route("/addresses/{id}/edit", get(profile::edit_address))
        .route("/addresses/{id}/delete", post(profile::delete_address))
}

/// Create the JSON helper routes router.
pub fn api_routes(limits: &RateLimits) -> Router<AppState> {
    Router::new().route(
        "/pincode/{code}",
        limited(get(api::pincode), limits.api.as_ref()),
    )
}

/// Create the back-office routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route(
            "/products",
            get(admin::products::index).post(admin::products::create),
        )
        .route("/products/new", get(admin::products::new))
        .route(
            "/products/{id}",
            get(admin::products::show).post(admin::products::update),
        )
        .route("/products/{id}/edit", get(admin::products::edit))
        .route("/products/{id}/delete", post(admin::products::delete))
        .route("/orders", get(admin::orders::index))
        .route("/orders/{id}", get(admin::orders::show))
        .route("/orders/{id}/status", post(admin::orders::update_status))
}

/// Create all page routes for the storefront.
pub fn routes(limits: &RateLimits) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            get(checkout::show).post(checkout::place_order),
        )
        .nest("/orders", order_routes())
        .nest("/profile", profile_routes())
        .nest("/api", api_routes(limits))
        .nest("/admin", admin_routes())
        .merge(auth_routes(limits))
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
}

/// Fallback for unknown paths.
pub async fn not_found(page: PageContext) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate { page })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect_accepts_local_paths() {
        assert_eq!(safe_redirect(Some("/products/p1"), "/cart"), "/products/p1");
        assert_eq!(safe_redirect(None, "/cart"), "/cart");
    }

    #[test]
    fn test_sentence_capitalizes() {
        assert_eq!(sentence(&"pincode must be exactly 6 digits"), "Pincode must be exactly 6 digits");
        assert_eq!(sentence(&""), "");
    }

    #[test]
    fn test_safe_redirect_rejects_offsite_targets() {
        assert_eq!(safe_redirect(Some("//evil.example"), "/cart"), "/cart");
        assert_eq!(safe_redirect(Some("https://evil.example"), "/cart"), "/cart");
        assert_eq!(safe_redirect(Some("/\\evil.example"), "/cart"), "/cart");
        assert_eq!(safe_redirect(Some("/\t/evil.example"), "/cart"), "/cart");
        assert_eq!(safe_redirect(Some("/orders\nSet-Cookie: x=1"), "/cart"), "/cart");
    }
}
