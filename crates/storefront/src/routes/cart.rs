//! Cart route handlers.
//!
//! The cart resource lives on the shop API, per user. The session holds a
//! ledger copy so the badge and cart page render without a round trip.
//! Mutations are applied to the ledger first, sent to the API, then the
//! ledger is replaced by the server's cart either way.

use std::future::Future;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowishii_core::{Cart, CartLine, ProductId};

use crate::api::ApiError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, PageContext, RequireAuth, load_cart, push_flash, store_cart};
use crate::models::{CurrentUser, Flash};
use crate::routes::safe_redirect;
use crate::state::AppState;

/// Upper bound on units added by one form post.
pub const MAX_ADD_QUANTITY: u32 = 10;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub fragrances: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    pub in_stock: bool,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id.to_string(),
            name: line.name.clone(),
            fragrances: line.fragrances.join(", "),
            image: line.image.clone().unwrap_or_default(),
            unit_price: line.unit_price.display(),
            quantity: line.quantity,
            line_total: line.line_total.display(),
            in_stock: line.in_stock,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            subtotal: cart.total().display(),
            // Shipping is free, so the order total is the ledger total.
            total: cart.total().display(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
    /// Local path to return to.
    pub next: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Replace the session ledger with the server's cart.
///
/// If the API is unreachable the ledger is kept as is and returned.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn refresh_cart(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
) -> Result<Cart> {
    match state.api().get_cart(&user.api_session).await {
        Ok(cart) => {
            store_cart(session, &cart).await?;
            Ok(cart)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to refresh cart from API");
            Ok(load_cart(session).await)
        }
    }
}

/// Apply a cart mutation optimistically, send it, then resync.
async fn apply_change<F>(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
    optimistic: impl FnOnce(&mut Cart),
    remote: F,
    success: Option<String>,
) -> Result<Cart>
where
    F: Future<Output = std::result::Result<(), ApiError>>,
{
    let mut cart = load_cart(session).await;
    optimistic(&mut cart);
    store_cart(session, &cart).await?;

    match remote.await {
        Ok(()) => {
            if let Some(message) = success {
                push_flash(session, Flash::success(message)).await;
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user.id, "Cart update rejected, resynchronising");
            push_flash(session, Flash::error(e.user_message())).await;
        }
    }

    refresh_cart(state, session, user).await
}

/// Display cart page.
#[instrument(skip(state, session, user, page))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    mut page: PageContext,
    session: Session,
) -> Result<CartShowTemplate> {
    let cart = match &user {
        Some(user) => refresh_cart(&state, &session, user).await?,
        None => Cart::default(),
    };
    page.cart_count = cart.item_count();

    Ok(CartShowTemplate {
        page,
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart.
///
/// The API adds one unit per call, so a quantity of `n` is `n` calls.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let id = ProductId::parse(&form.product_id)
        .map_err(|_| AppError::BadRequest("missing product".to_string()))?;
    let quantity = form.quantity.unwrap_or(1).clamp(1, MAX_ADD_QUANTITY);
    let product = state.api().get_product(&id).await?;
    let back = safe_redirect(form.next.as_deref(), "/cart");

    if !product.in_stock {
        push_flash(&session, Flash::error(format!("{} is out of stock", product.name))).await;
        return Ok(Redirect::to(&back));
    }

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));

    let api = state.api();
    let remote = async {
        for _ in 0..quantity {
            api.add_to_cart(&user.api_session, &id).await?;
        }
        Ok::<(), ApiError>(())
    };
    apply_change(
        &state,
        &session,
        &user,
        |cart| cart.add(&product, quantity),
        remote,
        Some(format!("{} added to cart", product.name)),
    )
    .await?;

    Ok(Redirect::to(&back))
}

/// Add one unit of a line.
#[instrument(skip(state, session, user))]
pub async fn increment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_line_id(&id)?;
    apply_change(
        &state,
        &session,
        &user,
        |cart| cart.increment(&id),
        state.api().add_to_cart(&user.api_session, &id),
        None,
    )
    .await?;
    Ok(Redirect::to("/cart"))
}

/// Remove one unit of a line; the line goes away at zero.
#[instrument(skip(state, session, user))]
pub async fn decrement(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_line_id(&id)?;
    apply_change(
        &state,
        &session,
        &user,
        |cart| cart.decrement(&id),
        state.api().remove_one_from_cart(&user.api_session, &id),
        None,
    )
    .await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line entirely.
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_line_id(&id)?;
    apply_change(
        &state,
        &session,
        &user,
        |cart| cart.remove(&id),
        state.api().remove_from_cart(&user.api_session, &id),
        Some("Item removed from cart".to_string()),
    )
    .await?;
    Ok(Redirect::to("/cart"))
}

/// Cart badge count as plain text.
#[instrument(skip(session))]
pub async fn count(session: Session) -> String {
    load_cart(&session).await.item_count().to_string()
}

fn parse_line_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|_| AppError::NotFound("cart line".to_string()))
}

#[cfg(test)]
mod tests {
    use glowishii_core::Product;

    use super::*;

    #[test]
    fn test_cart_view_formats_totals() {
        let product: Product = serde_json::from_str(
            r#"{"_id": "p1", "name": "Sandal Glow", "price": 450, "discountedPrice": 399,
                "fragrances": ["Sandalwood", "Vanilla"]}"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));
        let mut cart = Cart::default();
        cart.add(&product, 2);

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "₹798.00");
        assert_eq!(view.total, "₹798.00");
        let line = view.lines.first().unwrap_or_else(|| panic!("no line"));
        assert_eq!(line.unit_price, "₹399.00");
        assert_eq!(line.fragrances, "Sandalwood, Vanilla");
    }
}
