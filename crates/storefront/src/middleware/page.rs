//! Per-page layout context: who is signed in, the cart badge, and the flash.
//!
//! Every full-page template embeds a [`PageContext`] so the shared layout can
//! render the header and toasts.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use glowishii_core::Cart;

use crate::models::{CurrentUser, Flash, session_keys};

/// Layout data for the shared page shell.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub signed_in: bool,
    pub user_name: String,
    pub is_admin: bool,
    pub cart_count: u32,
    pub has_flash: bool,
    pub flash_kind: String,
    pub flash_message: String,
}

impl PageContext {
    /// Build from session contents.
    #[must_use]
    pub fn new(user: Option<&CurrentUser>, cart: &Cart, flash: Option<Flash>) -> Self {
        let (has_flash, flash_kind, flash_message) = match flash {
            Some(flash) => (true, flash.kind.as_str().to_string(), flash.message),
            None => (false, String::new(), String::new()),
        };
        Self {
            signed_in: user.is_some(),
            user_name: user.map(|u| u.first_name().to_string()).unwrap_or_default(),
            is_admin: user.is_some_and(|u| u.is_admin),
            cart_count: cart.item_count(),
            has_flash,
            flash_kind,
            flash_message,
        }
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            tracing::warn!("Session not found in request extensions - layer may be missing");
            return Ok(Self::default());
        };

        let user: Option<CurrentUser> = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let cart = load_cart(session).await;
        let flash = take_flash(session).await;

        Ok(Self::new(user.as_ref(), &cart, flash))
    }
}

/// Queue a flash message for the next rendered page.
///
/// Failures are logged and otherwise ignored; a lost toast is not worth
/// failing the request over.
pub async fn push_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

/// Remove and return the pending flash message.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// The cart ledger from the session (empty if absent).
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart ledger in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

#[cfg(test)]
mod tests {
    use glowishii_core::{Price, Product};

    use super::*;

    #[test]
    fn test_anonymous_context() {
        let page = PageContext::new(None, &Cart::default(), None);
        assert!(!page.signed_in);
        assert!(!page.has_flash);
        assert_eq!(page.cart_count, 0);
    }

    #[test]
    fn test_context_with_flash_and_cart() {
        let product: Product =
            serde_json::from_str(r#"{"_id": "p1", "name": "Amber", "price": 300}"#)
                .unwrap_or_else(|e| panic!("{e}"));
        let mut cart = Cart::default();
        cart.add(&product, 2);
        assert_eq!(cart.total(), Price::from_rupees(600));

        let page = PageContext::new(None, &cart, Some(Flash::success("Added to cart")));
        assert_eq!(page.cart_count, 2);
        assert!(page.has_flash);
        assert_eq!(page.flash_kind, "success");
        assert_eq!(page.flash_message, "Added to cart");
    }
}
