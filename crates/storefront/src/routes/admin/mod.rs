//! Back-office route handlers.
//!
//! Every handler here takes [`RequireAdmin`](crate::middleware::RequireAdmin);
//! the shop API enforces the same rule on its side.

pub mod orders;
pub mod products;

use axum::response::Redirect;

use crate::middleware::RequireAdmin;

/// The back-office landing page is the product table.
pub async fn index(RequireAdmin(_admin): RequireAdmin) -> Redirect {
    Redirect::to("/admin/products")
}
