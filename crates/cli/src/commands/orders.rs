//! Order inspection and status changes.
//!
//! Both commands act as an admin through the shop API, using the session
//! cookie in `GLOWISHII_API_COOKIE` (e.g. `token=...`, copied from a
//! signed-in admin browser session).

use secrecy::{ExposeSecret, SecretString};

use glowishii_core::{Order, OrderId, OrderStatus};
use glowishii_storefront::api::ApiSession;

use super::{CommandError, api_client};

fn admin_session() -> Result<ApiSession, CommandError> {
    let cookie = std::env::var("GLOWISHII_API_COOKIE")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("GLOWISHII_API_COOKIE"))?;
    Ok(ApiSession::new(cookie.expose_secret()))
}

fn row(order: &Order) -> String {
    let placed = order
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "{:<26} {:<16} {:<10} {:>4} items {:>12}",
        order.id.as_str(),
        placed,
        order.order_status.as_str(),
        order.item_count(),
        order.total_amount.to_string()
    )
}

/// Print every order, newest first.
pub async fn list(status: Option<&str>) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();
    let filter = status
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;

    let session = admin_session()?;
    let api = api_client()?;
    let mut orders = api.all_orders(&session).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    #[allow(clippy::print_stdout)]
    {
        for order in orders
            .iter()
            .filter(|order| filter.is_none_or(|status| order.order_status == status))
        {
            println!("{}", row(order));
        }
    }
    Ok(())
}

/// Move an order to a new status, refusing moves the back office refuses.
pub async fn set_status(id: &str, status: &str) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();
    let id = OrderId::parse(id).map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    let next = status
        .parse::<OrderStatus>()
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;

    let session = admin_session()?;
    let api = api_client()?;
    let order = api.get_order(&session, &id).await?;
    let current = order.order_status;

    current
        .transition_to(next)
        .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    if current == next {
        tracing::info!(order_id = %id, status = %next, "Order already has this status");
        return Ok(());
    }

    let updated = api.update_order_status(&session, &id, next).await?;
    tracing::info!(order_id = %id, from = %current, to = %updated.order_status, "Order status changed");
    Ok(())
}
