//! Back-office order handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowishii_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, push_flash};
use crate::models::Flash;
use crate::routes::orders::{OrderView, OrdersParams, sort_newest_first};
use crate::routes::products::OptionView;
use crate::routes::sentence;
use crate::state::AppState;

/// Order table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/index.html")]
pub struct AdminOrdersTemplate {
    pub page: PageContext,
    pub statuses: Vec<OptionView>,
    pub orders: Vec<OrderView>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/show.html")]
pub struct AdminOrderShowTemplate {
    pub page: PageContext,
    pub order: OrderView,
    /// Statuses the order can move to, current one selected.
    pub next_statuses: Vec<OptionView>,
    pub terminal: bool,
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

fn status_options(statuses: &[OrderStatus], current: Option<OrderStatus>) -> Vec<OptionView> {
    statuses
        .iter()
        .map(|status| OptionView {
            value: status.as_str().to_string(),
            label: status.to_string(),
            selected: current == Some(*status),
        })
        .collect()
}

fn parse_order_id(raw: &str) -> Result<OrderId> {
    OrderId::parse(raw).map_err(|_| AppError::NotFound("order".to_string()))
}

/// Display every order, newest first.
#[instrument(skip(state, admin, page))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    Query(params): Query<OrdersParams>,
) -> Result<AdminOrdersTemplate> {
    let mut orders = state.api().all_orders(&admin.api_session).await?;
    sort_newest_first(&mut orders);

    let active = params
        .status
        .as_deref()
        .and_then(|s| s.parse::<OrderStatus>().ok());

    Ok(AdminOrdersTemplate {
        page,
        statuses: status_options(&OrderStatus::ALL, active),
        orders: orders
            .iter()
            .filter(|order| active.is_none_or(|status| order.order_status == status))
            .map(OrderView::from)
            .collect(),
    })
}

/// Display one order with its status controls.
#[instrument(skip(state, admin, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<AdminOrderShowTemplate> {
    let id = parse_order_id(&id)?;
    let order = state.api().get_order(&admin.api_session, &id).await?;
    let current = order.order_status;

    Ok(AdminOrderShowTemplate {
        page,
        order: OrderView::from(&order),
        next_statuses: status_options(&current.allowed_next(), Some(current)),
        terminal: current.is_terminal(),
    })
}

/// Move an order to a new status.
///
/// The transition is checked locally before the API is asked; choosing the
/// current status changes nothing.
#[instrument(skip(state, admin, session))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let id = parse_order_id(&id)?;
    let back = format!("/admin/orders/{id}");

    let next = match form.status.parse::<OrderStatus>() {
        Ok(next) => next,
        Err(e) => {
            push_flash(&session, Flash::error(sentence(&e))).await;
            return Ok(Redirect::to(&back));
        }
    };

    let order = state.api().get_order(&admin.api_session, &id).await?;
    let current = order.order_status;

    if let Err(e) = current.transition_to(next) {
        tracing::info!(order_id = %id, from = %current, to = %next, "Status change refused");
        push_flash(&session, Flash::error(sentence(&e))).await;
        return Ok(Redirect::to(&back));
    }
    if current == next {
        push_flash(&session, Flash::success(format!("Order is already {next}"))).await;
        return Ok(Redirect::to(&back));
    }

    match state
        .api()
        .update_order_status(&admin.api_session, &id, next)
        .await
    {
        Ok(updated) => {
            tracing::info!(order_id = %id, from = %current, to = %updated.order_status, admin_id = %admin.id, "Order status changed");
            add_breadcrumb(
                "admin",
                "Order status changed",
                Some(&[("order_id", id.as_str()), ("status", next.as_str())]),
            );
            push_flash(&session, Flash::success(format!("Order marked {next}"))).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, order_id = %id, "Status change rejected");
            push_flash(&session, Flash::error(e.user_message())).await;
        }
    }
    Ok(Redirect::to(&back))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_options_mark_current() {
        let current = OrderStatus::Processing;
        let options = status_options(&current.allowed_next(), Some(current));

        assert!(options.iter().any(|o| o.value == "Processing" && o.selected));
        assert!(options.iter().any(|o| o.value == "Cancelled"));
        assert!(!options.iter().any(|o| o.value == "Placed"));
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn test_terminal_status_offers_only_itself() {
        let options = status_options(&OrderStatus::Delivered.allowed_next(), None);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["Delivered"]);
    }
}
