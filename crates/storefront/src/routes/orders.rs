//! Order history handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowishii_core::{Order, OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, load_cart, push_flash, store_cart};
use crate::models::Flash;
use crate::routes::cart::refresh_cart;
use crate::state::AppState;

/// Order line display data.
#[derive(Clone)]
pub struct OrderItemView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Order display data shared by customer and admin pages.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub short_id: String,
    pub status: String,
    pub status_class: String,
    pub placed_on: String,
    pub item_count: u32,
    pub items: Vec<OrderItemView>,
    pub customer: String,
    pub shipping_address: String,
    pub phone: String,
    pub payment_method: String,
    pub payment_status: String,
    pub items_total: String,
    pub delivery: String,
    pub total: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.short_id(),
            status: order.order_status.to_string(),
            status_class: order.order_status.as_str().to_lowercase(),
            placed_on: order
                .created_at
                .map(|at| at.format("%d %b %Y").to_string())
                .unwrap_or_default(),
            item_count: order.item_count(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    product_id: item.product_id.to_string(),
                    name: item.name.clone(),
                    image: item.image.clone().unwrap_or_default(),
                    quantity: item.quantity,
                    price: item.price.display(),
                    line_total: item.line_total().display(),
                })
                .collect(),
            customer: order.shipping_address.name.clone(),
            shipping_address: order.shipping_address.to_string(),
            phone: order.shipping_address.phone.clone(),
            payment_method: order.payment.method.to_string(),
            payment_status: order.payment.status.to_string(),
            items_total: order.items_total.display(),
            delivery: if order.delivery_charges.is_zero() {
                "Free".to_string()
            } else {
                order.delivery_charges.display()
            },
            total: order.total_amount.display(),
        }
    }
}

/// Status filter tab.
#[derive(Clone)]
pub struct StatusTabView {
    pub label: String,
    pub href: String,
    pub count: usize,
    pub active: bool,
}

/// Order history query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersParams {
    pub status: Option<String>,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub page: PageContext,
    pub tabs: Vec<StatusTabView>,
    pub orders: Vec<OrderView>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub page: PageContext,
    pub order: OrderView,
}

/// Newest first; orders without a timestamp sink to the end.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn status_tabs(orders: &[Order], active: Option<OrderStatus>) -> Vec<StatusTabView> {
    let all = StatusTabView {
        label: "All".to_string(),
        href: "/orders".to_string(),
        count: orders.len(),
        active: active.is_none(),
    };
    std::iter::once(all)
        .chain(OrderStatus::ALL.iter().map(|status| StatusTabView {
            label: status.to_string(),
            href: format!("/orders?status={}", status.as_str()),
            count: orders.iter().filter(|o| o.order_status == *status).count(),
            active: active == Some(*status),
        }))
        .collect()
}

/// Display the signed-in user's orders.
#[instrument(skip(state, user, page))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Query(params): Query<OrdersParams>,
) -> Result<OrdersIndexTemplate> {
    let mut orders = state.api().my_orders(&user.api_session).await?;
    sort_newest_first(&mut orders);

    // Unknown statuses show every order.
    let active = params
        .status
        .as_deref()
        .and_then(|s| s.parse::<OrderStatus>().ok());

    Ok(OrdersIndexTemplate {
        page,
        tabs: status_tabs(&orders, active),
        orders: orders
            .iter()
            .filter(|order| active.is_none_or(|status| order.order_status == status))
            .map(OrderView::from)
            .collect(),
    })
}

/// Display one order.
#[instrument(skip(state, user, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<OrderShowTemplate> {
    let id = OrderId::parse(&id).map_err(|_| AppError::NotFound("order".to_string()))?;
    let order = state.api().get_order(&user.api_session, &id).await?;

    Ok(OrderShowTemplate {
        page,
        order: OrderView::from(&order),
    })
}

/// Put an order's items back in the cart.
///
/// Products that no longer exist or are out of stock are skipped.
#[instrument(skip(state, session, user))]
pub async fn reorder(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = OrderId::parse(&id).map_err(|_| AppError::NotFound("order".to_string()))?;
    let order = state.api().get_order(&user.api_session, &id).await?;

    let mut cart = load_cart(&session).await;
    let mut added = 0_u32;
    let mut skipped = 0_u32;

    for item in &order.items {
        let product = match state.api().get_product(&item.product_id).await {
            Ok(product) if product.in_stock => product,
            _ => {
                skipped += 1;
                continue;
            }
        };

        cart.add(&product, item.quantity);
        store_cart(&session, &cart).await?;

        for _ in 0..item.quantity {
            if let Err(e) = state.api().add_to_cart(&user.api_session, &product.id).await {
                tracing::warn!(error = %e, product_id = %product.id, "Reorder item rejected");
                skipped += 1;
                break;
            }
        }
        added += item.quantity;
    }

    refresh_cart(&state, &session, &user).await?;

    let flash = match (added, skipped) {
        (0, _) => Flash::error("None of these items are available right now"),
        (_, 0) => Flash::success("Items added to your cart"),
        _ => Flash::success("Available items added to your cart"),
    };
    push_flash(&session, flash).await;

    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: &str, created_at: Option<&str>) -> Order {
        let created = created_at.map_or(String::new(), |at| format!(r#", "createdAt": "{at}""#));
        serde_json::from_str(&format!(
            r#"{{"_id": "{id}", "items": [{{"productId": "p1", "name": "Amber", "quantity": 2, "price": 300}}],
                "shippingAddress": {{"name": "Asha Rao", "street": "12 MG Road", "city": "Bengaluru",
                    "state": "Karnataka", "pincode": "560001", "phone": "9845012345"}},
                "payment": {{"method": "COD", "status": "Pending"}},
                "orderStatus": "{status}", "totalAmount": 600, "itemsTotal": 600, "deliveryCharges": 0{created}}}"#
        ))
        .unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_order_view_formats_amounts() {
        let view = OrderView::from(&order("66aa00112233445566778899", "Shipped", None));
        assert_eq!(view.status, "Shipped");
        assert_eq!(view.status_class, "shipped");
        assert_eq!(view.item_count, 2);
        assert_eq!(view.delivery, "Free");
        assert_eq!(view.total, "₹600.00");
        assert_eq!(view.payment_method, "COD");
    }

    #[test]
    fn test_sort_and_tabs() {
        let mut orders = vec![
            order("o1", "Placed", Some("2026-01-02T10:00:00Z")),
            order("o2", "Delivered", Some("2026-03-02T10:00:00Z")),
            order("o3", "Placed", None),
        ];
        sort_newest_first(&mut orders);
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["o2", "o1", "o3"]);

        let tabs = status_tabs(&orders, Some(OrderStatus::Placed));
        assert_eq!(tabs.len(), 1 + OrderStatus::ALL.len());
        let placed = tabs.iter().find(|t| t.label == "Placed").unwrap_or_else(|| panic!("tab"));
        assert_eq!(placed.count, 2);
        assert!(placed.active);
        assert!(tabs.first().is_some_and(|all| !all.active && all.count == 3));
    }
}
