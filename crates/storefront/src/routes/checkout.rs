//! Checkout route handlers.
//!
//! Checkout turns the cart ledger into an order with a saved shipping
//! address and a payment method. Payment is recorded, never processed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowishii_core::{Address, AddressId, NewOrder, PaymentMethod, Price};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, push_flash, store_cart};
use crate::models::Flash;
use crate::routes::cart::{CartView, refresh_cart};
use crate::routes::products::OptionView;
use crate::routes::sentence;
use crate::routes::profile::AddressFormView;
use crate::state::AppState;

/// Delivery is free on every order.
const DELIVERY_CHARGES: Price = Price::ZERO;

/// A saved address offered at checkout.
#[derive(Clone)]
pub struct AddressChoiceView {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub phone: String,
    pub selected: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub addresses: Vec<AddressChoiceView>,
    pub payment_methods: Vec<OptionView>,
    pub address_form: AddressFormView,
}

/// Place order form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub address_id: Option<String>,
    pub payment_method: Option<String>,
}

fn address_choices(addresses: &[Address]) -> Vec<AddressChoiceView> {
    addresses
        .iter()
        .filter_map(|address| {
            address.id.as_ref().map(|id| AddressChoiceView {
                id: id.to_string(),
                name: address.name.clone(),
                summary: address.to_string(),
                phone: address.phone.clone(),
                selected: false,
            })
        })
        .enumerate()
        .map(|(i, mut choice)| {
            choice.selected = i == 0;
            choice
        })
        .collect()
}

fn payment_options() -> Vec<OptionView> {
    PaymentMethod::ALL
        .iter()
        .map(|method| OptionView {
            value: method.as_str().to_string(),
            label: match method {
                PaymentMethod::CashOnDelivery => "Cash on delivery".to_string(),
                other => other.as_str().to_string(),
            },
            selected: *method == PaymentMethod::default(),
        })
        .collect()
}

/// Display checkout page.
#[instrument(skip(state, session, user, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut page: PageContext,
    session: Session,
) -> Result<Response> {
    let cart = refresh_cart(&state, &session, &user).await?;
    if cart.is_empty() {
        push_flash(&session, Flash::error("Your cart is empty")).await;
        return Ok(Redirect::to("/cart").into_response());
    }
    page.cart_count = cart.item_count();

    let profile = state.api().me(&user.api_session).await?;

    Ok(CheckoutTemplate {
        page,
        cart: CartView::from(&cart),
        addresses: address_choices(&profile.addresses),
        payment_methods: payment_options(),
        address_form: AddressFormView::blank("/checkout"),
    }
    .into_response())
}

/// Place the order.
///
/// Sends the ledger to the API as an order, then clears the local ledger.
#[instrument(skip(state, session, user))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Redirect> {
    let Some(method) = form
        .payment_method
        .as_deref()
        .and_then(|m| m.parse::<PaymentMethod>().ok())
    else {
        push_flash(&session, Flash::error("Choose a payment method")).await;
        return Ok(Redirect::to("/checkout"));
    };

    let profile = state.api().me(&user.api_session).await?;
    let chosen = form
        .address_id
        .as_deref()
        .and_then(|raw| AddressId::parse(raw).ok())
        .and_then(|id| {
            profile
                .addresses
                .iter()
                .find(|address| address.id.as_ref() == Some(&id))
                .cloned()
        });
    let Some(address) = chosen else {
        push_flash(&session, Flash::error("Choose a shipping address")).await;
        return Ok(Redirect::to("/checkout"));
    };

    let mut cart = refresh_cart(&state, &session, &user).await?;
    let order = match NewOrder::from_cart(&cart, address, method, DELIVERY_CHARGES) {
        Ok(order) => order,
        Err(e) => {
            push_flash(&session, Flash::error(sentence(&e))).await;
            return Ok(Redirect::to("/checkout"));
        }
    };

    match state.api().place_order(&user.api_session, &order).await {
        Ok(placed) => {
            tracing::info!(order_id = %placed.id, user_id = %user.id, total = %placed.total_amount, "Order placed");
            add_breadcrumb("checkout", "Order placed", Some(&[("order_id", placed.id.as_str())]));
            cart.clear();
            store_cart(&session, &cart).await?;
            push_flash(&session, Flash::success("Order placed successfully")).await;
            Ok(Redirect::to(&format!("/orders/{}", placed.id)))
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user.id, "Order was rejected");
            push_flash(&session, Flash::error(e.user_message())).await;
            Ok(Redirect::to("/checkout"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_saved_address_is_preselected() {
        let saved = |id: Option<&str>| Address {
            id: id.map(AddressId::new),
            name: "Asha Rao".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            phone: "+91 98450 12345".to_string(),
            ..Address::default()
        };
        let choices = address_choices(&[saved(None), saved(Some("a1")), saved(Some("a2"))]);

        assert_eq!(choices.len(), 2);
        assert!(choices.first().is_some_and(|c| c.selected && c.id == "a1"));
        assert!(choices.get(1).is_some_and(|c| !c.selected));
    }

    #[test]
    fn test_cash_on_delivery_is_default() {
        let options = payment_options();
        assert_eq!(options.len(), PaymentMethod::ALL.len());
        assert!(options.iter().any(|o| o.selected && o.value == "COD"));
    }
}
