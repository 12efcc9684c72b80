//! Order shapes: placed orders as returned by the API, and new orders built
//! from the cart at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::{Address, AddressError};
use super::id::{OrderId, ProductId, UserId};
use super::price::Price;
use super::status::{OrderStatus, PaymentMethod, PaymentStatus};
use crate::cart::Cart;

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price at the time of purchase.
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
}

impl OrderItem {
    /// `quantity × price`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Payment record. Only the method is chosen by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default)]
    pub order_status: OrderStatus,
    pub total_amount: Price,
    #[serde(default)]
    pub items_total: Price,
    #[serde(default)]
    pub delivery_charges: Price,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Short id for tables, e.g. `#A1B2C3D4`.
    #[must_use]
    pub fn short_id(&self) -> String {
        let id = self.id.as_str();
        let tail = id.len().saturating_sub(8);
        format!("#{}", id.get(tail..).unwrap_or(id).to_uppercase())
    }
}

/// Reasons a cart cannot become an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewOrderError {
    #[error("your cart is empty")]
    EmptyCart,
    #[error("invalid shipping address: {0}")]
    Address(#[from] AddressError),
}

/// Payload for `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment: Payment,
    pub items_total: Price,
    pub delivery_charges: Price,
    pub total_amount: Price,
}

impl NewOrder {
    /// Build an order from the cart ledger.
    ///
    /// # Errors
    ///
    /// Returns [`NewOrderError`] if the cart is empty or the address is
    /// incomplete.
    pub fn from_cart(
        cart: &Cart,
        shipping_address: Address,
        method: PaymentMethod,
        delivery_charges: Price,
    ) -> Result<Self, NewOrderError> {
        if cart.is_empty() {
            return Err(NewOrderError::EmptyCart);
        }
        shipping_address.validate()?;

        let items: Vec<OrderItem> = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                price: line.unit_price,
                image: line.image.clone(),
            })
            .collect();
        let items_total = items.iter().map(OrderItem::line_total).sum::<Price>();

        Ok(Self {
            items,
            shipping_address,
            payment: Payment {
                method,
                status: PaymentStatus::Pending,
                transaction_id: None,
            },
            items_total,
            delivery_charges,
            total_amount: items_total + delivery_charges,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::address::tests::home;
    use crate::types::product::tests::candle;

    #[test]
    fn test_from_cart_totals() {
        let mut cart = Cart::default();
        cart.add(&candle("p1", "Amber", 500, Some(400)), 2);
        cart.add(&candle("p2", "Rose", 250, None), 1);

        let order = NewOrder::from_cart(
            &cart,
            home(),
            PaymentMethod::Upi,
            Price::from_rupees(40),
        )
        .unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items_total, Price::from_rupees(1050));
        assert_eq!(order.total_amount, Price::from_rupees(1090));
        assert_eq!(order.payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_from_empty_cart() {
        let err = NewOrder::from_cart(
            &Cart::default(),
            home(),
            PaymentMethod::CashOnDelivery,
            Price::ZERO,
        )
        .unwrap_err();
        assert_eq!(err, NewOrderError::EmptyCart);
    }

    #[test]
    fn test_from_cart_rejects_bad_address() {
        let mut cart = Cart::default();
        cart.add(&candle("p1", "Amber", 500, None), 1);
        let mut address = home();
        address.pincode = "12".to_string();
        let err =
            NewOrder::from_cart(&cart, address, PaymentMethod::CashOnDelivery, Price::ZERO)
                .unwrap_err();
        assert_eq!(err, NewOrderError::Address(AddressError::InvalidPincode));
    }

    #[test]
    fn test_deserialize_order() {
        let json = r#"{
            "_id": "65f0c0ffee1234abcd",
            "userId": "u1",
            "items": [
                {"productId": "p1", "name": "Amber", "quantity": 2, "price": 400, "image": "a.jpg"},
                {"productId": "p2", "name": "Rose", "quantity": 1, "price": 250}
            ],
            "shippingAddress": {
                "name": "Asha", "street": "12 MG Road", "city": "Bengaluru",
                "state": "Karnataka", "pincode": "560001", "country": "India",
                "phone": "9845012345"
            },
            "payment": {"method": "UPI", "status": "Completed", "transactionId": "T1"},
            "orderStatus": "Shipped",
            "totalAmount": 1050,
            "itemsTotal": 1050,
            "deliveryCharges": 0,
            "createdAt": "2025-02-01T10:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.order_status, OrderStatus::Shipped);
        assert_eq!(order.payment.method, PaymentMethod::Upi);
        assert_eq!(order.short_id(), "#1234ABCD");
        assert_eq!(order.items[0].line_total(), Price::from_rupees(800));
    }
}
