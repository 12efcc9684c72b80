//! Wire shapes that exist only at the API boundary.
//!
//! Entity shapes (`Product`, `Order`, `User`, `Address`) deserialize straight
//! into core types; this module covers envelopes and request bodies.

use serde::{Deserialize, Serialize};

use glowishii_core::{Address, Email, OrderStatus, Product, ProductId, User};

/// Error body: `{ "message": ... }` or `{ "errors": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

/// Validation errors come back as strings or `{ "msg": ... }` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    Text(String),
    Detail {
        #[serde(alias = "message")]
        msg: String,
    },
}

impl ErrorBody {
    /// The most useful message in the body, if any.
    pub fn into_message(self) -> Option<String> {
        self.message.filter(|m| !m.trim().is_empty()).or_else(|| {
            self.errors.into_iter().next().map(|entry| match entry {
                ErrorEntry::Text(text) => text,
                ErrorEntry::Detail { msg } => msg,
            })
        })
    }
}

/// Response of `GET /cart`.
///
/// `cartTotal` and per-item `itemsTotal` are ignored; the ledger recomputes
/// them from quantities and unit prices.
#[derive(Debug, Deserialize)]
pub struct CartBody {
    #[serde(default)]
    pub items: Vec<CartItemBody>,
}

/// One cart item; `product` is populated or a bare id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemBody {
    pub product: ProductRef,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Populated(Box<Product>),
    Id(ProductId),
}

/// Response of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub user: User,
}

/// Response of the address endpoints.
#[derive(Debug, Deserialize)]
pub struct AddressesBody {
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// Body of `POST /otp/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyOtpBody<'a> {
    pub email: &'a Email,
    pub otp: &'a str,
}

/// Body of `POST /otp/send`.
#[derive(Debug, Serialize)]
pub struct SendOtpBody<'a> {
    pub email: &'a Email,
}

/// Body of `PATCH /orders/{id}`.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: OrderStatus,
}

/// Address fields sent on create and update; the id travels in the path.
#[derive(Debug, Serialize)]
pub struct AddressBody<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub street: &'a str,
    pub pincode: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub country: &'a str,
}

impl<'a> From<&'a Address> for AddressBody<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            name: &address.name,
            phone: &address.phone,
            street: &address.street,
            pincode: &address.pincode,
            city: &address.city,
            state: &address.state,
            country: &address.country,
        }
    }
}

/// City and state for a pincode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PincodeInfo {
    pub city: String,
    pub state: String,
}
