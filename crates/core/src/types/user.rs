//! Customer account shape.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::email::Email;
use super::id::{ProductId, UserId};

/// Gender as stored on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// A customer (or admin) account returned by `/me` and `/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub email: Email,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "address", default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub wishlist: Vec<ProductId>,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// First word of the name, for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_me_payload() {
        let json = r#"{
            "_id": "u42",
            "name": "Kavya Menon",
            "email": "kavya@example.in",
            "verified": true,
            "address": [{
                "_id": "a1", "name": "Kavya", "street": "4 Beach Rd",
                "city": "Kochi", "state": "Kerala", "pincode": "682001",
                "country": "India", "phone": "9846012345"
            }],
            "wishlist": ["p1"],
            "cart": {"cartTotal": 0, "items": []},
            "isAdmin": true
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_admin);
        assert_eq!(user.first_name(), "Kavya");
        assert_eq!(user.addresses.len(), 1);
        assert_eq!(user.addresses[0].id.as_ref().unwrap().as_str(), "a1");
    }

    #[test]
    fn test_admin_flag_defaults_to_false() {
        let user: User =
            serde_json::from_str(r#"{"_id": "u1", "name": "Ravi", "email": "r@x.in"}"#).unwrap();
        assert!(!user.is_admin);
        assert!(user.addresses.is_empty());
    }
}
