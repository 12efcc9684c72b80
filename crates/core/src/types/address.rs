//! Shipping address.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::AddressId;

/// Default country for new addresses.
pub const DEFAULT_COUNTRY: &str = "India";

/// Length of an Indian postal code.
pub const PINCODE_LENGTH: usize = 6;

/// Errors from [`Address::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// Pincode is not six digits.
    #[error("pincode must be exactly {PINCODE_LENGTH} digits")]
    InvalidPincode,
    /// Phone number has the wrong number of digits.
    #[error("phone number must have 10 to 15 digits")]
    InvalidPhone,
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub phone: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Default for Address {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: String::new(),
            country: default_country(),
            phone: String::new(),
        }
    }
}

/// Keep only the digits of a pincode as typed by the user.
#[must_use]
pub fn normalize_pincode(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

impl Address {
    /// Trim every field and strip non-digits from the pincode.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.name,
            &mut self.street,
            &mut self.city,
            &mut self.state,
            &mut self.country,
            &mut self.phone,
        ] {
            *field = field.trim().to_string();
        }
        self.pincode = normalize_pincode(&self.pincode);
        if self.country.is_empty() {
            self.country = default_country();
        }
        self
    }

    /// Check that the address is complete enough to ship to.
    ///
    /// # Errors
    ///
    /// Returns the first [`AddressError`] found.
    pub fn validate(&self) -> Result<(), AddressError> {
        let required = [
            ("name", &self.name),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
            ("country", &self.country),
            ("phone", &self.phone),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AddressError::MissingField(field));
        }

        if self.pincode.len() != PINCODE_LENGTH || !self.pincode.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AddressError::InvalidPincode);
        }

        let phone_ok = self
            .phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if !phone_ok || !(10..=15).contains(&digits) {
            return Err(AddressError::InvalidPhone);
        }

        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} - {}, {}",
            self.street, self.city, self.state, self.pincode, self.country
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub fn home() -> Address {
        Address {
            id: None,
            name: "Asha Rao".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            country: "India".to_string(),
            phone: "+91 98450 12345".to_string(),
        }
    }

    #[test]
    fn test_valid_address() {
        assert_eq!(home().validate(), Ok(()));
    }

    #[test]
    fn test_missing_field() {
        let mut address = home();
        address.city = "  ".to_string();
        assert_eq!(address.validate(), Err(AddressError::MissingField("city")));
    }

    #[test]
    fn test_invalid_pincode() {
        let mut address = home();
        address.pincode = "5600".to_string();
        assert_eq!(address.validate(), Err(AddressError::InvalidPincode));
        address.pincode = "56000a".to_string();
        assert_eq!(address.validate(), Err(AddressError::InvalidPincode));
    }

    #[test]
    fn test_invalid_phone() {
        let mut address = home();
        address.phone = "12345".to_string();
        assert_eq!(address.validate(), Err(AddressError::InvalidPhone));
        address.phone = "98450x12345".to_string();
        assert_eq!(address.validate(), Err(AddressError::InvalidPhone));
    }

    #[test]
    fn test_normalized() {
        let address = Address {
            pincode: "560 001".to_string(),
            name: " Asha ".to_string(),
            country: String::new(),
            ..home()
        }
        .normalized();
        assert_eq!(address.pincode, "560001");
        assert_eq!(address.name, "Asha");
        assert_eq!(address.country, "India");
    }

    #[test]
    fn test_serialize_skips_missing_id() {
        let json = serde_json::to_value(home()).unwrap();
        assert!(json.get("_id").is_none());
        assert_eq!(json["pincode"], "560001");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            home().to_string(),
            "12 MG Road, Bengaluru, Karnataka - 560001, India"
        );
    }
}
