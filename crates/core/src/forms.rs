//! Validation of form input before it is sent to the shop API.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError, Price, Product};

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Number of digits in an email verification code.
pub const OTP_LENGTH: usize = 6;

/// Split a comma or newline separated list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Image URLs are entered one per line; commas are accepted too.
fn split_images(input: &str) -> Vec<String> {
    split_list(input)
}

// =============================================================================
// Product
// =============================================================================

/// Reasons a product form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductFormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("price must be greater than zero")]
    NonPositivePrice,
    #[error("discounted price cannot be more than the price")]
    DiscountAbovePrice,
    #[error("at least one image URL is required")]
    NoImages,
    #[error("image URL must start with http:// or https://: {0}")]
    InvalidImageUrl(String),
}

/// Raw product form fields, as posted by the admin product editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub discounted_price: String,
    #[serde(default)]
    pub burn_time: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub fragrances: String,
    #[serde(default)]
    pub images: String,
    /// Checkbox; present when ticked.
    #[serde(default)]
    pub in_stock: Option<String>,
    #[serde(default)]
    pub special: Option<String>,
}

impl ProductForm {
    /// Prefill the editor from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let checkbox = |on: bool| on.then(|| "on".to_string());
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price.amount().to_string(),
            discounted_price: product
                .discounted_price
                .map(|p| p.amount().to_string())
                .unwrap_or_default(),
            burn_time: product.burn_time.clone().unwrap_or_default(),
            size: product.size.clone(),
            ingredients: product.ingredients.join(", "),
            fragrances: product.fragrances.join(", "),
            images: product.images.join("\n"),
            in_stock: checkbox(product.in_stock),
            special: checkbox(product.special),
        }
    }

    /// A blank form for a new product; new products start in stock.
    #[must_use]
    pub fn new_product() -> Self {
        Self {
            in_stock: Some("on".to_string()),
            ..Self::default()
        }
    }

    /// Validate into a [`ProductDraft`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductFormError`] found, checking fields in the
    /// order they appear on the form.
    pub fn validate(&self) -> Result<ProductDraft, ProductFormError> {
        let name = required("name", &self.name)?;
        let category = required("category", &self.category)?;
        let description = required("description", &self.description)?;

        let price = parse_price("price", required("price", &self.price)?.as_str())?;
        if !price.is_positive() {
            return Err(ProductFormError::NonPositivePrice);
        }
        let discounted_price = match self.discounted_price.trim() {
            "" => None,
            raw => Some(parse_price("discounted price", raw)?),
        };
        if discounted_price.is_some_and(|d| d > price) {
            return Err(ProductFormError::DiscountAbovePrice);
        }

        let size = required("size", &self.size)?;

        let images = split_images(&self.images);
        if images.is_empty() {
            return Err(ProductFormError::NoImages);
        }
        if let Some(bad) = images
            .iter()
            .find(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(ProductFormError::InvalidImageUrl(bad.clone()));
        }

        let burn_time = Some(self.burn_time.trim())
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        Ok(ProductDraft {
            name,
            category,
            description,
            price,
            discounted_price,
            burn_time,
            size,
            ingredients: split_list(&self.ingredients),
            fragrances: split_list(&self.fragrances),
            images,
            in_stock: self.in_stock.is_some(),
            special: self.special.is_some(),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProductFormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ProductFormError::Required(field))
    } else {
        Ok(value.to_string())
    }
}

fn parse_price(field: &'static str, raw: &str) -> Result<Price, ProductFormError> {
    raw.trim()
        .trim_start_matches('₹')
        .parse()
        .map_err(|_| ProductFormError::NotANumber(field))
}

/// A validated product, serialized as the body of `POST /products` and
/// `PATCH /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burn_time: Option<String>,
    pub size: String,
    pub ingredients: Vec<String>,
    pub fragrances: Vec<String>,
    pub images: Vec<String>,
    pub in_stock: bool,
    pub special: bool,
}

// =============================================================================
// Accounts
// =============================================================================

/// Reasons a signup or login form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountFormError {
    #[error("name is required")]
    NameRequired,
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("password is required")]
    PasswordRequired,
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    #[error("verification code must be {OTP_LENGTH} digits")]
    InvalidOtp,
}

/// Body of `POST /login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns [`AccountFormError`] for a malformed email or blank password.
    pub fn parse(email: &str, password: &str) -> Result<Self, AccountFormError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AccountFormError::PasswordRequired);
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /signup`.
#[derive(Clone, Serialize)]
pub struct SignupDraft {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl SignupDraft {
    /// # Errors
    ///
    /// Returns the first [`AccountFormError`] found.
    pub fn parse(name: &str, email: &str, password: &str) -> Result<Self, AccountFormError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountFormError::NameRequired);
        }
        let email = Email::parse(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountFormError::PasswordTooShort);
        }
        Ok(Self {
            name: name.to_string(),
            email,
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for SignupDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A six digit email verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// # Errors
    ///
    /// Returns [`AccountFormError::InvalidOtp`] unless the trimmed input is
    /// exactly six ASCII digits.
    pub fn parse(input: &str) -> Result<Self, AccountFormError> {
        let code = input.trim();
        if code.len() == OTP_LENGTH && code.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(AccountFormError::InvalidOtp)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::tests::candle;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Vanilla Bean".to_string(),
            category: "Jar".to_string(),
            description: "Sweet and creamy".to_string(),
            price: "799".to_string(),
            discounted_price: "649.50".to_string(),
            burn_time: "45".to_string(),
            size: "300g".to_string(),
            ingredients: "Soy wax, Cotton wick,".to_string(),
            fragrances: "Vanilla\nTonka".to_string(),
            images: "https://cdn.example/v1.jpg\n\nhttps://cdn.example/v2.jpg".to_string(),
            in_stock: Some("on".to_string()),
            special: None,
        }
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, b ,,\n c \n"), ["a", "b", "c"]);
        assert!(split_list(" , \n").is_empty());
    }

    #[test]
    fn test_valid_product_form() {
        let draft = valid_form().validate().unwrap();
        assert_eq!(draft.price, Price::from_rupees(799));
        assert_eq!(draft.discounted_price, Some(Price::from_paise(64_950)));
        assert_eq!(draft.ingredients, ["Soy wax", "Cotton wick"]);
        assert_eq!(draft.fragrances, ["Vanilla", "Tonka"]);
        assert_eq!(draft.images.len(), 2);
        assert!(draft.in_stock);
        assert!(!draft.special);
    }

    #[test]
    fn test_product_form_required_fields() {
        let form = ProductForm {
            size: " ".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(ProductFormError::Required("size")));

        let form = ProductForm {
            images: String::new(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(ProductFormError::NoImages));
    }

    #[test]
    fn test_product_form_price_rules() {
        let form = ProductForm {
            price: "abc".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(ProductFormError::NotANumber("price")));

        let form = ProductForm {
            price: "0".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(ProductFormError::NonPositivePrice));

        let form = ProductForm {
            discounted_price: "900".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), Err(ProductFormError::DiscountAbovePrice));
    }

    #[test]
    fn test_product_form_rejects_relative_image() {
        let form = ProductForm {
            images: "/uploads/a.jpg".to_string(),
            ..valid_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ProductFormError::InvalidImageUrl(_))
        ));
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let json = serde_json::to_value(valid_form().validate().unwrap()).unwrap();
        assert_eq!(json["discountedPrice"], serde_json::json!(649.5));
        assert_eq!(json["inStock"], serde_json::json!(true));
        assert_eq!(json["burnTime"], "45");
    }

    #[test]
    fn test_from_product_prefills_editor() {
        let mut product = candle("p1", "Amber", 500, Some(450));
        product.images = vec!["https://a".to_string(), "https://b".to_string()];
        product.fragrances = vec!["Amber".to_string(), "Musk".to_string()];
        product.description = "Resinous".to_string();

        let form = ProductForm::from_product(&product);
        assert_eq!(form.images, "https://a\nhttps://b");
        assert_eq!(form.fragrances, "Amber, Musk");
        assert_eq!(form.in_stock.as_deref(), Some("on"));

        let draft = form.validate().unwrap();
        assert_eq!(draft.price, product.price);
        assert_eq!(draft.fragrances, product.fragrances);
    }

    #[test]
    fn test_signup_rules() {
        assert!(SignupDraft::parse("Meera", "meera@example.in", "longenough").is_ok());
        assert_eq!(
            SignupDraft::parse(" ", "meera@example.in", "longenough").unwrap_err(),
            AccountFormError::NameRequired
        );
        assert_eq!(
            SignupDraft::parse("Meera", "meera@example.in", "short").unwrap_err(),
            AccountFormError::PasswordTooShort
        );
        assert!(matches!(
            SignupDraft::parse("Meera", "meera", "longenough"),
            Err(AccountFormError::Email(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let signup = SignupDraft::parse("Meera", "meera@example.in", "hunter2hunter2").unwrap();
        assert!(!format!("{signup:?}").contains("hunter2"));
        let creds = Credentials::parse("meera@example.in", "hunter2").unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_otp_code() {
        assert_eq!(OtpCode::parse(" 123456 ").unwrap().as_str(), "123456");
        assert!(OtpCode::parse("12345").is_err());
        assert!(OtpCode::parse("12a456").is_err());
    }
}
