//! Newtype IDs for type-safe entity references.
//!
//! The shop API identifies every document with an opaque string (`_id`).
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! passing an order ID where a product ID is expected.

/// Error returned when parsing an ID from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidIdError {
    #[error("id cannot be empty")]
    Empty,
    #[error("id cannot contain control characters")]
    ControlCharacter,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `parse()`, `as_str()`
/// - `Display` and `AsRef<str>`
///
/// # Example
///
/// ```rust
/// # use glowishii_core::define_id;
/// define_id!(WishlistId);
/// define_id!(ReviewId);
///
/// let wishlist = WishlistId::new("64f1c0");
/// let review = ReviewId::new("64f1c0");
///
/// // These are different types, so this won't compile:
/// // let _: WishlistId = review;
/// assert_eq!(wishlist.as_str(), review.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an ID string returned by the API.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse user-supplied input (e.g. a path segment).
            ///
            /// IDs end up in `Location` headers, so control characters are refused.
            ///
            /// # Errors
            ///
            /// Returns `InvalidIdError` if the trimmed input is empty or holds
            /// a control character.
            pub fn parse(id: &str) -> ::core::result::Result<Self, $crate::types::id::InvalidIdError> {
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::InvalidIdError::Empty);
                }
                if trimmed.chars().any(char::is_control) {
                    return Err($crate::types::id::InvalidIdError::ControlCharacter);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(UserId);
define_id!(AddressId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let id = ProductId::parse("  66a1f3  ").unwrap();
        assert_eq!(id.as_str(), "66a1f3");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(OrderId::parse("   "), Err(InvalidIdError::Empty));
        assert_eq!(OrderId::parse(""), Err(InvalidIdError::Empty));
    }

    #[test]
    fn test_parse_rejects_control_characters() {
        assert_eq!(OrderId::parse("a\nb"), Err(InvalidIdError::ControlCharacter));
        assert_eq!(ProductId::parse("p1\t2"), Err(InvalidIdError::ControlCharacter));
        assert_eq!(AddressId::parse("a1\r"), Ok(AddressId::new("a1")));
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = UserId::new("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
        let back: UserId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(back, id);
    }
}
