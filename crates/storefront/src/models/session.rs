//! Session-related types.
//!
//! Types stored in the session for authentication state, the cart ledger
//! and one-shot flash messages.

use serde::{Deserialize, Serialize};

use glowishii_core::{Email, User, UserId};

use crate::api::ApiSession;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in user, plus
/// the shop API session used to act on their behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's API ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Whether the back-office is open to this user.
    pub is_admin: bool,
    /// Shop API session cookie.
    pub api_session: ApiSession,
}

impl CurrentUser {
    /// Build from the user returned at login.
    #[must_use]
    pub fn new(user: &User, api_session: ApiSession) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            api_session,
        }
    }

    /// First word of the name, for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Flash message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier for the toast.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart ledger.
    pub const CART: &str = "cart";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";

    /// Key for the email awaiting verification after signup.
    pub const PENDING_EMAIL: &str = "pending_email";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_from_login() {
        let user: User = serde_json::from_str(
            r#"{"_id": "u7", "name": "Nila Das", "email": "nila@example.in", "isAdmin": true}"#,
        )
        .unwrap();
        let current = CurrentUser::new(&user, ApiSession::new("token=abc"));
        assert!(current.is_admin);
        assert_eq!(current.first_name(), "Nila");
        assert!(!format!("{current:?}").contains("token=abc"));
    }

    #[test]
    fn test_flash_serializes_kind_lowercase() {
        let json = serde_json::to_string(&Flash::error("Nope")).unwrap();
        assert_eq!(json, r#"{"kind":"error","message":"Nope"}"#);
    }
}
