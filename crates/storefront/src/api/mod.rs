//! Client for the GLOWISHII shop API.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; request and response bodies are JSON
//! - The shop API is source of truth: products, carts, orders and accounts
//!   are never stored locally
//! - In-memory caching of catalog reads via `moka` (TTL from config)
//! - Signed-in calls forward the API's own session cookie, captured at login
//!   and kept in the visitor's server-side session
//!
//! # Example
//!
//! ```rust,ignore
//! use glowishii_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let products = client.list_products().await?;
//! let (user, api_session) = client.login(&credentials).await?;
//! client.add_to_cart(&api_session, &products[0].id).await?;
//! let cart = client.get_cart(&api_session).await?;
//! ```

mod cache;
mod client;
mod wire;

pub use client::ApiClient;
pub use wire::PincodeInfo;

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, if any.
        message: String,
    },

    /// The API session is missing or expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Login succeeded but no session cookie came back.
    #[error("API did not return a session cookie")]
    MissingSession,

    /// The configured base URL cannot carry endpoint paths.
    #[error("API base URL cannot be used for requests")]
    InvalidBaseUrl,
}

impl ApiError {
    /// A message that is safe to show to the visitor.
    ///
    /// Client errors (4xx) carry the API's own explanation, which is written
    /// for end users. Everything else gets a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { status, message } if (400..500).contains(status) && !message.is_empty() => {
                message.clone()
            }
            Self::Unauthorized(_) => "Please sign in to continue".to_string(),
            Self::NotFound(_) => "We couldn't find what you were looking for".to_string(),
            Self::RateLimited(_) => "Too many requests, please try again shortly".to_string(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }

    /// Whether this is a server-side or transport failure worth reporting.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Http(_) | Self::Parse(_) | Self::MissingSession | Self::InvalidBaseUrl => true,
            Self::Unauthorized(_) | Self::NotFound(_) | Self::RateLimited(_) => false,
        }
    }
}

/// The shop API's session cookie for a signed-in visitor.
///
/// Holds the `name=value` pairs from the login response's `Set-Cookie`
/// headers, ready to be sent back as a `Cookie` header. It lives only in the
/// server-side session store and is never written to the browser.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiSession(String);

impl ApiSession {
    /// Wrap a raw `Cookie` header value.
    #[must_use]
    pub fn new(cookie: impl Into<String>) -> Self {
        Self(cookie.into())
    }

    /// Value for the `Cookie` request header.
    #[must_use]
    pub fn cookie_header(&self) -> &str {
        &self.0
    }

    /// Build from `Set-Cookie` header values, keeping only `name=value`.
    ///
    /// Returns `None` when no usable cookie is present.
    pub fn from_set_cookie<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let pairs: Vec<&str> = values
            .into_iter()
            .filter_map(|value| value.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.split_once('=').is_some_and(|(name, _)| !name.is_empty()))
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(Self(pairs.join("; ")))
        }
    }
}

impl fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSession([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = ApiError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_user_message_passes_client_errors_through() {
        let err = ApiError::Status {
            status: 400,
            message: "Product already in cart limit".to_string(),
        };
        assert_eq!(err.user_message(), "Product already in cart limit");

        let err = ApiError::Status {
            status: 502,
            message: "upstream exploded at db.rs:12".to_string(),
        };
        assert_eq!(err.user_message(), "Something went wrong, please try again");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_session_from_set_cookie() {
        let session = ApiSession::from_set_cookie([
            "token=abc.def; Path=/; HttpOnly; SameSite=None; Secure",
            "refresh=xyz; Max-Age=3600",
        ])
        .unwrap();
        assert_eq!(session.cookie_header(), "token=abc.def; refresh=xyz");
    }

    #[test]
    fn test_session_from_set_cookie_ignores_garbage() {
        assert!(ApiSession::from_set_cookie(["", "=nope", "novalue"]).is_none());
    }

    #[test]
    fn test_session_debug_is_redacted() {
        let session = ApiSession::new("token=very-secret");
        assert!(!format!("{session:?}").contains("very-secret"));
    }
}
