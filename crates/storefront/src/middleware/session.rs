//! Session middleware configuration.
//!
//! Sets up signed-cookie sessions using tower-sessions. Production uses the
//! `PostgreSQL` store; tests plug in the in-memory store.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore, cookie::Key, service::SignedCookie,
};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::{MIN_SESSION_SECRET_LENGTH, StorefrontConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "glowishii_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// The session secret could not be turned into a signing key.
#[derive(Debug, Error)]
#[error("session secret must be at least {MIN_SESSION_SECRET_LENGTH} bytes")]
pub struct SessionKeyError;

/// Create the session layer over any store.
///
/// Cookies are signed with the configured session secret.
///
/// # Errors
///
/// Returns `SessionKeyError` if the secret is too short to sign with.
pub fn create_session_layer<S>(
    store: S,
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<S, SignedCookie>, SessionKeyError>
where
    S: SessionStore + Clone,
{
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())
        .map_err(|_| SessionKeyError)?;

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}

/// Create the session layer with the `PostgreSQL` store.
///
/// The sessions table is created by `gw-cli migrate`.
///
/// # Errors
///
/// Returns `SessionKeyError` if the secret is too short to sign with.
pub fn postgres_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, SessionKeyError> {
    create_session_layer(PostgresStore::new(pool.clone()), config)
}
