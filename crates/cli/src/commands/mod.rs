//! Subcommand implementations.

pub mod migrate;
pub mod orders;
pub mod products;

use glowishii_storefront::api::{ApiClient, ApiError};
use glowishii_storefront::config::{ApiConfig, ConfigError};
use thiserror::Error;

/// Errors shared by the API-backed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Shop API error: {0}")]
    Api(#[from] ApiError),

    /// The argument could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Build a shop API client from `GLOWISHII_API_URL`.
pub fn api_client() -> Result<ApiClient, CommandError> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;
    tracing::debug!(api = %config.base_url, "Using shop API");
    Ok(ApiClient::new(&config)?)
}
