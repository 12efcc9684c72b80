//! GLOWISHII storefront library.
//!
//! Server-rendered candle shop in front of the GLOWISHII shop API. The
//! storefront owns no business data: products, carts, orders and accounts
//! live behind the API, and the session keeps only the visitor's API
//! cookie, a cart ledger and one flash message.
//!
//! The router is built here so integration tests can drive it with an
//! in-memory session store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware::from_fn,
};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tower_sessions::{SessionManagerLayer, SessionStore, service::SignedCookie};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::routes::RateLimits;
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full storefront application.
///
/// Layers, outermost first: session, tracing, request id, security headers.
/// Sentry layers are added by the binary around the result.
pub fn app<S>(
    state: AppState,
    limits: &RateLimits,
    session_layer: SessionManagerLayer<S, SignedCookie>,
) -> Router
where
    S: SessionStore + Clone,
{
    // Asset URLs carry a content hash, so they can be cached for good.
    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=31536000, immutable"),
        ))
        .service(ServeDir::new(STATIC_DIR));

    Router::new()
        .merge(routes::routes(limits))
        .nest_service("/static", static_files)
        .fallback(routes::not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(session_layer)
        .with_state(state)
}
