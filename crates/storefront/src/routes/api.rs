//! JSON helpers used by page scripts.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use glowishii_core::types::address::normalize_pincode;

use crate::state::AppState;

const PINCODE_DIGITS: usize = 6;

/// Look up city and state for a pincode.
///
/// Responds with `{"city", "state"}`, or `{"error"}` with 400 for a
/// malformed pincode and 404 when nothing matches.
#[instrument(skip(state))]
pub async fn pincode(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    let code = normalize_pincode(&code);
    if code.len() != PINCODE_DIGITS {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Pincode must be 6 digits" })),
        )
            .into_response();
    }

    match state.api().lookup_pincode(&code).await {
        Ok(Some(info)) => Json(info).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Invalid pincode" })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, pincode = %code, "Pincode lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Pincode lookup is unavailable" })),
            )
                .into_response()
        }
    }
}
