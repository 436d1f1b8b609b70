//! Handlers for the health, code issuance and verification endpoints.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use otpd_common::{OtpReading, unix_time_seconds};

use crate::{
    auth::{AuthError, require_api_key, require_signature},
    http::AppState,
};

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyRequest {
    otp: String,
}

/// `GET /health` — public liveness probe.
pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "timestamp": unix_time_seconds() }))
}

/// `GET /otp` — returns the current code; requires a valid API key.
pub(crate) async fn get_otp(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<OtpReading>, AuthError> {
    require_api_key(&headers, &state.api_key)?;
    Ok(Json(state.engine.generate()))
}

/// `POST /otp/verify` — checks a submitted code against the skew-tolerant
/// window; requires a valid API key.
pub(crate) async fn verify_otp(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    require_api_key(&headers, &state.api_key)?;
    let valid = state.engine.verify(&body.otp);
    Ok(Json(json!({ "valid": valid, "timestamp": unix_time_seconds() })))
}

/// `GET /otp/secure` — returns the current code; requires a valid API key
/// and a valid HMAC-signed timestamp envelope.
pub(crate) async fn get_otp_secure(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<OtpReading>, AuthError> {
    require_api_key(&headers, &state.api_key)?;
    require_signature(&headers, &state.api_key)?;
    Ok(Json(state.engine.generate()))
}

/// `GET /docs` — minimal route index, only served when `ENABLE_DOCS` is set.
pub(crate) async fn docs(State(state): State<AppState>) -> Response {
    if !state.enable_docs {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "routes": {
            "GET /health": "liveness probe, public",
            "GET /otp": "current code, API key required",
            "POST /otp/verify": "verify a code, API key required",
            "GET /otp/secure": "current code, API key and signed envelope required",
        },
    }))
    .into_response()
}
