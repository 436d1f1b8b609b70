//! Request authentication: API-key check and HMAC-signed envelope check.
//!
//! Both checks are pure functions over the request headers and the shared
//! key. Every rejection is terminal for the request; nothing here retries
//! or mutates shared state.

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::json;
use subtle::ConstantTimeEq as _;
use thiserror::Error;
use tracing::{info, warn};

use otpd_common::{SignatureValidation, validate_signed_timestamp};

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Header carrying the unix timestamp of a signed request.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
/// Header carrying the hex HMAC-SHA256 digest of the timestamp.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Terminal rejection of a request by the authenticator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("X-API-Key header is required")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("X-Timestamp header is required")]
    MissingTimestamp,
    #[error("X-Signature header is required")]
    MissingSignature,
    #[error("X-Timestamp must be a unix integer")]
    MalformedTimestamp,
    #[error("Request timestamp is expired")]
    ExpiredTimestamp,
    #[error("Invalid request signature")]
    InvalidSignature,
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey
            | Self::MissingTimestamp
            | Self::MissingSignature
            | Self::ExpiredTimestamp => StatusCode::UNAUTHORIZED,
            Self::InvalidApiKey | Self::InvalidSignature => StatusCode::FORBIDDEN,
            Self::MalformedTimestamp => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Validates the `X-API-Key` header using constant-time comparison.
pub fn require_api_key(headers: &HeaderMap, api_key: &SecretString) -> Result<(), AuthError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingApiKey)?;

    let matches: bool = provided
        .as_bytes()
        .ct_eq(api_key.expose_secret().as_bytes())
        .into();
    if !matches {
        warn!("Rejected request with invalid API key");
        return Err(AuthError::InvalidApiKey);
    }
    Ok(())
}

/// Validates the HMAC-signed envelope headers.
///
/// Only meaningful after [`require_api_key`] has passed; the same key signs
/// the timestamp. Expected client computation:
///
/// `X-Signature = hex(hmac_sha256(key = api_key, message = X-Timestamp))`
pub fn require_signature(headers: &HeaderMap, api_key: &SecretString) -> Result<(), AuthError> {
    let timestamp = headers
        .get(TIMESTAMP_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingTimestamp)?;
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingSignature)?;

    match validate_signed_timestamp(timestamp, signature, api_key) {
        SignatureValidation::Valid => Ok(()),
        SignatureValidation::MalformedTimestamp => Err(AuthError::MalformedTimestamp),
        SignatureValidation::Expired => {
            info!("Rejected signed request with timestamp out of range");
            Err(AuthError::ExpiredTimestamp)
        }
        SignatureValidation::InvalidSignature => {
            info!("Rejected signed request with invalid signature");
            Err(AuthError::InvalidSignature)
        }
    }
}
