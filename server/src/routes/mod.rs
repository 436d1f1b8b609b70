//! HTTP route definitions for the OTP service.

mod otp;

use axum::{
    Router,
    routing::{get, post},
};

use crate::http::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(otp::health))
        .route("/otp", get(otp::get_otp))
        .route("/otp/verify", post(otp::verify_otp))
        .route("/otp/secure", get(otp::get_otp_secure))
        .route("/docs", get(otp::docs))
}
