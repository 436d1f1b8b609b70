//! Shared core for the otpd service: TOTP passcodes and signed request envelopes.
//!
//! This crate provides:
//! - An RFC 6238 TOTP engine with clock-skew tolerant verification
//! - Timestamped HMAC-SHA256 request signing and validation
//! - Random base32 secret generation for enrollment

mod secrets;
mod signing;
mod totp;

pub use secrets::*;
pub use signing::*;
pub use totp::*;
