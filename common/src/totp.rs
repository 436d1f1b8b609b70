//! TOTP code generation and verification.
//!
//! Implements RFC 6238 with an HMAC-SHA1 inner hash, 6-digit codes and a
//! 30-second time-step. Verification tolerates one step of clock skew in
//! either direction.

use hmac::{Hmac, Mac};
use serde::Serialize;
use sha1::Sha1;
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;

use crate::signing::unix_time_seconds;

/// Length of a time-step in seconds.
pub const TIME_STEP_SECONDS: u64 = 30;

/// Number of decimal digits in a passcode.
pub const CODE_DIGITS: u32 = 6;

/// Error returned when the configured secret cannot be decoded.
#[derive(Debug, Error)]
pub enum SecretDecodeError {
    #[error("secret is not valid base32: {0}")]
    Encoding(#[from] data_encoding::DecodeError),
    #[error("secret must not be empty")]
    Empty,
}

/// A generated passcode together with its remaining validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpReading {
    /// The 6-digit passcode for the current time-step.
    pub otp: String,
    /// Seconds remaining before the code changes.
    pub valid_for_seconds: u64,
    /// Unix timestamp the reading was taken at.
    pub timestamp: u64,
}

/// Stateless TOTP generator and verifier for a single shared secret.
///
/// Construction decodes the base32 secret once; every later operation is
/// infallible and takes `&self`, so one instance can be shared across any
/// number of threads behind an `Arc` without locking.
pub struct TotpEngine {
    secret: Vec<u8>,
}

impl TotpEngine {
    /// Decodes a base32-encoded secret and builds an engine for it.
    ///
    /// The encoding is accepted case-insensitively, internal whitespace is
    /// stripped and trailing `=` padding is optional.
    ///
    /// # Errors
    ///
    /// Returns [`SecretDecodeError`] when the secret is empty or not valid
    /// base32. Callers are expected to treat this as fatal at startup.
    pub fn new(encoded: &secrecy::SecretString) -> Result<Self, SecretDecodeError> {
        use secrecy::ExposeSecret as _;

        let normalized: String = encoded
            .expose_secret()
            .split_whitespace()
            .collect::<String>()
            .to_ascii_uppercase();
        let normalized = normalized.trim_end_matches('=');
        if normalized.is_empty() {
            return Err(SecretDecodeError::Empty);
        }
        let secret = data_encoding::BASE32_NOPAD.decode(normalized.as_bytes())?;
        Ok(Self { secret })
    }

    /// Returns the current passcode and how long it remains valid.
    #[must_use]
    pub fn generate(&self) -> OtpReading {
        self.generate_at(unix_time_seconds())
    }

    /// Clock-injected form of [`generate`](Self::generate).
    ///
    /// Deterministic given (secret, `now`); no side effects.
    #[must_use]
    pub fn generate_at(&self, now: u64) -> OtpReading {
        OtpReading {
            otp: self.code_for_step(now / TIME_STEP_SECONDS),
            valid_for_seconds: TIME_STEP_SECONDS - (now % TIME_STEP_SECONDS),
            timestamp: now,
        }
    }

    /// Checks a candidate against the current time-step and its immediate
    /// neighbors (±30s of skew tolerance).
    ///
    /// A candidate of the wrong length or format simply fails to match.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        self.verify_at(candidate, unix_time_seconds())
    }

    /// Clock-injected form of [`verify`](Self::verify).
    ///
    /// The comparison is constant-time and accumulated over all three steps
    /// without early exit.
    #[must_use]
    pub fn verify_at(&self, candidate: &str, now: u64) -> bool {
        let step = now / TIME_STEP_SECONDS;
        let mut matched = Choice::from(0u8);
        for step in [step.saturating_sub(1), step, step + 1] {
            let expected = self.code_for_step(step);
            matched |= expected.as_bytes().ct_eq(candidate.as_bytes());
        }
        matched.into()
    }

    /// Computes the code for one time-step: HMAC-SHA1 over the big-endian
    /// counter, RFC 4226 dynamic truncation, reduced to [`CODE_DIGITS`].
    fn code_for_step(&self, step: u64) -> String {
        let mut mac = Hmac::<Sha1>::new_from_slice(&self.secret)
            .expect("HMAC can take a key of any size");
        mac.update(&step.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let offset = (digest[digest.len() - 1] & 0xf) as usize;
        let code = u32::from_be_bytes([
            digest[offset] & 0x7f,
            digest[offset + 1],
            digest[offset + 2],
            digest[offset + 3],
        ]) % 10u32.pow(CODE_DIGITS);
        format!("{code:06}")
    }
}
