//! HMAC signing and validation for timestamped request envelopes.
//!
//! A signed request carries a unix timestamp and a hex-encoded HMAC-SHA256
//! digest of the raw timestamp string, keyed by the shared API key. The
//! timestamp bounds the replay window; the digest is checked in constant
//! time.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret as _, SecretString};
use sha2::Sha256;

/// Maximum age in seconds of a signed request before it is rejected.
///
/// The bound is symmetric: timestamps up to this far in the future are also
/// accepted, so the replay window is identical for skew in either direction.
pub const SIGNATURE_MAX_AGE_SECONDS: u64 = 30;

/// Outcome of validating a signed timestamp envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureValidation {
    /// Timestamp and signature both check out.
    Valid,
    /// The timestamp is not a decimal integer.
    MalformedTimestamp,
    /// The timestamp is further than [`SIGNATURE_MAX_AGE_SECONDS`] from now.
    Expired,
    /// The signature does not match the timestamp under the shared key.
    InvalidSignature,
}

fn create_hmac(message: &str, key: &[u8]) -> Hmac<Sha256> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take a key of any size");
    mac.update(message.as_bytes());
    mac
}

/// Signs the raw timestamp string, returning a lowercase hex digest.
///
/// Clients of the signature-protected endpoint compute exactly this value
/// and send it alongside the timestamp.
#[must_use]
pub fn sign_timestamp(timestamp: &str, key: &SecretString) -> String {
    let mac = create_hmac(timestamp, key.expose_secret().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Gets the current Unix timestamp in seconds.
#[must_use]
pub fn unix_time_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

/// Validates `signature` over the raw `timestamp` string against `key`.
///
/// Checks run in order: timestamp format, timestamp age, signature. The
/// signature is verified over the timestamp exactly as provided, so client
/// and server must agree on the string byte-for-byte.
#[must_use]
pub fn validate_signed_timestamp(
    timestamp: &str,
    signature: &str,
    key: &SecretString,
) -> SignatureValidation {
    validate_signed_timestamp_at(timestamp, signature, key, unix_time_seconds())
}

/// Clock-injected form of [`validate_signed_timestamp`].
#[must_use]
pub fn validate_signed_timestamp_at(
    timestamp: &str,
    signature: &str,
    key: &SecretString,
    now: u64,
) -> SignatureValidation {
    let Ok(request_time) = timestamp.parse::<i64>() else {
        return SignatureValidation::MalformedTimestamp;
    };

    let age = (i128::from(request_time) - i128::from(now)).unsigned_abs();
    if age > u128::from(SIGNATURE_MAX_AGE_SECONDS) {
        return SignatureValidation::Expired;
    }

    // Undecodable hex cannot match any digest.
    let Ok(provided) = hex::decode(signature) else {
        return SignatureValidation::InvalidSignature;
    };

    let mac = create_hmac(timestamp, key.expose_secret().as_bytes());
    if mac.verify_slice(&provided).is_ok() {
        SignatureValidation::Valid
    } else {
        SignatureValidation::InvalidSignature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("k1")
    }

    #[test]
    fn signature_matches_known_digest() {
        // Cross-implementation fixture: HMAC-SHA256("1700000000") keyed by "k1".
        assert_eq!(
            sign_timestamp("1700000000", &key()),
            "a56caf8668ee5e3099710111777aab5278caa63d6725568d4ea4562dc7c3316f"
        );
    }

    #[test]
    fn fresh_signature_validates() {
        let now = 1_700_000_000;
        let timestamp = now.to_string();
        let signature = sign_timestamp(&timestamp, &key());
        assert_eq!(
            validate_signed_timestamp_at(&timestamp, &signature, &key(), now),
            SignatureValidation::Valid
        );
    }

    #[test]
    fn age_window_boundary_is_inclusive() {
        let now: u64 = 1_700_000_000;
        for (timestamp, expected) in [
            (now - 30, SignatureValidation::Valid),
            (now - 31, SignatureValidation::Expired),
            (now + 30, SignatureValidation::Valid),
            (now + 31, SignatureValidation::Expired),
        ] {
            let timestamp = timestamp.to_string();
            let signature = sign_timestamp(&timestamp, &key());
            assert_eq!(
                validate_signed_timestamp_at(&timestamp, &signature, &key(), now),
                expected,
                "timestamp {timestamp}"
            );
        }
    }

    #[test]
    fn negative_timestamps_are_expired() {
        let signature = sign_timestamp("-5", &key());
        assert_eq!(
            validate_signed_timestamp_at("-5", &signature, &key(), 1_700_000_000),
            SignatureValidation::Expired
        );
    }

    #[test]
    fn non_integer_timestamp_is_malformed() {
        for timestamp in ["", "soon", "170000000.5", "0x10"] {
            assert_eq!(
                validate_signed_timestamp_at(timestamp, "00", &key(), 1_700_000_000),
                SignatureValidation::MalformedTimestamp,
                "{timestamp:?}"
            );
        }
    }

    #[test]
    fn wrong_or_undecodable_signature_is_rejected() {
        let now = 1_700_000_000;
        let timestamp = now.to_string();
        let mut tampered = sign_timestamp(&timestamp, &key());
        tampered.replace_range(..1, if tampered.starts_with('a') { "b" } else { "a" });

        for signature in [tampered.as_str(), "zzzz", "", "abc"] {
            assert_eq!(
                validate_signed_timestamp_at(&timestamp, signature, &key(), now),
                SignatureValidation::InvalidSignature,
                "{signature:?}"
            );
        }
    }

    #[test]
    fn signature_covers_raw_string_not_parsed_value() {
        // "+5" and "05" parse to the same integer but sign differently.
        let now = 5;
        let signature = sign_timestamp("5", &key());
        assert_eq!(
            validate_signed_timestamp_at("05", &signature, &key(), now),
            SignatureValidation::InvalidSignature
        );
        assert_eq!(
            validate_signed_timestamp_at("5", &signature, &key(), now),
            SignatureValidation::Valid
        );
    }
}
