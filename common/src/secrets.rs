//! Secret generation utilities for TOTP enrollment.

use rand::Rng as _;

const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Generates a random base32-encoded TOTP secret.
///
/// Returns 32 characters of the RFC 4648 base32 alphabet (160 bits), the
/// conventional length for authenticator enrollment.
#[must_use]
pub fn generate_secret() -> String {
    let mut rng = rand::rng();
    (0..32)
        .map(|_| BASE32_ALPHABET[rng.random_range(0..BASE32_ALPHABET.len())] as char)
        .collect()
}
