//! Environment-driven configuration for the OTP service.
//!
//! All settings are read once at startup and are immutable for the process
//! lifetime. Missing or invalid values abort before the listener binds.

use std::env;

use eyre::{Result, WrapErr as _, bail, eyre};
use secrecy::SecretString;

use otpd_common::TotpEngine;

/// Process-wide immutable settings.
///
/// Holds the already-decoded TOTP engine so that an invalid `OTP_SECRET` is
/// caught here, not on the first request.
pub struct Settings {
    /// Engine for the shared TOTP secret.
    pub engine: TotpEngine,
    /// Shared API key; also keys the request-signature HMAC.
    pub api_key: SecretString,
    /// Bind address for the HTTP listener.
    pub host: String,
    /// TCP port for the HTTP listener.
    pub port: u16,
    /// Whether the route-index endpoint is served.
    pub enable_docs: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("engine", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("enable_docs", &self.enable_docs)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `API_KEY` or `OTP_SECRET` is missing or empty,
    /// when `OTP_SECRET` is not valid base32, or when `PORT` is not a valid
    /// port number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("API_KEY").unwrap_or_default();
        let otp_secret = lookup("OTP_SECRET").unwrap_or_default();

        let missing: Vec<&str> = [("API_KEY", &api_key), ("OTP_SECRET", &otp_secret)]
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}. Set them and restart.",
                missing.join(", ")
            );
        }

        let otp_secret = SecretString::from(otp_secret);
        let engine = TotpEngine::new(&otp_secret).map_err(|e| {
            eyre!("OTP_SECRET is not a valid base32 TOTP secret ({e}). Generate one with: otpd_helper new-secret")
        })?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .wrap_err("PORT must be a valid port number")?;

        let enable_docs = lookup("ENABLE_DOCS")
            .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "true" | "1"));

        Ok(Self {
            engine,
            api_key: SecretString::from(api_key),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            enable_docs,
        })
    }
}
