//! Client Configuration
//!
//! Settings for the backend base URL, target network and request
//! timeouts, with environment overrides and URL validation.

use crate::error::{WeblinkError, WeblinkResult};
use std::time::Duration;
use url::Url;

/// EIP-155 chain id the dashboard targets by default (Ropsten).
pub const DEFAULT_CHAIN_ID: u64 = 3;

/// Private per-user push destination.
pub const PRIVATE_CHANNEL: &str = "/user/topic/private";

/// Client settings, built once at session start and passed explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backend base URL, no trailing slash
    pub base_url: String,
    /// EIP-155 chain id used for transaction encoding
    pub chain_id: u64,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8443".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Validation result for a base URL
#[derive(Debug, Clone)]
pub struct BaseUrlValidation {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Settings {
    /// Build settings from defaults plus `WEBLINK_BASE_URL` and
    /// `WEBLINK_CHAIN_ID` environment overrides.
    pub fn from_env() -> WeblinkResult<Self> {
        let mut settings = Self::default();

        if let Ok(base) = std::env::var("WEBLINK_BASE_URL") {
            let validation = validate_base_url(&base);
            if !validation.is_valid {
                return Err(WeblinkError::invalid_input(format!(
                    "WEBLINK_BASE_URL rejected: {}",
                    validation.errors.join("; ")
                )));
            }
            settings.base_url = base.trim_end_matches('/').to_string();
        }

        if let Ok(chain) = std::env::var("WEBLINK_CHAIN_ID") {
            settings.chain_id = chain
                .parse()
                .map_err(|_| WeblinkError::invalid_input("WEBLINK_CHAIN_ID must be an integer"))?;
        }

        Ok(settings)
    }

    /// Callback URL the signing device posts a registration to
    pub fn register_callback_url(&self) -> String {
        format!("{}/account-add-hw", self.base_url)
    }

    /// Callback URL the signing device posts a signature to
    pub fn sign_callback_url(&self) -> String {
        format!("{}/account-transact-sign", self.base_url)
    }
}

/// Validate a backend base URL
pub fn validate_base_url(base: &str) -> BaseUrlValidation {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let parsed = match Url::parse(base) {
        Ok(u) => Some(u),
        Err(e) => {
            errors.push(format!("Invalid URL format: {}", e));
            None
        }
    };

    if let Some(url) = parsed {
        match url.scheme() {
            "https" => {}
            "http" => {
                // The signing device will refuse plain-http callbacks
                warnings.push("Base URL is not https; hardware callbacks may be rejected".to_string());
            }
            other => errors.push(format!("Unsupported scheme: {}", other)),
        }

        if url.host_str().is_none() {
            errors.push("Base URL has no host".to_string());
        }

        if !url.path().is_empty() && url.path() != "/" {
            warnings.push("Base URL has a path component; routes are appended verbatim".to_string());
        }
    }

    BaseUrlValidation {
        is_valid: errors.is_empty(),
        warnings,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chain_id, DEFAULT_CHAIN_ID);
        assert!(settings.base_url.starts_with("https://"));
    }

    #[test]
    fn test_callback_urls() {
        let settings = Settings {
            base_url: "https://wallet.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.register_callback_url(),
            "https://wallet.example.com/account-add-hw"
        );
        assert_eq!(
            settings.sign_callback_url(),
            "https://wallet.example.com/account-transact-sign"
        );
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("https://wallet.example.com").is_valid);

        let http = validate_base_url("http://localhost:8080");
        assert!(http.is_valid);
        assert!(!http.warnings.is_empty());

        let bad = validate_base_url("ftp://wallet.example.com");
        assert!(!bad.is_valid);

        assert!(!validate_base_url("not a url").is_valid);
    }
}
