//! # Gateway Configuration
//!
//! Configuration is loaded from environment variables. Unlike most of the
//! platform's settings there are NO defaults here: an order API pointed at
//! the wrong host or a guessed callback secret are both worse failures
//! than refusing to start.

use std::env;

use crate::error::{GatewayError, GatewayResult};

/// Payment gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway's REST API.
    pub base_url: String,

    /// API key id (basic auth username).
    pub key_id: String,

    /// API secret. Signs callback verification and authenticates the
    /// order API. Required; there is no development fallback.
    pub secret: String,
}

impl GatewayConfig {
    /// Creates a configuration directly (tests, stubs).
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        GatewayConfig {
            base_url: base_url.into(),
            key_id: key_id.into(),
            secret: secret.into(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `PARLOR_GATEWAY_URL` | base URL of the order API |
    /// | `PARLOR_GATEWAY_KEY_ID` | API key id |
    /// | `PARLOR_GATEWAY_SECRET` | API / callback secret |
    ///
    /// All three are required. An empty value counts as missing.
    pub fn load() -> GatewayResult<Self> {
        Ok(GatewayConfig {
            base_url: required("PARLOR_GATEWAY_URL")?,
            key_id: required("PARLOR_GATEWAY_KEY_ID")?,
            secret: required("PARLOR_GATEWAY_SECRET")?,
        })
    }
}

fn required(var: &'static str) -> GatewayResult<String> {
    env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(GatewayError::MissingConfig { var })
}
