//! # Gateway Error Types
//!
//! Failures at the payment provider boundary. Everything here is a
//! dependency-class error to callers (the provider is an external system
//! that may be down or misbehaving); signature problems are NOT gateway
//! errors, they are integrity rejections raised by the settlement engine.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors from the payment gateway boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required configuration variable is missing or empty.
    ///
    /// Deliberately fatal at startup. Running without the callback secret
    /// would mean accepting unverifiable payment callbacks.
    #[error("missing gateway configuration: {var}")]
    MissingConfig { var: &'static str },

    /// The HTTP request itself failed (connect, timeout, decode).
    #[error("gateway request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("gateway rejected request: status {status}")]
    Rejected { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_names_the_variable() {
        let err = GatewayError::MissingConfig {
            var: "PARLOR_GATEWAY_SECRET",
        };
        assert_eq!(
            err.to_string(),
            "missing gateway configuration: PARLOR_GATEWAY_SECRET"
        );
    }

    #[test]
    fn rejected_reports_status() {
        let err = GatewayError::Rejected {
            status: 503,
            body: "upstream unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }
}
