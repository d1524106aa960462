//! # Platform Configuration
//!
//! Commercial settings of the platform itself, as opposed to the gateway
//! credentials (parlor-gateway) and the serving socket (apps/api).
//!
//! Configuration is loaded from environment variables with validated
//! parsing; a value that parses but fails validation is rejected at
//! startup rather than at the first settlement.

use std::env;

use thiserror::Error;

use parlor_core::validation::validate_commission_bps;
use parlor_core::{CommissionRate, DEFAULT_COMMISSION_BPS};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set to something unusable.
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Platform-level commercial settings.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Commission withheld from every settlement, in basis points.
    pub commission_bps: u32,
}

impl PlatformConfig {
    /// Loads configuration from environment variables.
    ///
    /// | variable | default | meaning |
    /// |---|---|---|
    /// | `PARLOR_COMMISSION_BPS` | `1000` (10%) | settlement fee in basis points |
    pub fn load() -> Result<Self, ConfigError> {
        let commission_bps = env::var("PARLOR_COMMISSION_BPS")
            .unwrap_or_else(|_| DEFAULT_COMMISSION_BPS.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue {
                var: "PARLOR_COMMISSION_BPS",
                reason: "must be a non-negative integer".to_string(),
            })?;

        validate_commission_bps(commission_bps).map_err(|err| ConfigError::InvalidValue {
            var: "PARLOR_COMMISSION_BPS",
            reason: err.to_string(),
        })?;

        Ok(PlatformConfig { commission_bps })
    }

    /// The commission as a typed rate.
    pub fn commission(&self) -> CommissionRate {
        CommissionRate::from_bps(self.commission_bps)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig {
            commission_bps: DEFAULT_COMMISSION_BPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commission_is_ten_percent() {
        let config = PlatformConfig::default();
        assert_eq!(config.commission_bps, 1000);
        assert_eq!(config.commission().bps(), 1000);
    }

    #[test]
    fn test_load_rejects_out_of_range() {
        env::set_var("PARLOR_COMMISSION_BPS", "10001");
        assert!(PlatformConfig::load().is_err());

        env::set_var("PARLOR_COMMISSION_BPS", "not-a-number");
        assert!(PlatformConfig::load().is_err());

        env::set_var("PARLOR_COMMISSION_BPS", "250");
        let config = PlatformConfig::load().unwrap();
        assert_eq!(config.commission_bps, 250);

        env::remove_var("PARLOR_COMMISSION_BPS");
    }
}
