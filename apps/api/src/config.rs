//! Server configuration, loaded from environment variables with defaults.
//!
//! Only the listen address and database path live here. The payment gateway
//! reads its own variables (see `parlor_gateway::GatewayConfig`) and has no
//! defaults at all; the platform commission is `parlor_engine::PlatformConfig`.

use std::env;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port the server binds on all interfaces.
    pub port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,
}

impl ApiConfig {
    /// Loads configuration from `PARLOR_API_PORT` and `PARLOR_DB_PATH`.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(ApiConfig {
            port: env::var("PARLOR_API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PARLOR_API_PORT".to_string()))?,

            database_path: env::var("PARLOR_DB_PATH").unwrap_or_else(|_| "parlor.db".to_string()),
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; one test owns them all
    #[test]
    fn test_load() {
        env::remove_var("PARLOR_API_PORT");
        env::remove_var("PARLOR_DB_PATH");
        let config = ApiConfig::load().expect("defaults");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, "parlor.db");

        env::set_var("PARLOR_API_PORT", "not-a-port");
        let result = ApiConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidValue(var)) if var == "PARLOR_API_PORT"));

        env::set_var("PARLOR_API_PORT", "9090");
        env::set_var("PARLOR_DB_PATH", "/tmp/parlor-test.db");
        let config = ApiConfig::load().expect("explicit values");
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, "/tmp/parlor-test.db");

        env::remove_var("PARLOR_API_PORT");
        env::remove_var("PARLOR_DB_PATH");
    }
}
