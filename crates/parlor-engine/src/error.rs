//! # Engine Error Type
//!
//! One error enum wrapping the three lower layers, with a [`class`]
//! classification the HTTP boundary maps to status codes.
//!
//! [`class`]: EngineError::class

use thiserror::Error;

use parlor_core::{CoreError, ErrorClass, ValidationError};
use parlor_db::DbError;
use parlor_gateway::GatewayError;

/// Anything an engine operation can fail with.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business rule rejection (race lost, state guard, bad input).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Payment gateway failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

// Lets engines use `?` on validators directly
impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::from(err))
    }
}

impl EngineError {
    /// Classifies the error for the HTTP status mapping.
    ///
    /// ## Rules
    /// - Core errors carry their own class
    /// - Db `NotFound` is a 404-class miss; everything else a db can throw
    ///   mid-operation is internal
    /// - Gateway request failures are retryable dependency errors; a
    ///   missing gateway configuration is an internal deployment fault
    pub fn class(&self) -> ErrorClass {
        match self {
            EngineError::Core(err) => err.class(),
            EngineError::Db(err) => {
                if err.is_not_found() {
                    ErrorClass::NotFound
                } else {
                    ErrorClass::Internal
                }
            }
            EngineError::Gateway(GatewayError::MissingConfig { .. }) => ErrorClass::Internal,
            EngineError::Gateway(_) => ErrorClass::Dependency,
        }
    }
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
