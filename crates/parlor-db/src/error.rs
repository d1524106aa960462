//! # Database Error Types
//!
//! Error handling for the database layer.
//!
//! ## Error Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow                                           │
//! │                                                                         │
//! │  sqlx::Error ──┐                                                       │
//! │                ├──→ DbError ──→ EngineError ──→ API response           │
//! │  MigrateError ─┘                                                       │
//! │                                                                         │
//! │  Repositories translate driver errors into domain-shaped ones:        │
//! │  • row missing            → DbError::NotFound { entity, id }          │
//! │  • UNIQUE index raced     → caller checks is_unique_violation()       │
//! │  • everything else        → DbError::Sqlx (bubbles up unchanged)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying sqlx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration failed
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Entity not found by ID
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the database violates an invariant the code relies on
    #[error("data integrity error: {0}")]
    Integrity(String),
}

impl DbError {
    /// Creates a NotFound error for the given entity and ID.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns true if this error is a UNIQUE constraint violation touching
    /// the given table or column.
    ///
    /// ## Why
    /// Some UNIQUE indexes are used as serialization points: concurrent
    /// writers race to them and the loser gets this violation. Callers that
    /// expect the race inspect the error and map it to a domain outcome
    /// (duplicate registration, repeated settlement) instead of a 500.
    ///
    /// SQLite reports the columns in the message, e.g.
    /// `UNIQUE constraint failed: settlements.reservation_id`, so matching
    /// on a substring is enough to tell indexes apart.
    pub fn is_unique_violation(&self, needle: &str) -> bool {
        match self {
            DbError::Sqlx(sqlx::Error::Database(db_err)) => {
                db_err.is_unique_violation() && db_err.message().contains(needle)
            }
            _ => false,
        }
    }

    /// Returns true if this error means "no rows matched".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::NotFound { .. } | DbError::Sqlx(sqlx::Error::RowNotFound)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = DbError::not_found("slot", "abc-123");
        assert_eq!(err.to_string(), "slot not found: abc-123");
        assert!(err.is_not_found());
    }

    #[test]
    fn row_not_found_counts_as_not_found() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_unique_violation("reservations"));

        let err = DbError::Integrity("bad row".into());
        assert!(!err.is_unique_violation("reservations"));
    }
}
