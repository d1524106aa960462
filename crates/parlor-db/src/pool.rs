//! # Database Connection Pool
//!
//! Connection pool management for SQLite.
//!
//! ## Configuration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SQLite Configuration                                 │
//! │                                                                         │
//! │  WAL mode          → readers never block the writer                    │
//! │  synchronous=NORMAL → safe with WAL, much faster than FULL             │
//! │  foreign_keys=ON   → SQLite defaults them OFF, we want them ON         │
//! │  busy_timeout=5s   → writers queue instead of failing instantly        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## In-Memory Databases
//! An in-memory SQLite database lives and dies with its connection, so
//! [`DbConfig::in_memory`] pins the pool to a single connection. Tests get
//! a fresh, fully migrated schema per `Database::new` call.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::migrations::run_migrations;
use crate::repository::offering::OfferingRepository;
use crate::repository::profile::ProfileRepository;
use crate::repository::reservation::ReservationRepository;
use crate::repository::settlement::SettlementRepository;
use crate::repository::slot::SlotRepository;
use crate::repository::stake::StakeRepository;
use crate::repository::task::TaskRepository;

/// In-memory marker path.
const MEMORY_PATH: &str = ":memory:";

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub path: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// How long a writer waits for the lock before giving up.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Creates a configuration for a file-backed database.
    pub fn new(path: impl Into<String>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Creates a configuration for an in-memory database (tests).
    ///
    /// Single connection: the database vanishes when its connection does,
    /// and separate pool connections would each see their own empty db.
    pub fn in_memory() -> Self {
        DbConfig {
            path: MEMORY_PATH.to_string(),
            max_connections: 1,
            busy_timeout: Duration::from_secs(5),
        }
    }

    fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }
}

/// Handle to the database: owns the pool, hands out repositories.
///
/// Cheap to clone (the pool is reference-counted internally), so it can be
/// shared across request handlers.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./parlor.db")).await?;
/// let slot = db.slots().get_by_id(&slot_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects to the database and runs pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path, "Connecting to database");

        let options = if config.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", config.path))?
        };

        let options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;

        debug!("Database ready");
        Ok(Database { pool })
    }

    /// Raw pool access for multi-repository transactions.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Slot repository.
    pub fn slots(&self) -> SlotRepository {
        SlotRepository::new(self.pool.clone())
    }

    /// Offering repository.
    pub fn offerings(&self) -> OfferingRepository {
        OfferingRepository::new(self.pool.clone())
    }

    /// Reservation repository.
    pub fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.pool.clone())
    }

    /// Settlement repository.
    pub fn settlements(&self) -> SettlementRepository {
        SettlementRepository::new(self.pool.clone())
    }

    /// Stake lock repository.
    pub fn stakes(&self) -> StakeRepository {
        StakeRepository::new(self.pool.clone())
    }

    /// Task repository.
    pub fn tasks(&self) -> TaskRepository {
        TaskRepository::new(self.pool.clone())
    }

    /// Profile repository.
    pub fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(self.pool.clone())
    }

    /// Verifies the database responds to queries.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Closes all pool connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::migration_status;

    #[tokio::test]
    async fn in_memory_database_migrates_on_connect() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let applied = migration_status(db.pool()).await.unwrap();
        assert!(applied >= 1, "expected at least one applied migration");

        db.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Insert a slot pointing at a creator profile that does not exist
        let result = sqlx::query(
            "INSERT INTO slots (id, date, start_time, end_time,
                                max_bookings, current_bookings, is_available,
                                created_by, created_at, updated_at)
             VALUES ('s1', '2026-01-01', '10:00:00', '11:00:00',
                     1, 0, 1, 'nobody', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err(), "orphan row should violate FK");
    }
}
