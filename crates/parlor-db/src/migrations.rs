//! # Database Migrations
//!
//! Embedded schema migrations using sqlx's migrate! macro.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Migration System                                     │
//! │                                                                         │
//! │  Build time:                                                            │
//! │  migrations/sqlite/*.sql ──(migrate! macro)──→ embedded in binary      │
//! │                                                                         │
//! │  Runtime:                                                               │
//! │  1. Check _sqlx_migrations table for applied versions                  │
//! │  2. Apply any pending migrations in order                              │
//! │  3. Record each applied migration with checksum                        │
//! │                                                                         │
//! │  Result: database schema always matches the binary                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Never edit an applied migration (checksums are verified)
//! - New changes always go in a new numbered file
//! - Migrations run automatically on [`Database::new`](crate::Database)

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the migrations/sqlite directory.
///
/// The path is relative to this crate's Cargo.toml.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations against the given pool.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Running database migrations");
    MIGRATOR.run(pool).await?;
    info!("Migrations complete");
    Ok(())
}

/// Returns the number of applied migrations.
///
/// Useful for health checks and debugging.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
