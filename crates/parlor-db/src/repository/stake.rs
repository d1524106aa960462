//! # Stake Repository
//!
//! Database operations for stake locks and the token activity log.
//!
//! ## The Activity Log Is the Ledger
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Balances are never stored. Every mutation appends entries here, and   │
//! │  reads replay the holder's entries through a pure fold in              │
//! │  parlor_core::ledger. That makes the log the single source of truth    │
//! │  and every lock operation a matter of appending the right rows         │
//! │  atomically with the lock-state change:                                │
//! │                                                                         │
//! │  initiate_lock:  lock row (active)   + lock_initiated(principal)       │
//! │  release:        lock row (unlocked) + lock_released(principal)        │
//! │                                      + bonus_credited(bonus)           │
//! │                                                                         │
//! │  Replay order is created_at then id, matching the read queries.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use parlor_core::{ActivityKind, ActivityLogEntry, LockStatus, StakeLock};

/// Outcome of a release attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LockRelease {
    /// The lock was released; principal and bonus entries were appended.
    Released(StakeLock),
    /// The lock exists but is not releasable (still locked, already
    /// released, or forfeited). Nothing changed.
    NotReleasable,
    /// No lock with that id exists.
    NotFound,
}

/// Repository for stake lock and activity log operations.
#[derive(Debug, Clone)]
pub struct StakeRepository {
    pool: SqlitePool,
}

impl StakeRepository {
    /// Creates a new StakeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StakeRepository { pool }
    }

    /// Creates a lock and its `lock_initiated` activity entry in one
    /// transaction. A lock without its entry (or the reverse) would make
    /// the replayed balances lie.
    pub async fn initiate_lock(&self, lock: &StakeLock) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO stake_locks (id, holder_id, principal, duration_months,
                                     multiplier_bps, bonus, unlock_date, status,
                                     created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lock.id)
        .bind(&lock.holder_id)
        .bind(lock.principal)
        .bind(lock.duration_months)
        .bind(lock.multiplier_bps)
        .bind(lock.bonus)
        .bind(lock.unlock_date)
        .bind(lock.status)
        .bind(lock.created_at)
        .bind(lock.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO activity_log (id, holder_id, kind, amount, metadata, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&lock.holder_id)
        .bind(ActivityKind::LockInitiated)
        .bind(lock.principal)
        .bind(serde_json::json!({ "lock_id": lock.id }).to_string())
        .bind(lock.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(lock_id = %lock.id, holder_id = %lock.holder_id, principal = lock.principal, "Initiated stake lock");
        Ok(())
    }

    /// Gets a lock by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<StakeLock> {
        sqlx::query_as::<_, StakeLock>("SELECT * FROM stake_locks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("stake lock", id))
    }

    /// Releases a lock whose unlock date has passed.
    ///
    /// The state flip is a conditional UPDATE on `status = 'active' AND
    /// unlock_date <= now`; two concurrent releases produce one winner and
    /// one `NotReleasable`, so principal and bonus are returned exactly
    /// once. Entries are appended in the same transaction as the flip.
    pub async fn release(&self, id: &str, now: DateTime<Utc>) -> DbResult<LockRelease> {
        let mut tx = self.pool.begin().await?;

        let lock: Option<StakeLock> =
            sqlx::query_as::<_, StakeLock>("SELECT * FROM stake_locks WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(mut lock) = lock else {
            return Ok(LockRelease::NotFound);
        };

        let flipped = sqlx::query(
            r#"
            UPDATE stake_locks
            SET status = 'unlocked', updated_at = ?
            WHERE id = ? AND status = 'active' AND unlock_date <= ?
            "#,
        )
        .bind(now)
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            debug!(
                lock_id = %id,
                status = ?lock.status,
                unlock_date = %lock.unlock_date,
                "Release refused"
            );
            return Ok(LockRelease::NotReleasable);
        }

        let metadata = serde_json::json!({ "lock_id": lock.id }).to_string();
        sqlx::query(
            r#"
            INSERT INTO activity_log (id, holder_id, kind, amount, metadata, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&lock.holder_id)
        .bind(ActivityKind::LockReleased)
        .bind(lock.principal)
        .bind(&metadata)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if lock.bonus > 0 {
            sqlx::query(
                r#"
                INSERT INTO activity_log (id, holder_id, kind, amount, metadata, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&lock.holder_id)
            .bind(ActivityKind::BonusCredited)
            .bind(lock.bonus)
            .bind(&metadata)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        lock.status = LockStatus::Unlocked;
        lock.updated_at = now;
        debug!(lock_id = %id, principal = lock.principal, bonus = lock.bonus, "Released stake lock");
        Ok(LockRelease::Released(lock))
    }

    /// Appends a standalone activity entry (token purchases).
    pub async fn append_activity(&self, entry: &ActivityLogEntry) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_log (id, holder_id, kind, amount, metadata, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.holder_id)
        .bind(entry.kind)
        .bind(entry.amount)
        .bind(&entry.metadata)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        debug!(holder_id = %entry.holder_id, kind = ?entry.kind, amount = entry.amount, "Appended activity");
        Ok(())
    }

    /// Lists a holder's activity entries in replay order.
    ///
    /// `created_at` then `id`: the same ordering every balance computation
    /// uses, so folds are deterministic.
    pub async fn list_activity(&self, holder_id: &str) -> DbResult<Vec<ActivityLogEntry>> {
        let entries = sqlx::query_as::<_, ActivityLogEntry>(
            "SELECT * FROM activity_log WHERE holder_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(holder_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
