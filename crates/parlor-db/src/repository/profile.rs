//! # Profile Repository
//!
//! Database operations for profiles and wallets.
//!
//! Identity and authentication live upstream; profile rows exist so that
//! foreign keys hold and wallets have somewhere to live. `ensure_exists`
//! materializes a row for a caller the first time they mutate anything.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use parlor_core::{Profile, Role};

/// Repository for profile database operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Inserts a profile.
    pub async fn insert(&self, profile: &Profile) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, display_name, role, wallet_balance_paise, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.display_name)
        .bind(profile.role)
        .bind(profile.wallet_balance_paise)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;

        debug!(profile_id = %profile.id, "Inserted profile");
        Ok(())
    }

    /// Creates a minimal profile row for the caller if none exists yet.
    ///
    /// Idempotent; an existing row (and its wallet balance) is left alone.
    pub async fn ensure_exists(&self, id: &str, role: Role) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, display_name, role, wallet_balance_paise, created_at)
            VALUES (?, ?, ?, 0, ?)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(id)
        .bind(role)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Gets a profile by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("profile", id))
    }

    /// Adds to a wallet balance.
    ///
    /// The only writer of `wallet_balance_paise` is the settlement engine,
    /// and the increment is relative, so concurrent settlements for one
    /// beneficiary cannot lose updates.
    pub async fn credit_wallet(&self, id: &str, amount_paise: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE profiles SET wallet_balance_paise = wallet_balance_paise + ? WHERE id = ?",
        )
        .bind(amount_paise)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("profile", id));
        }
        debug!(profile_id = %id, amount_paise, "Credited wallet");
        Ok(())
    }
}
