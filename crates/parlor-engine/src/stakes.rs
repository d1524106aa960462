//! # Stake Engine
//!
//! Token purchases, stake locks, and ledger reads. All balance numbers
//! are derived by folding the append-only activity log at read time;
//! this engine appends entries and never maintains a counter.
//!
//! ## Lock Lifecycle
//! ```text
//! initiate_lock             release (unlock_date passed)
//!      │                          │
//!      ▼                          ▼
//!  [active] ──────────────► [unlocked]        [forfeited] (staff, terminal)
//!      │                          │
//!  lock_initiated           lock_released + bonus_credited
//!  activity entry           activity entries (same transaction)
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use parlor_core::ledger::{
    build_monthly_series, bonus_for, compute_balances, unlock_date_for, MonthlySeries,
    TokenBalances,
};
use parlor_core::validation::{
    validate_amount_paise, validate_duration_months, validate_multiplier_bps, validate_principal,
    validate_uuid,
};
use parlor_core::{
    ActivityKind, ActivityLogEntry, CoreError, Identity, LockStatus, Role, StakeLock,
    ValidationError, MAX_LOCK_MONTHS,
};
use parlor_db::repository::stake::LockRelease;
use parlor_db::{Database, DbError};

use crate::error::EngineResult;

// =============================================================================
// Requests
// =============================================================================

/// Parameters for opening a stake lock.
#[derive(Debug, Clone)]
pub struct InitiateLockRequest {
    /// Tokens to commit.
    pub principal: i64,
    /// Commitment length in calendar months.
    pub duration_months: u32,
    /// Bonus multiplier in basis points (12000 = 1.2x).
    pub multiplier_bps: u32,
}

/// Parameters for recording a token purchase.
#[derive(Debug, Clone)]
pub struct RecordPurchaseRequest {
    /// Tokens bought.
    pub token_amount: i64,
    /// INR paid, in paise. Kept as metadata on the ledger entry.
    pub amount_inr_paise: Option<i64>,
}

// =============================================================================
// Stake Engine
// =============================================================================

/// Token ledger operations.
pub struct StakeEngine {
    db: Arc<Database>,
}

impl StakeEngine {
    /// Creates a stake engine over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        StakeEngine { db }
    }

    /// Opens a stake lock for the caller.
    ///
    /// The bonus is fixed here, `principal × (multiplier − 1)` in integer
    /// basis-point math, and granted only at release. The lock row and its
    /// `lock_initiated` ledger entry are written in one transaction.
    pub async fn initiate_lock(
        &self,
        caller: &Identity,
        req: InitiateLockRequest,
    ) -> EngineResult<StakeLock> {
        caller.require(Role::Member)?;
        validate_principal(req.principal)?;
        validate_duration_months(req.duration_months)?;
        validate_multiplier_bps(req.multiplier_bps)?;
        self.db.profiles().ensure_exists(&caller.id, caller.role).await?;

        let now = Utc::now();
        let unlock_date = unlock_date_for(now, req.duration_months).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "duration_months".to_string(),
                min: 1,
                max: MAX_LOCK_MONTHS as i64,
            }
        })?;

        let lock = StakeLock {
            id: Uuid::new_v4().to_string(),
            holder_id: caller.id.clone(),
            principal: req.principal,
            duration_months: req.duration_months,
            multiplier_bps: req.multiplier_bps,
            bonus: bonus_for(req.principal, req.multiplier_bps),
            unlock_date,
            status: LockStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.db.stakes().initiate_lock(&lock).await?;
        info!(
            lock_id = %lock.id,
            holder_id = %lock.holder_id,
            principal = lock.principal,
            bonus = lock.bonus,
            unlock_date = %lock.unlock_date,
            "stake lock opened"
        );
        Ok(lock)
    }

    /// Releases a matured lock. Holder or admin only.
    ///
    /// The status flip is conditional on `active` and a passed unlock
    /// date; principal and bonus return to the available balance through
    /// ledger entries appended in the same transaction.
    pub async fn release(&self, caller: &Identity, lock_id: &str) -> EngineResult<StakeLock> {
        caller.require(Role::Member)?;
        validate_uuid(lock_id)?;

        let lock = self.db.stakes().get_by_id(lock_id).await?;
        if lock.holder_id != caller.id {
            caller.require(Role::Admin)?;
        }

        match self.db.stakes().release(lock_id, Utc::now()).await? {
            LockRelease::Released(released) => {
                info!(
                    lock_id,
                    principal = released.principal,
                    bonus = released.bonus,
                    "stake lock released"
                );
                Ok(released)
            }
            LockRelease::NotReleasable => Err(CoreError::NotReleasable {
                lock_id: lock_id.to_string(),
            }
            .into()),
            LockRelease::NotFound => Err(DbError::not_found("stake lock", lock_id).into()),
        }
    }

    /// Appends a purchase to the caller's ledger.
    pub async fn record_purchase(
        &self,
        caller: &Identity,
        req: RecordPurchaseRequest,
    ) -> EngineResult<ActivityLogEntry> {
        caller.require(Role::Member)?;
        if req.token_amount <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "token_amount".to_string(),
            }
            .into());
        }
        if let Some(paise) = req.amount_inr_paise {
            validate_amount_paise(paise)?;
        }
        self.db.profiles().ensure_exists(&caller.id, caller.role).await?;

        let entry = ActivityLogEntry {
            id: Uuid::new_v4().to_string(),
            holder_id: caller.id.clone(),
            kind: ActivityKind::Purchase,
            amount: req.token_amount,
            metadata: req
                .amount_inr_paise
                .map(|paise| json!({ "amount_inr_paise": paise }).to_string()),
            created_at: Utc::now(),
        };
        self.db.stakes().append_activity(&entry).await?;
        debug!(
            holder_id = %entry.holder_id,
            amount = entry.amount,
            "token purchase recorded"
        );
        Ok(entry)
    }

    /// Folds the caller's ledger into balances and tier standing.
    pub async fn balances(&self, caller: &Identity) -> EngineResult<TokenBalances> {
        caller.require(Role::Member)?;
        let entries = self.db.stakes().list_activity(&caller.id).await?;
        Ok(compute_balances(&entries))
    }

    /// Trailing six-month balance series for the caller.
    pub async fn monthly_activity(&self, caller: &Identity) -> EngineResult<MonthlySeries> {
        caller.require(Role::Member)?;
        let entries = self.db.stakes().list_activity(&caller.id).await?;
        Ok(build_monthly_series(&entries, Utc::now()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use parlor_core::ledger::Tier;
    use parlor_core::ErrorClass;
    use parlor_db::DbConfig;

    use crate::error::EngineError;

    async fn test_db() -> Arc<Database> {
        Arc::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    fn holder() -> Identity {
        Identity::new("33333333-3333-3333-3333-333333333333", Role::Member)
    }

    async fn buy(engine: &StakeEngine, caller: &Identity, amount: i64) {
        engine
            .record_purchase(
                caller,
                RecordPurchaseRequest {
                    token_amount: amount,
                    amount_inr_paise: Some(amount * 100),
                },
            )
            .await
            .unwrap();
    }

    /// A lock whose unlock date has already passed, written through the
    /// repository the way the engine writes live ones.
    async fn seed_matured_lock(db: &Database, holder_id: &str, principal: i64, bonus: i64) -> String {
        let now = Utc::now();
        let lock = StakeLock {
            id: Uuid::new_v4().to_string(),
            holder_id: holder_id.to_string(),
            principal,
            duration_months: 6,
            multiplier_bps: 12_000,
            bonus,
            unlock_date: now - Duration::days(1),
            status: LockStatus::Active,
            created_at: now - Duration::days(200),
            updated_at: now - Duration::days(200),
        };
        db.stakes().initiate_lock(&lock).await.unwrap();
        lock.id
    }

    #[tokio::test]
    async fn test_lock_fixes_bonus_and_unlock_date() {
        let db = test_db().await;
        let engine = StakeEngine::new(db);
        let caller = holder();
        buy(&engine, &caller, 1000).await;

        let before = Utc::now();
        let lock = engine
            .initiate_lock(
                &caller,
                InitiateLockRequest {
                    principal: 1000,
                    duration_months: 6,
                    multiplier_bps: 12_000,
                },
            )
            .await
            .unwrap();

        // 1000 at 1.2x over six months: 200 bonus tokens
        assert_eq!(lock.bonus, 200);
        assert_eq!(lock.status, LockStatus::Active);
        // Six calendar months out, whatever their day counts
        assert!(lock.unlock_date >= before + Duration::days(178));
        assert!(lock.unlock_date <= before + Duration::days(187));
    }

    #[tokio::test]
    async fn test_balances_fold_purchase_and_lock() {
        let db = test_db().await;
        let engine = StakeEngine::new(db);
        let caller = holder();
        buy(&engine, &caller, 5000).await;
        engine
            .initiate_lock(
                &caller,
                InitiateLockRequest {
                    principal: 3000,
                    duration_months: 3,
                    multiplier_bps: 11_000,
                },
            )
            .await
            .unwrap();

        let balances = engine.balances(&caller).await.unwrap();
        assert_eq!(balances.available, 2000);
        assert_eq!(balances.locked, 3000);
        assert_eq!(balances.lifetime, 5000);
        assert_eq!(balances.tier, Tier::Collector);
    }

    #[tokio::test]
    async fn test_release_before_unlock_rejected() {
        let db = test_db().await;
        let engine = StakeEngine::new(db);
        let caller = holder();
        buy(&engine, &caller, 1000).await;
        let lock = engine
            .initiate_lock(
                &caller,
                InitiateLockRequest {
                    principal: 1000,
                    duration_months: 12,
                    multiplier_bps: 13_000,
                },
            )
            .await
            .unwrap();

        let err = engine.release(&caller, &lock.id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::NotReleasable { .. })
        ));
        assert_eq!(err.class(), ErrorClass::Conflict);
    }

    #[tokio::test]
    async fn test_release_returns_principal_and_bonus() {
        let db = test_db().await;
        let engine = StakeEngine::new(db.clone());
        let caller = holder();
        buy(&engine, &caller, 1000).await;
        let lock_id = seed_matured_lock(&db, &caller.id, 1000, 200).await;

        let released = engine.release(&caller, &lock_id).await.unwrap();
        assert_eq!(released.status, LockStatus::Unlocked);

        let balances = engine.balances(&caller).await.unwrap();
        assert_eq!(balances.available, 1200);
        assert_eq!(balances.locked, 0);
        // Bonus does not count toward tier lifetime
        assert_eq!(balances.lifetime, 1000);

        // Releasing again changes nothing
        let err = engine.release(&caller, &lock_id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::NotReleasable { .. })
        ));
        let balances = engine.balances(&caller).await.unwrap();
        assert_eq!(balances.available, 1200);
    }

    #[tokio::test]
    async fn test_release_requires_holder_or_admin() {
        let db = test_db().await;
        let engine = StakeEngine::new(db.clone());
        let caller = holder();
        buy(&engine, &caller, 1000).await;
        let lock_id = seed_matured_lock(&db, &caller.id, 1000, 200).await;

        let stranger = Identity::new("44444444-4444-4444-4444-444444444444", Role::Member);
        let err = engine.release(&stranger, &lock_id).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);

        let staff = Identity::new("admin-1", Role::Admin);
        engine.release(&staff, &lock_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_purchase_must_be_positive() {
        let db = test_db().await;
        let engine = StakeEngine::new(db);

        let err = engine
            .record_purchase(
                &holder(),
                RecordPurchaseRequest {
                    token_amount: 0,
                    amount_inr_paise: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
    }

    #[tokio::test]
    async fn test_monthly_activity_has_six_months() {
        let db = test_db().await;
        let engine = StakeEngine::new(db);
        let caller = holder();
        buy(&engine, &caller, 4000).await;

        let series = engine.monthly_activity(&caller).await.unwrap();
        assert_eq!(series.months.len(), 6);
        assert_eq!(*series.available.last().unwrap(), 4000);
        assert_eq!(*series.locked.last().unwrap(), 0);
    }
}
