//! # Stake Ledger Module
//!
//! Pure derivations over the append-only token activity log.
//!
//! ## The Fold Is the Source of Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  activity_log (append-only, ordered)                                    │
//! │                                                                         │
//! │  [purchase 5000] [lock_initiated 3000] [lock_released 3000] ...        │
//! │        │                  │                    │                        │
//! │        ▼                  ▼                    ▼                        │
//! │  ┌───────────────────────────────────────────────────────────┐         │
//! │  │              compute_balances (pure fold)                 │         │
//! │  │                                                           │         │
//! │  │  purchase        available += a   lifetime += a           │         │
//! │  │  lock_initiated  available -= a   locked   += a           │         │
//! │  │  lock_released   available += a   locked   -= a           │         │
//! │  │  bonus_credited  available += a                           │         │
//! │  └───────────────────────────────────────────────────────────┘         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  { available, locked, lifetime, tier, next_tier, progress }            │
//! │                                                                         │
//! │  NO CACHED COUNTERS. Every read replays the log. Deterministic:        │
//! │  the same log always folds to the same balances.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tier classification runs off cumulative lifetime purchases only;
//! bonuses raise spendable balance but never tier standing.

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActivityKind, ActivityLogEntry};

// =============================================================================
// Tiers
// =============================================================================

/// Lifetime purchases strictly above this reach Patron.
pub const PATRON_THRESHOLD: i64 = 10_000;

/// Lifetime purchases strictly above this reach Legacy.
pub const LEGACY_THRESHOLD: i64 = 50_000;

/// Number of months in the activity series.
pub const MONTHLY_SERIES_LEN: usize = 6;

/// Loyalty tier, recomputed from lifetime purchases on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry tier.
    Collector,
    /// Lifetime > 10_000.
    Patron,
    /// Lifetime > 50_000. Top tier.
    Legacy,
}

// =============================================================================
// Balances
// =============================================================================

/// Everything a holder's ledger derives to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenBalances {
    /// Tokens spendable right now.
    pub available: i64,
    /// Tokens committed to active locks.
    pub locked: i64,
    /// Cumulative purchased tokens; drives tier.
    pub lifetime: i64,
    /// Current tier.
    pub tier: Tier,
    /// The next tier up, if any.
    pub next_tier: Option<Tier>,
    /// Progress toward the next tier, 0-100. 100 at the top tier.
    pub progress_pct: f64,
}

/// Folds an ordered activity log into balances and tier standing.
///
/// Pure and deterministic: no clock, no I/O, no cached state. Callers
/// supply the log in append order (the repository reads it ordered).
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use parlor_core::ledger::{compute_balances, Tier};
/// use parlor_core::types::{ActivityKind, ActivityLogEntry};
///
/// let now = Utc::now();
/// let entry = |kind, amount| ActivityLogEntry {
///     id: "e".to_string(),
///     holder_id: "u-1".to_string(),
///     kind,
///     amount,
///     metadata: None,
///     created_at: now,
/// };
///
/// let log = [
///     entry(ActivityKind::Purchase, 5000),
///     entry(ActivityKind::LockInitiated, 3000),
/// ];
/// let balances = compute_balances(&log);
/// assert_eq!(balances.available, 2000);
/// assert_eq!(balances.locked, 3000);
/// assert_eq!(balances.lifetime, 5000);
/// assert_eq!(balances.tier, Tier::Collector);
/// ```
pub fn compute_balances(entries: &[ActivityLogEntry]) -> TokenBalances {
    let mut available = 0i64;
    let mut locked = 0i64;
    let mut lifetime = 0i64;

    for entry in entries {
        match entry.kind {
            ActivityKind::Purchase => {
                available += entry.amount;
                lifetime += entry.amount;
            }
            ActivityKind::LockInitiated => {
                available -= entry.amount;
                locked += entry.amount;
            }
            ActivityKind::LockReleased => {
                available += entry.amount;
                locked -= entry.amount;
            }
            ActivityKind::BonusCredited => {
                available += entry.amount;
            }
        }
    }

    let (tier, next_tier, progress_pct) = tier_for(lifetime);
    TokenBalances {
        available,
        locked,
        lifetime,
        tier,
        next_tier,
        progress_pct,
    }
}

/// Classifies a lifetime total into tier, next tier, and progress.
///
/// Thresholds are strict: exactly 10_000 is still Collector, exactly
/// 50_000 is still Patron.
pub fn tier_for(lifetime: i64) -> (Tier, Option<Tier>, f64) {
    if lifetime > LEGACY_THRESHOLD {
        (Tier::Legacy, None, 100.0)
    } else if lifetime > PATRON_THRESHOLD {
        let span = (LEGACY_THRESHOLD - PATRON_THRESHOLD) as f64;
        let progress = ((lifetime - PATRON_THRESHOLD) as f64 / span * 100.0).clamp(0.0, 100.0);
        (Tier::Patron, Some(Tier::Legacy), progress)
    } else {
        let progress = (lifetime.max(0) as f64 / PATRON_THRESHOLD as f64 * 100.0).clamp(0.0, 100.0);
        (Tier::Collector, Some(Tier::Patron), progress)
    }
}

// =============================================================================
// Lock Math
// =============================================================================

/// Bonus granted for committing `principal` at the given multiplier:
/// `principal × (multiplier − 1)` in integer basis-point math.
///
/// ## Example
/// ```rust
/// use parlor_core::ledger::bonus_for;
///
/// // 1000 tokens at 1.2x for the lock term → 200 bonus tokens
/// assert_eq!(bonus_for(1000, 12_000), 200);
/// ```
pub fn bonus_for(principal: i64, multiplier_bps: u32) -> i64 {
    let extra_bps = multiplier_bps.saturating_sub(10_000) as i128;
    ((principal as i128 * extra_bps + 5000) / 10_000) as i64
}

/// The instant a lock opened now becomes releasable: `now` plus the
/// commitment in calendar months. Month-end days clamp (Jan 31 + 1 month
/// is the last day of February). None only on date overflow.
pub fn unlock_date_for(now: DateTime<Utc>, duration_months: u32) -> Option<DateTime<Utc>> {
    now.checked_add_months(Months::new(duration_months))
}

// =============================================================================
// Monthly Series
// =============================================================================

/// Running balances sampled at the end of each of the trailing six
/// calendar months, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    /// Month labels, "YYYY-MM", oldest first.
    pub months: Vec<String>,
    /// Available balance at each month end.
    pub available: Vec<i64>,
    /// Locked balance at each month end.
    pub locked: Vec<i64>,
}

/// Builds the trailing six-month balance series.
///
/// Months without activity carry the last known running value forward;
/// months before the first entry read zero. Entries older than the
/// window still seed the running totals, so the first sampled month
/// reflects everything up to its end.
pub fn build_monthly_series(entries: &[ActivityLogEntry], now: DateTime<Utc>) -> MonthlySeries {
    // Months as a flat index so window arithmetic is plain subtraction
    fn month_index(at: DateTime<Utc>) -> i32 {
        at.year() * 12 + at.month0() as i32
    }

    let newest = month_index(now);
    let oldest = newest - (MONTHLY_SERIES_LEN as i32 - 1);

    let mut months = Vec::with_capacity(MONTHLY_SERIES_LEN);
    let mut available = Vec::with_capacity(MONTHLY_SERIES_LEN);
    let mut locked = Vec::with_capacity(MONTHLY_SERIES_LEN);

    let mut run_available = 0i64;
    let mut run_locked = 0i64;
    let mut next_entry = 0usize;

    for index in oldest..=newest {
        while next_entry < entries.len() && month_index(entries[next_entry].created_at) <= index {
            let entry = &entries[next_entry];
            match entry.kind {
                ActivityKind::Purchase | ActivityKind::BonusCredited => {
                    run_available += entry.amount;
                }
                ActivityKind::LockInitiated => {
                    run_available -= entry.amount;
                    run_locked += entry.amount;
                }
                ActivityKind::LockReleased => {
                    run_available += entry.amount;
                    run_locked -= entry.amount;
                }
            }
            next_entry += 1;
        }

        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) + 1;
        months.push(format!("{year:04}-{month:02}"));
        available.push(run_available);
        locked.push(run_locked);
    }

    MonthlySeries {
        months,
        available,
        locked,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry_at(kind: ActivityKind, amount: i64, at: DateTime<Utc>) -> ActivityLogEntry {
        ActivityLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            holder_id: "holder-1".to_string(),
            kind,
            amount,
            metadata: None,
            created_at: at,
        }
    }

    fn entry(kind: ActivityKind, amount: i64) -> ActivityLogEntry {
        entry_at(kind, amount, Utc::now())
    }

    #[test]
    fn test_purchase_then_lock() {
        let log = [
            entry(ActivityKind::Purchase, 5000),
            entry(ActivityKind::LockInitiated, 3000),
        ];
        let balances = compute_balances(&log);
        assert_eq!(balances.available, 2000);
        assert_eq!(balances.locked, 3000);
        assert_eq!(balances.lifetime, 5000);
        assert_eq!(balances.tier, Tier::Collector);
        assert_eq!(balances.next_tier, Some(Tier::Patron));
        assert!((balances.progress_pct - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_release_returns_principal_and_bonus() {
        let log = [
            entry(ActivityKind::Purchase, 5000),
            entry(ActivityKind::LockInitiated, 3000),
            entry(ActivityKind::LockReleased, 3000),
            entry(ActivityKind::BonusCredited, 600),
        ];
        let balances = compute_balances(&log);
        assert_eq!(balances.available, 5600);
        assert_eq!(balances.locked, 0);
        // Bonus is not a purchase: lifetime unchanged
        assert_eq!(balances.lifetime, 5000);
    }

    #[test]
    fn test_fold_is_deterministic() {
        let log = [
            entry(ActivityKind::Purchase, 12_000),
            entry(ActivityKind::LockInitiated, 4000),
            entry(ActivityKind::Purchase, 2500),
            entry(ActivityKind::LockReleased, 4000),
            entry(ActivityKind::BonusCredited, 800),
        ];
        let first = compute_balances(&log);
        let second = compute_balances(&log);
        assert_eq!(first, second);
        assert_eq!(first.available, 15_300);
        assert_eq!(first.lifetime, 14_500);
    }

    #[test]
    fn test_empty_log() {
        let balances = compute_balances(&[]);
        assert_eq!(balances.available, 0);
        assert_eq!(balances.locked, 0);
        assert_eq!(balances.lifetime, 0);
        assert_eq!(balances.tier, Tier::Collector);
        assert_eq!(balances.progress_pct, 0.0);
    }

    #[test]
    fn test_tier_thresholds_are_strict() {
        assert_eq!(tier_for(10_000).0, Tier::Collector);
        assert_eq!(tier_for(10_001).0, Tier::Patron);
        assert_eq!(tier_for(50_000).0, Tier::Patron);
        assert_eq!(tier_for(50_001).0, Tier::Legacy);
    }

    #[test]
    fn test_patron_progress() {
        // (30_000 - 10_000) / 40_000 = 50%
        let (tier, next, progress) = tier_for(30_000);
        assert_eq!(tier, Tier::Patron);
        assert_eq!(next, Some(Tier::Legacy));
        assert!((progress - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_legacy_has_no_next_tier() {
        let (tier, next, progress) = tier_for(80_000);
        assert_eq!(tier, Tier::Legacy);
        assert_eq!(next, None);
        assert_eq!(progress, 100.0);
    }

    #[test]
    fn test_bonus_math() {
        // 1000 at 1.2x over the term → 200 bonus
        assert_eq!(bonus_for(1000, 12_000), 200);
        // 1.0x multiplier grants nothing
        assert_eq!(bonus_for(1000, 10_000), 0);
        // 2555 at 1.15x → 383.25 rounds to 383
        assert_eq!(bonus_for(2555, 11_500), 383);
    }

    #[test]
    fn test_unlock_date_six_months_out() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        let unlock = unlock_date_for(now, 6).unwrap();
        assert_eq!(unlock, Utc.with_ymd_and_hms(2026, 9, 14, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_unlock_date_clamps_month_end() {
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap();
        let unlock = unlock_date_for(now, 1).unwrap();
        assert_eq!(unlock, Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_monthly_series_forward_fills() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        let log = [
            // March: buy 10_000
            entry_at(
                ActivityKind::Purchase,
                10_000,
                Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap(),
            ),
            // May: lock 4000
            entry_at(
                ActivityKind::LockInitiated,
                4000,
                Utc.with_ymd_and_hms(2026, 5, 20, 10, 0, 0).unwrap(),
            ),
        ];

        let series = build_monthly_series(&log, now);
        assert_eq!(
            series.months,
            ["2026-03", "2026-04", "2026-05", "2026-06", "2026-07", "2026-08"]
        );
        // April carries March's value; June-August carry May's
        assert_eq!(series.available, [10_000, 10_000, 6000, 6000, 6000, 6000]);
        assert_eq!(series.locked, [0, 0, 4000, 4000, 4000, 4000]);
    }

    #[test]
    fn test_monthly_series_seeds_from_older_entries() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        // A purchase a year before the window still seeds the running total
        let log = [entry_at(
            ActivityKind::Purchase,
            7000,
            Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap(),
        )];

        let series = build_monthly_series(&log, now);
        assert_eq!(series.available, [7000; 6]);
        assert_eq!(series.locked, [0; 6]);
    }

    #[test]
    fn test_monthly_series_empty_log_reads_zero() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        let series = build_monthly_series(&[], now);
        assert_eq!(series.months.len(), MONTHLY_SERIES_LEN);
        assert_eq!(series.available, [0; 6]);
        assert_eq!(series.locked, [0; 6]);
    }
}
