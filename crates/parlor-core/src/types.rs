//! # Domain Types
//!
//! Core domain types used throughout Parlor.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Slot       │   │   Reservation   │   │ SettlementRecord│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  date/start/end │   │  requester_id   │   │  reservation_id │       │
//! │  │  max_bookings   │   │  status         │   │  gross/fee/net  │       │
//! │  │  current_bookings│  │  payment_status │   │  (immutable)    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    StakeLock    │   │ ActivityLogEntry│   │      Task       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  principal      │   │  kind, amount   │   │  assigned_to    │       │
//! │  │  bonus          │   │  (append-only)  │   │  (NULL → owner) │       │
//! │  │  unlock_date    │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Caller-facing context (requester_id, holder_id) - stable references to
//!   profiles owned by the external identity provider

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Commission Rate
// =============================================================================

/// Platform commission rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10.00% (the platform default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRate(u32);

impl CommissionRate {
    /// Creates a commission rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        CommissionRate(bps)
    }

    /// Creates a commission rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        CommissionRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero commission.
    #[inline]
    pub const fn zero() -> Self {
        CommissionRate(0)
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        CommissionRate::zero()
    }
}

// =============================================================================
// Caller Identity
// =============================================================================

/// Caller role, as asserted by the upstream identity provider.
///
/// Ordering matters: later variants carry every permission of earlier ones,
/// so role checks are simple comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unauthenticated caller. Read-only access.
    Guest,
    /// Registered customer.
    Member,
    /// Studio staff with management permissions.
    Admin,
}

/// The authenticated caller of an operation.
///
/// Authentication itself happens upstream; every engine operation receives
/// the already-resolved identity and enforces its own role requirement
/// before mutating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Profile id of the caller (UUID).
    pub id: String,
    /// Asserted role.
    pub role: Role,
}

impl Identity {
    /// Creates an identity with the given id and role.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Identity {
            id: id.into(),
            role,
        }
    }

    /// Requires the caller to hold at least the given role.
    ///
    /// ## Example
    /// ```rust
    /// use parlor_core::types::{Identity, Role};
    ///
    /// let staff = Identity::new("u-1", Role::Admin);
    /// assert!(staff.require(Role::Admin).is_ok());
    ///
    /// let guest = Identity::new("u-2", Role::Guest);
    /// assert!(guest.require(Role::Member).is_err());
    /// ```
    pub fn require(&self, required: Role) -> Result<(), CoreError> {
        if self.role >= required {
            Ok(())
        } else {
            Err(CoreError::Forbidden { required })
        }
    }
}

// =============================================================================
// Slot
// =============================================================================

/// A bookable time interval with finite capacity.
///
/// Capacity invariant: `0 <= current_bookings <= max_bookings`, enforced by
/// the conditional-update claim in the database layer. `is_available` is
/// derived state and is never true while the slot is full.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Slot {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Calendar date of the slot.
    pub date: NaiveDate,

    /// Inclusive start of the interval.
    pub start_time: NaiveTime,

    /// Exclusive end of the interval.
    pub end_time: NaiveTime,

    /// Maximum concurrent bookings this slot admits.
    pub max_bookings: i64,

    /// Bookings consumed so far.
    pub current_bookings: i64,

    /// Derived: `current_bookings < max_bookings`.
    pub is_available: bool,

    /// Profile id of the staff member who created the slot.
    pub created_by: String,

    /// When the slot was created.
    pub created_at: DateTime<Utc>,

    /// When the slot was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Slot {
    /// Remaining booking capacity.
    #[inline]
    pub fn remaining(&self) -> i64 {
        self.max_bookings - self.current_bookings
    }

    /// Whether the slot has no capacity left.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.current_bookings >= self.max_bookings
    }
}

// =============================================================================
// Offering
// =============================================================================

/// What kind of thing a reservation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OfferingKind {
    /// A studio service booked against a slot (or flexibly, without one).
    Appointment,
    /// A class session, capacity-bounded by confirmed registrations.
    Class,
    /// A one-off marketplace item; sold exactly once.
    Listing,
}

/// Offering availability state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OfferingStatus {
    /// Open for reservations.
    Active,
    /// Listing consumed by a settlement. Terminal.
    Sold,
    /// Withdrawn by staff. Terminal.
    Archived,
}

/// Something a reservation can be made against: an appointment service,
/// a class session, or a marketplace listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Offering {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Discriminates the reservation flow applied to this offering.
    pub kind: OfferingKind,

    /// Display title.
    pub title: String,

    /// Optional long-form description.
    pub description: Option<String>,

    /// Price in paise. Zero means free: reservations against this
    /// offering bypass the payment gateway and confirm immediately.
    pub price_paise: i64,

    /// ISO currency code. Single-currency platform, always "INR" today;
    /// stored per offering because settlements snapshot it.
    pub currency: String,

    /// Profile credited on settlement.
    pub beneficiary_id: String,

    /// For classes: maximum confirmed registrations. None = unbounded.
    pub max_capacity: Option<i64>,

    /// For subscriptions: days of access granted at settlement.
    /// Drives the reservation's `expires_at`.
    pub subscription_days: Option<i64>,

    /// Availability state.
    pub status: OfferingStatus,

    /// When the offering was created.
    pub created_at: DateTime<Utc>,

    /// When the offering was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Offering {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Whether the offering costs nothing.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.price_paise == 0
    }

    /// Whether the offering accepts new reservations.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == OfferingStatus::Active
    }
}

// =============================================================================
// Reservation
// =============================================================================

/// How the requester intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay through the gateway before the booking is confirmed.
    Online,
    /// Pay at the studio; staff verify manually.
    AtVenue,
}

/// Progress of payment collection for a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No verified payment yet.
    Pending,
    /// Payment verified and settled.
    Completed,
}

/// Booking lifecycle state. Orthogonal to [`PaymentStatus`]: a reservation
/// can be confirmed with payment pending (verified at the venue) and the
/// two axes only meet at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Awaiting manual confirmation by staff (pay-at-venue and flexible
    /// bookings start here).
    PendingVerification,
    /// Awaiting gateway payment (online bookings start here).
    PaymentPending,
    /// Booking holds. Settlement or a free offering lands here.
    Confirmed,
    /// Withdrawn by the requester or staff. Terminal.
    Cancelled,
}

/// A requester's claim against a slot, class, or listing, carrying its
/// payment lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Reservation {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Profile id of the requester. The reservation is owned exclusively
    /// by this profile; only the owner (or staff) may cancel it.
    pub requester_id: String,

    /// The offering this reservation targets.
    pub target_id: String,

    /// The slot consumed by this reservation, if it is slot-backed.
    /// None for flexible appointments, classes, and listings.
    pub slot_id: Option<String>,

    /// Price frozen at reservation time, in paise. Settlement reads the
    /// gross from here, never from the payment callback.
    pub amount_paise: i64,

    /// ISO currency code snapshot.
    pub currency: String,

    /// How the requester pays.
    pub payment_method: PaymentMethod,

    /// Payment axis of the lifecycle.
    pub payment_status: PaymentStatus,

    /// Booking axis of the lifecycle.
    pub status: ReservationStatus,

    /// Gateway order id, persisted before the reserve call returns.
    pub external_order_id: Option<String>,

    /// Gateway payment id, recorded at settlement.
    pub external_payment_id: Option<String>,

    /// Subscription expiry computed at settlement. A confirmed
    /// reservation past this instant is inactive to every read path;
    /// the row itself is never flipped by a background job.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the reservation was created.
    pub created_at: DateTime<Utc>,

    /// When the reservation was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Returns the frozen amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }

    /// Lazy expiry check: confirmed and not past `expires_at`.
    ///
    /// Expiry is evaluated against the clock at read time. There is no
    /// background job flipping expired rows; `status` stays `Confirmed`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Confirmed
            && self.expires_at.map_or(true, |expiry| expiry > now)
    }
}

// =============================================================================
// Settlement Record
// =============================================================================

/// Immutable record of a settled payment. One per reservation, enforced by
/// a uniqueness constraint on `reservation_id`; that constraint is the
/// idempotency serialization point for duplicate gateway callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SettlementRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The settled reservation. UNIQUE.
    pub reservation_id: String,

    /// Who paid.
    pub payer_id: String,

    /// Who was credited.
    pub beneficiary_id: String,

    /// Amount collected, in paise. Copied from the reservation.
    pub gross_paise: i64,

    /// Commission rate applied, in basis points (1000 = 10%).
    pub fee_bps: u32,

    /// Amount credited to the beneficiary wallet, in paise.
    /// `gross - fee`, where fee absorbs the rounding.
    pub net_paise: i64,

    /// When the settlement committed.
    pub created_at: DateTime<Utc>,
}

impl SettlementRecord {
    /// Gross amount as Money.
    #[inline]
    pub fn gross(&self) -> Money {
        Money::from_paise(self.gross_paise)
    }

    /// Net amount as Money.
    #[inline]
    pub fn net(&self) -> Money {
        Money::from_paise(self.net_paise)
    }

    /// Fee withheld as Money.
    #[inline]
    pub fn fee(&self) -> Money {
        Money::from_paise(self.gross_paise - self.net_paise)
    }
}

// =============================================================================
// Stake Lock
// =============================================================================

/// Lifecycle of a stake lock. May leave `Active` only once the unlock
/// date has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum LockStatus {
    /// Principal is committed and unavailable.
    Active,
    /// Principal and bonus returned to the available balance.
    Unlocked,
    /// Lock voided by staff; principal not returned. Terminal.
    Forfeited,
}

/// Tokens committed for a fixed duration in exchange for a bonus.
///
/// `principal` is immutable for the life of the lock. The bonus is fixed
/// at creation: `principal × (multiplier − 1)` in integer bps math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StakeLock {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Profile that committed the tokens.
    pub holder_id: String,

    /// Tokens committed. Immutable.
    pub principal: i64,

    /// Commitment length in calendar months.
    pub duration_months: u32,

    /// Bonus multiplier in basis points (12000 = 1.2x).
    pub multiplier_bps: u32,

    /// Bonus tokens granted at release, fixed at creation.
    pub bonus: i64,

    /// Instant after which the lock may be released.
    pub unlock_date: DateTime<Utc>,

    /// Lock lifecycle state.
    pub status: LockStatus,

    /// When the lock was created.
    pub created_at: DateTime<Utc>,

    /// When the lock was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StakeLock {
    /// Whether the lock may be released at the given instant.
    pub fn is_releasable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == LockStatus::Active && now >= self.unlock_date
    }
}

// =============================================================================
// Activity Log
// =============================================================================

/// What an activity entry records.
///
/// Each kind moves exactly one or two running totals in the balance fold;
/// see `ledger::compute_balances` for the authoritative semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Tokens bought. Raises available and lifetime.
    Purchase,
    /// Principal committed to a lock. Moves available into locked.
    LockInitiated,
    /// Principal returned from a released lock. Moves locked back into
    /// available.
    LockReleased,
    /// Bonus granted on release. Raises available only; a bonus is not a
    /// purchase and does not count toward tier lifetime.
    BonusCredited,
}

/// Append-only token activity entry. The activity log is the sole source
/// of truth for balances and tier: totals are recomputed from it on every
/// read, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityLogEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Profile whose ledger this entry belongs to.
    pub holder_id: String,

    /// What happened.
    pub kind: ActivityKind,

    /// Token amount moved. Always positive; direction comes from `kind`.
    pub amount: i64,

    /// Optional JSON context (lock id, INR paid, etc.).
    pub metadata: Option<String>,

    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Task
// =============================================================================

/// A unit of staff work claimable by exactly one person.
///
/// Ownership transfers through a conditional update permitted only from
/// the unassigned state; two concurrent claims produce one winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Task {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// What needs doing.
    pub title: String,

    /// Optional detail.
    pub notes: Option<String>,

    /// Profile that created the task.
    pub created_by: String,

    /// Current owner. None until claimed.
    pub assigned_to: Option<String>,

    /// When ownership transferred.
    pub claimed_at: Option<DateTime<Utc>>,

    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task has an owner.
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.assigned_to.is_some()
    }
}

// =============================================================================
// Profile
// =============================================================================

/// A platform participant: customer, artist, or staff. Identity and
/// authentication live upstream; this row carries what the engines need,
/// chiefly the wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    /// Unique identifier (UUID v4), shared with the identity provider.
    pub id: String,

    /// Display name.
    pub display_name: String,

    /// Platform role.
    pub role: Role,

    /// Wallet balance in paise. Credited only by the settlement engine.
    pub wallet_balance_paise: i64,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Wallet balance as Money.
    #[inline]
    pub fn wallet_balance(&self) -> Money {
        Money::from_paise(self.wallet_balance_paise)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_commission_rate_from_bps() {
        let rate = CommissionRate::from_bps(1000);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_commission_rate_from_percentage() {
        let rate = CommissionRate::from_percentage(10.0);
        assert_eq!(rate.bps(), 1000);
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::Member);
        assert!(Role::Member > Role::Guest);
    }

    #[test]
    fn test_identity_require() {
        let admin = Identity::new("u-1", Role::Admin);
        assert!(admin.require(Role::Guest).is_ok());
        assert!(admin.require(Role::Admin).is_ok());

        let member = Identity::new("u-2", Role::Member);
        assert!(member.require(Role::Member).is_ok());
        assert!(member.require(Role::Admin).is_err());
    }

    #[test]
    fn test_slot_capacity_helpers() {
        let now = Utc::now();
        let slot = Slot {
            id: "s-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            max_bookings: 3,
            current_bookings: 2,
            is_available: true,
            created_by: "staff-1".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(slot.remaining(), 1);
        assert!(!slot.is_full());
    }

    #[test]
    fn test_reservation_lazy_expiry() {
        let now = Utc::now();
        let mut reservation = Reservation {
            id: "r-1".to_string(),
            requester_id: "u-1".to_string(),
            target_id: "o-1".to_string(),
            slot_id: None,
            amount_paise: 150_000,
            currency: "INR".to_string(),
            payment_method: PaymentMethod::Online,
            payment_status: PaymentStatus::Completed,
            status: ReservationStatus::Confirmed,
            external_order_id: Some("order_1".to_string()),
            external_payment_id: Some("pay_1".to_string()),
            expires_at: Some(now + Duration::days(30)),
            created_at: now,
            updated_at: now,
        };
        assert!(reservation.is_active_at(now));

        // Past the expiry instant the row reads as inactive even though
        // status is still Confirmed.
        assert!(!reservation.is_active_at(now + Duration::days(31)));
        assert_eq!(reservation.status, ReservationStatus::Confirmed);

        // No expiry recorded means the reservation never lapses.
        reservation.expires_at = None;
        assert!(reservation.is_active_at(now + Duration::days(3650)));

        reservation.status = ReservationStatus::Cancelled;
        assert!(!reservation.is_active_at(now));
    }

    #[test]
    fn test_settlement_fee_reconstruction() {
        let record = SettlementRecord {
            id: "st-1".to_string(),
            reservation_id: "r-1".to_string(),
            payer_id: "u-1".to_string(),
            beneficiary_id: "artist-1".to_string(),
            gross_paise: 150_000,
            fee_bps: 1000,
            net_paise: 135_000,
            created_at: Utc::now(),
        };
        assert_eq!(record.fee().paise(), 15_000);
        assert_eq!(record.gross(), record.fee() + record.net());
    }

    #[test]
    fn test_stake_lock_releasable() {
        let now = Utc::now();
        let lock = StakeLock {
            id: "l-1".to_string(),
            holder_id: "u-1".to_string(),
            principal: 1000,
            duration_months: 6,
            multiplier_bps: 12_000,
            bonus: 200,
            unlock_date: now + Duration::days(180),
            status: LockStatus::Active,
            created_at: now,
            updated_at: now,
        };
        assert!(!lock.is_releasable_at(now));
        assert!(lock.is_releasable_at(now + Duration::days(181)));

        let released = StakeLock {
            status: LockStatus::Unlocked,
            ..lock
        };
        assert!(!released.is_releasable_at(now + Duration::days(181)));
    }
}
