//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a settlement engine that splits every payment:                      │
//! │    ₹100.00 × 10% fee = ₹10.000000001 → beneficiary short-changed       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    10000 paise × 1000 bps = 1000 paise fee, 9000 paise net             │
//! │    fee + net == gross, ALWAYS — no value created or destroyed          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use parlor_core::money::Money;
//! use parlor_core::types::CommissionRate;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(150_000); // ₹1500.00
//!
//! // Split into platform fee and beneficiary net
//! let split = price.split_fee(CommissionRate::from_bps(1000)); // 10%
//! assert_eq!(split.fee.paise(), 15_000);
//! assert_eq!(split.net.paise(), 135_000);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::types::CommissionRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Offering.price_paise ──► Reservation.amount_paise (frozen at booking) │
/// │                                    │                                    │
/// │                                    ▼                                    │
/// │                       Gateway order (paise == gateway minor units)     │
/// │                                    │                                    │
/// │                                    ▼                                    │
/// │              split_fee ──► SettlementRecord { gross, fee, net }        │
/// │                                    │                                    │
/// │                                    ▼                                    │
/// │                       Wallet credit (net)                              │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

/// The result of splitting a gross amount into platform fee and
/// beneficiary net.
///
/// Invariant: `fee + net == gross` for the amount the split was taken from.
/// The fee absorbs the rounding, the net is the exact remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Platform commission withheld from the gross amount.
    pub fee: Money,
    /// Amount credited to the beneficiary.
    pub net: Money,
}

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use parlor_core::money::Money;
    ///
    /// let price = Money::from_paise(109_900); // Represents ₹1099.00
    /// assert_eq!(price.paise(), 109_900);
    /// ```
    ///
    /// ## Why Paise?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and gateway API all use paise: the
    /// payment gateway bills in minor units (rupees × 100), so the
    /// stored value is forwarded as-is with no conversion step.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use parlor_core::money::Money;
    ///
    /// let price = Money::from_rupees(1500); // ₹1500.00
    /// assert_eq!(price.paise(), 150_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise (smallest currency unit).
    ///
    /// This is also the amount sent to the payment gateway, which bills
    /// in minor units.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    ///
    /// ## Example
    /// ```rust
    /// use parlor_core::money::Money;
    ///
    /// let price = Money::from_paise(109_950);
    /// assert_eq!(price.rupees(), 1099);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (paise) portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    ///
    /// A zero-price offering bypasses the payment gateway entirely: the
    /// reservation is confirmed immediately at creation.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Splits this gross amount into platform fee and beneficiary net.
    ///
    /// ## Arithmetic
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  FEE SPLIT (total-preserving)                                       │
    /// │                                                                     │
    /// │  fee = round_half_up(gross × rate)                                  │
    /// │  net = gross − fee            ← exact remainder, never recomputed   │
    /// │                                                                     │
    /// │  fee + net == gross on every input. A settlement must neither      │
    /// │  create nor destroy a single paisa.                                │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// Integer math in i128: `(gross × bps + 5000) / 10000`.
    /// The +5000 provides half-up rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use parlor_core::money::Money;
    /// use parlor_core::types::CommissionRate;
    ///
    /// let gross = Money::from_paise(150_000);         // ₹1500.00
    /// let split = gross.split_fee(CommissionRate::from_bps(1000)); // 10%
    ///
    /// assert_eq!(split.fee.paise(), 15_000);  // ₹150.00 platform
    /// assert_eq!(split.net.paise(), 135_000); // ₹1350.00 beneficiary
    /// assert_eq!(split.fee + split.net, gross);
    /// ```
    pub fn split_fee(&self, rate: CommissionRate) -> FeeSplit {
        // i128 prevents overflow on large amounts
        let fee_paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        let fee = Money::from_paise(fee_paise as i64);
        FeeSplit {
            fee,
            net: Money(self.0 - fee.0),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. API responses carry raw paise and let
/// clients localize.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
