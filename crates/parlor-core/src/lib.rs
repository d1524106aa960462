//! # parlor-core: Pure Business Logic for Parlor
//!
//! This crate is the **heart** of Parlor. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Parlor Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /slots ──► /reservations ──► /payments ──► /tokens          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    parlor-engine                                │   │
//! │  │    scheduling, booking, settlement, stakes, claims             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ parlor-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   slots   │  │  ledger   │  │   │
//! │  │   │   Slot    │  │   Money   │  │ grid math │  │   fold    │  │   │
//! │  │   │Reservation│  │ FeeSplit  │  │           │  │   tiers   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              parlor-db / parlor-gateway                         │   │
//! │  │       SQLite repositories • payment provider client            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Slot, Reservation, SettlementRecord, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`slots`] - Pure slot grid generation
//! - [`lifecycle`] - Reservation state rules
//! - [`ledger`] - Balance folds, tiers, lock math
//! - [`error`] - Domain error types and classification
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use parlor_core::money::Money;
//! use parlor_core::types::CommissionRate;
//!
//! // Create money from paise (never from floats!)
//! let gross = Money::from_rupees(1500); // ₹1500.00
//!
//! // Settlement split at the 10% platform default
//! let split = gross.split_fee(CommissionRate::from_bps(1000));
//!
//! assert_eq!(split.fee.paise(), 15_000);
//! assert_eq!(split.fee + split.net, gross);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod money;
pub mod slots;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use parlor_core::Money` instead of
// `use parlor_core::money::Money`

pub use error::{CoreError, CoreResult, ErrorClass, ValidationError};
pub use money::{FeeSplit, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The single platform currency.
///
/// ## Why a constant?
/// The platform bills in INR only. The column exists on offerings and
/// reservations because settlements snapshot it, but nothing converts;
/// multi-currency would be a schema-compatible extension later.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Default platform commission in basis points (10%).
///
/// The effective rate is configuration: the settlement engine reads it
/// from `PlatformConfig` at settlement time, never from this constant
/// directly. This is only the documented fallback default.
pub const DEFAULT_COMMISSION_BPS: u32 = 1000;

/// Maximum slot duration: one full day.
pub const MAX_SLOT_DURATION_MINUTES: u32 = 1440;

/// Maximum bookings a single slot may admit.
///
/// ## Business Reason
/// Prevents accidental runaway capacity (e.g., typing 1000 instead of 10).
pub const MAX_SLOT_CAPACITY: i64 = 500;

/// Maximum stake lock commitment in months (10 years).
pub const MAX_LOCK_MONTHS: u32 = 120;

/// Maximum lock bonus multiplier in basis points (10x).
pub const MAX_MULTIPLIER_BPS: u32 = 100_000;
