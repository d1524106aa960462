//! # Error Types
//!
//! Domain-specific error types for parlor-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  parlor-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  parlor-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  parlor-gateway errors (separate crate)                                │
//! │  └── GatewayError     - Payment provider failures                      │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, capacities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every variant classifies into exactly one [`ErrorClass`], which
//!    decides retry semantics and the HTTP status at the edge

use thiserror::Error;

use crate::types::Role;

// =============================================================================
// Error Class
// =============================================================================

/// Coarse classification deciding how callers treat a failure.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Class       │ Meaning                          │ Retry?               │
/// │──────────────┼──────────────────────────────────┼──────────────────────│
/// │  Validation  │ Malformed input                  │ No - fix the input   │
/// │  Conflict    │ Lost a race / state disallows it │ No - definitive      │
/// │  Integrity   │ Signature mismatch               │ No - security event  │
/// │  Dependency  │ Gateway or store unavailable     │ Yes - with backoff   │
/// │  NotFound    │ Entity does not exist            │ No                   │
/// │  Forbidden   │ Caller lacks the required role   │ No                   │
/// │  Internal    │ Bug or unexpected failure        │ No - investigate     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Conflict,
    Integrity,
    Dependency,
    NotFound,
    Forbidden,
    Internal,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule rejections.
///
/// Conflict-class variants are definitive outcomes of races or state
/// guards: the loser is told exactly what happened and nothing is retried.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The slot's capacity was exhausted before this claim landed.
    ///
    /// ## When This Occurs
    /// - Two requesters race for the last opening; exactly one wins
    /// - The conditional increment matched zero rows
    #[error("Slot {slot_id} is fully booked")]
    SlotFull { slot_id: String },

    /// A slot cannot be deleted while live reservations reference it.
    #[error("Slot {slot_id} has {active} active booking(s) and cannot be deleted")]
    SlotHasBookings { slot_id: String, active: i64 },

    /// The requester already holds a non-cancelled reservation for this
    /// target.
    #[error("Requester {requester_id} is already registered for {target_id}")]
    AlreadyRegistered {
        requester_id: String,
        target_id: String,
    },

    /// The class or event reached its confirmed-registration cap.
    #[error("Target {target_id} is full (capacity {max_capacity})")]
    CapacityFull {
        target_id: String,
        max_capacity: i64,
    },

    /// The offering no longer accepts reservations (sold or archived).
    #[error("Offering {offering_id} is not available")]
    OfferingUnavailable { offering_id: String },

    /// The task already has an owner.
    #[error("Task {task_id} is already claimed")]
    AlreadyClaimed { task_id: String },

    /// A settlement already exists for this reservation. The original
    /// settlement stands; this delivery is a duplicate.
    #[error("Reservation {reservation_id} is already settled")]
    AlreadySettled { reservation_id: String },

    /// The callback signature did not match the expected HMAC.
    /// Security event: logged and rejected, never retried.
    #[error("Payment signature mismatch for order {order_id}")]
    SignatureMismatch { order_id: String },

    /// Settlement was attempted for a reservation that never went through
    /// the gateway (no order was created for it).
    #[error("Reservation {reservation_id} has no payment order")]
    MissingPaymentOrder { reservation_id: String },

    /// The lock's unlock date has not passed yet, or it already left the
    /// active state.
    #[error("Lock {lock_id} is not releasable")]
    NotReleasable { lock_id: String },

    /// Caller lacks the required role.
    #[error("Operation requires {required:?} role")]
    Forbidden { required: Role },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies the error for retry semantics and HTTP mapping.
    pub fn class(&self) -> ErrorClass {
        match self {
            CoreError::SlotFull { .. }
            | CoreError::SlotHasBookings { .. }
            | CoreError::AlreadyRegistered { .. }
            | CoreError::CapacityFull { .. }
            | CoreError::OfferingUnavailable { .. }
            | CoreError::AlreadyClaimed { .. }
            | CoreError::AlreadySettled { .. }
            | CoreError::NotReleasable { .. } => ErrorClass::Conflict,
            CoreError::SignatureMismatch { .. } => ErrorClass::Integrity,
            CoreError::MissingPaymentOrder { .. } => ErrorClass::Validation,
            CoreError::Forbidden { .. } => ErrorClass::Forbidden,
            CoreError::Validation(_) => ErrorClass::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A time range whose end does not come after its start.
    #[error("{field}: end must be after start")]
    EmptyTimeRange { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
