//! # Validation Module
//!
//! Input validation utilities for Parlor.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (deserialization)                               │
//! │  ├── Type validation (malformed JSON rejected)                         │
//! │  └── Immediate 400 feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine entry (Rust)                                          │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (duplicate guard, settlement idempotency)      │
//! │  ├── CHECK constraints (capacity bounds)                               │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use parlor_core::validation::{validate_slot_duration, validate_principal};
//!
//! // Validate before building a slot grid
//! validate_slot_duration(60).unwrap();
//!
//! // Validate before opening a stake lock
//! validate_principal(1000).unwrap();
//! ```

use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::{MAX_LOCK_MONTHS, MAX_MULTIPLIER_BPS, MAX_SLOT_CAPACITY, MAX_SLOT_DURATION_MINUTES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display title (offering, task).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use parlor_core::validation::validate_title;
///
/// assert!(validate_title("Fine-line session").is_ok());
/// assert!(validate_title("").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Time Validators
// =============================================================================

/// Validates a slot grid time range.
///
/// ## Rules
/// - End must be strictly after start (same-day range)
pub fn validate_time_range(start: NaiveTime, end: NaiveTime) -> ValidationResult<()> {
    if end <= start {
        return Err(ValidationError::EmptyTimeRange {
            field: "time_range".to_string(),
        });
    }

    Ok(())
}

/// Validates a slot duration in minutes.
///
/// ## Rules
/// - Must be positive
/// - Must fit inside one day
pub fn validate_slot_duration(minutes: u32) -> ValidationResult<()> {
    if minutes == 0 {
        return Err(ValidationError::MustBePositive {
            field: "duration_minutes".to_string(),
        });
    }

    if minutes > MAX_SLOT_DURATION_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: "duration_minutes".to_string(),
            min: 1,
            max: MAX_SLOT_DURATION_MINUTES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates slot booking capacity.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed MAX_SLOT_CAPACITY
pub fn validate_capacity(max_bookings: i64) -> ValidationResult<()> {
    if max_bookings <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "max_bookings".to_string(),
        });
    }

    if max_bookings > MAX_SLOT_CAPACITY {
        return Err(ValidationError::OutOfRange {
            field: "max_bookings".to_string(),
            min: 1,
            max: MAX_SLOT_CAPACITY,
        });
    }

    Ok(())
}

/// Validates an amount in paise.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free offerings)
///
/// ## Example
/// ```rust
/// use parlor_core::validation::validate_amount_paise;
///
/// assert!(validate_amount_paise(150_000).is_ok()); // ₹1500.00
/// assert!(validate_amount_paise(0).is_ok());       // Free offering
/// assert!(validate_amount_paise(-100).is_err());
/// ```
pub fn validate_amount_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stake lock principal.
///
/// ## Rules
/// - Must be strictly positive; a zero or negative lock is rejected
///   before anything touches the ledger
pub fn validate_principal(principal: i64) -> ValidationResult<()> {
    if principal <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "principal".to_string(),
        });
    }

    Ok(())
}

/// Validates a lock duration in calendar months.
pub fn validate_duration_months(months: u32) -> ValidationResult<()> {
    if months == 0 || months > MAX_LOCK_MONTHS {
        return Err(ValidationError::OutOfRange {
            field: "duration_months".to_string(),
            min: 1,
            max: MAX_LOCK_MONTHS as i64,
        });
    }

    Ok(())
}

/// Validates a lock bonus multiplier in basis points.
///
/// ## Rules
/// - At least 10_000 (1.0x, no bonus)
/// - At most MAX_MULTIPLIER_BPS
pub fn validate_multiplier_bps(bps: u32) -> ValidationResult<()> {
    if !(10_000..=MAX_MULTIPLIER_BPS).contains(&bps) {
        return Err(ValidationError::OutOfRange {
            field: "multiplier_bps".to_string(),
            min: 10_000,
            max: MAX_MULTIPLIER_BPS as i64,
        });
    }

    Ok(())
}

/// Validates a commission rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10_000 (0% to 100%)
pub fn validate_commission_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "commission_bps".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
///
/// ## Example
/// ```rust
/// use parlor_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
