//! # Reservation Lifecycle Rules
//!
//! Pure decision rules for the two lifecycle axes of a reservation.
//!
//! ## Initial State Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price       payment_method  →  status                payment_status   │
//! │  ──────────  ──────────────     ────────────────────  ──────────────   │
//! │  zero        (any)           →  confirmed             completed        │
//! │  non-zero    online          →  payment_pending       pending          │
//! │  non-zero    at_venue        →  pending_verification  pending          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Free registrations bypass the payment gateway entirely: no order is
//! created and the booking confirms at creation. Pay-at-venue bookings,
//! slot-backed or flexible, wait for staff verification. Online bookings
//! wait for the gateway payment regardless of whether a slot is attached.

use crate::money::Money;
use crate::types::{PaymentMethod, PaymentStatus, ReservationStatus};

/// Decides the initial `(status, payment_status)` pair for a new
/// reservation.
///
/// ## Example
/// ```rust
/// use parlor_core::lifecycle::initial_states;
/// use parlor_core::money::Money;
/// use parlor_core::types::{PaymentMethod, PaymentStatus, ReservationStatus};
///
/// let (status, payment) = initial_states(PaymentMethod::Online, Money::from_paise(150_000));
/// assert_eq!(status, ReservationStatus::PaymentPending);
/// assert_eq!(payment, PaymentStatus::Pending);
///
/// // Free offerings confirm immediately, no gateway round-trip
/// let (status, payment) = initial_states(PaymentMethod::Online, Money::zero());
/// assert_eq!(status, ReservationStatus::Confirmed);
/// assert_eq!(payment, PaymentStatus::Completed);
/// ```
pub fn initial_states(method: PaymentMethod, price: Money) -> (ReservationStatus, PaymentStatus) {
    if price.is_zero() {
        return (ReservationStatus::Confirmed, PaymentStatus::Completed);
    }
    match method {
        PaymentMethod::Online => (ReservationStatus::PaymentPending, PaymentStatus::Pending),
        PaymentMethod::AtVenue => (
            ReservationStatus::PendingVerification,
            PaymentStatus::Pending,
        ),
    }
}

/// Whether a reservation in this state may still be cancelled.
///
/// Cancellation is allowed from every non-terminal state; a cancelled
/// reservation stays cancelled.
pub fn can_cancel(status: ReservationStatus) -> bool {
    status != ReservationStatus::Cancelled
}

/// Whether a reservation in this state is waiting on a gateway payment.
/// Settlement is only meaningful for these.
pub fn awaits_gateway_payment(status: ReservationStatus) -> bool {
    status == ReservationStatus::PaymentPending
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_registration_bypasses_gateway() {
        for method in [PaymentMethod::Online, PaymentMethod::AtVenue] {
            let (status, payment) = initial_states(method, Money::zero());
            assert_eq!(status, ReservationStatus::Confirmed);
            assert_eq!(payment, PaymentStatus::Completed);
        }
    }

    #[test]
    fn test_online_payment_starts_payment_pending() {
        let (status, payment) = initial_states(PaymentMethod::Online, Money::from_paise(50_000));
        assert_eq!(status, ReservationStatus::PaymentPending);
        assert_eq!(payment, PaymentStatus::Pending);
    }

    #[test]
    fn test_at_venue_starts_pending_verification() {
        let (status, payment) = initial_states(PaymentMethod::AtVenue, Money::from_paise(50_000));
        assert_eq!(status, ReservationStatus::PendingVerification);
        assert_eq!(payment, PaymentStatus::Pending);
    }

    #[test]
    fn test_cancellation_guard() {
        assert!(can_cancel(ReservationStatus::PendingVerification));
        assert!(can_cancel(ReservationStatus::PaymentPending));
        assert!(can_cancel(ReservationStatus::Confirmed));
        assert!(!can_cancel(ReservationStatus::Cancelled));
    }

    #[test]
    fn test_awaits_gateway_payment() {
        assert!(awaits_gateway_payment(ReservationStatus::PaymentPending));
        assert!(!awaits_gateway_payment(ReservationStatus::Confirmed));
        assert!(!awaits_gateway_payment(ReservationStatus::PendingVerification));
    }
}
