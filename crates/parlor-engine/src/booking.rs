//! # Booking Engine
//!
//! Creates and cancels reservations. This is where the three guards meet:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        reserve() flow                                   │
//! │                                                                         │
//! │  role check ─► load offering ─► initial states (free / online / venue) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  claim slot capacity          conditional UPDATE, one winner            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert reservation           duplicate guard (partial UNIQUE index)    │
//! │       │                       class guard (conditional INSERT…SELECT)   │
//! │       │  on rejection: release the claimed slot                         │
//! │       ▼                                                                 │
//! │  gateway order (online only)  on failure: cancel + release, report      │
//! │       │                       the dependency error                      │
//! │       ▼                                                                 │
//! │  reservation returned with external_order_id attached                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No in-process lock is held across any await; every race is settled in
//! the database.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use parlor_core::lifecycle::{awaits_gateway_payment, initial_states};
use parlor_core::validation::validate_uuid;
use parlor_core::{CoreError, Identity, Money, OfferingKind, PaymentMethod, Reservation, Role};
use parlor_db::repository::reservation::CancelOutcome;
use parlor_db::repository::slot::CapacityClaim;
use parlor_db::{Database, DbError};
use parlor_gateway::OrderGateway;

use crate::error::EngineResult;

// =============================================================================
// Requests
// =============================================================================

/// Parameters for creating a reservation.
#[derive(Debug, Clone)]
pub struct ReserveRequest {
    /// The offering being reserved.
    pub target_id: String,
    /// Slot to consume, for slot-backed appointments. None books flexibly.
    pub slot_id: Option<String>,
    /// How the requester intends to pay.
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Booking Engine
// =============================================================================

/// Reservation creation and cancellation.
pub struct BookingEngine {
    db: Arc<Database>,
    gateway: Arc<dyn OrderGateway>,
}

impl BookingEngine {
    /// Creates a booking engine over the given database and gateway.
    pub fn new(db: Arc<Database>, gateway: Arc<dyn OrderGateway>) -> Self {
        BookingEngine { db, gateway }
    }

    /// Creates a reservation for the caller.
    ///
    /// The price is frozen from the offering at this moment; settlement
    /// later reads the amount from the reservation, never from the
    /// gateway callback. For online payments the gateway order is created
    /// and persisted before this returns.
    pub async fn reserve(
        &self,
        caller: &Identity,
        req: ReserveRequest,
    ) -> EngineResult<Reservation> {
        caller.require(Role::Member)?;
        validate_uuid(&req.target_id)?;
        if let Some(slot_id) = &req.slot_id {
            validate_uuid(slot_id)?;
        }

        // Identity lives upstream; materialize the profile row so the
        // reservation's foreign keys hold
        self.db.profiles().ensure_exists(&caller.id, caller.role).await?;

        let offering = self.db.offerings().get_by_id(&req.target_id).await?;
        if !offering.is_active() {
            return Err(CoreError::OfferingUnavailable {
                offering_id: offering.id,
            }
            .into());
        }

        let price = Money::from_paise(offering.price_paise);
        let (status, payment_status) = initial_states(req.payment_method, price);
        let now = Utc::now();

        if let Some(slot_id) = &req.slot_id {
            match self.db.slots().claim_capacity(slot_id, now).await? {
                CapacityClaim::Claimed => {}
                CapacityClaim::Full => {
                    return Err(CoreError::SlotFull {
                        slot_id: slot_id.clone(),
                    }
                    .into());
                }
                CapacityClaim::NotFound => {
                    return Err(DbError::not_found("slot", slot_id).into());
                }
            }
        }

        let mut reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            requester_id: caller.id.clone(),
            target_id: offering.id.clone(),
            slot_id: req.slot_id.clone(),
            amount_paise: offering.price_paise,
            currency: offering.currency.clone(),
            payment_method: req.payment_method,
            payment_status,
            status,
            external_order_id: None,
            external_payment_id: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        };

        // Classes admit by confirmed-count; everything else inserts plainly.
        // Both paths hit the duplicate guard.
        let class_capacity = match offering.kind {
            OfferingKind::Class => offering.max_capacity,
            _ => None,
        };
        let admitted = match class_capacity {
            Some(max_capacity) => {
                self.db
                    .reservations()
                    .insert_bounded(&reservation, max_capacity)
                    .await
            }
            None => self.db.reservations().insert(&reservation).await.map(|_| true),
        };

        match admitted {
            Ok(true) => {}
            Ok(false) => {
                self.undo_slot_claim(reservation.slot_id.as_deref(), now).await;
                return Err(CoreError::CapacityFull {
                    target_id: offering.id,
                    // false only comes back from the bounded path
                    max_capacity: class_capacity.unwrap_or_default(),
                }
                .into());
            }
            Err(err) if err.is_unique_violation("reservations.requester_id") => {
                self.undo_slot_claim(reservation.slot_id.as_deref(), now).await;
                return Err(CoreError::AlreadyRegistered {
                    requester_id: caller.id.clone(),
                    target_id: offering.id,
                }
                .into());
            }
            Err(err) => {
                self.undo_slot_claim(reservation.slot_id.as_deref(), now).await;
                return Err(err.into());
            }
        }

        if awaits_gateway_payment(reservation.status) {
            match self
                .gateway
                .create_order(price, &reservation.currency, &reservation.id)
                .await
            {
                Ok(order) => {
                    self.db
                        .reservations()
                        .set_external_order(&reservation.id, &order.order_id, now)
                        .await?;
                    debug!(
                        reservation_id = %reservation.id,
                        order_id = %order.order_id,
                        "gateway order attached"
                    );
                    reservation.external_order_id = Some(order.order_id);
                }
                Err(err) => {
                    warn!(
                        reservation_id = %reservation.id,
                        error = %err,
                        "gateway order failed, rolling back reservation"
                    );
                    // cancel releases the claimed slot in the same transaction
                    if let Err(cancel_err) =
                        self.db.reservations().cancel(&reservation.id, now).await
                    {
                        error!(
                            reservation_id = %reservation.id,
                            error = %cancel_err,
                            "rollback cancel failed after gateway error"
                        );
                    }
                    return Err(err.into());
                }
            }
        }

        info!(
            reservation_id = %reservation.id,
            target_id = %reservation.target_id,
            status = ?reservation.status,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Cancels a reservation. Owner or admin only; idempotent.
    ///
    /// Releasing the slot happens inside the same transaction as the
    /// status flip, and exactly once across repeated cancels.
    pub async fn cancel(&self, caller: &Identity, reservation_id: &str) -> EngineResult<()> {
        caller.require(Role::Member)?;
        validate_uuid(reservation_id)?;

        let reservation = self.db.reservations().get_by_id(reservation_id).await?;
        if reservation.requester_id != caller.id {
            caller.require(Role::Admin)?;
        }

        match self.db.reservations().cancel(reservation_id, Utc::now()).await? {
            CancelOutcome::Cancelled => {
                info!(reservation_id, "reservation cancelled");
                Ok(())
            }
            CancelOutcome::AlreadyCancelled => Ok(()),
            CancelOutcome::NotFound => Err(DbError::not_found("reservation", reservation_id).into()),
        }
    }

    /// Lists the caller's reservations, newest first, with the active
    /// flag evaluated lazily against the clock.
    pub async fn list_own(&self, caller: &Identity) -> EngineResult<Vec<(Reservation, bool)>> {
        caller.require(Role::Member)?;
        let now = Utc::now();
        let reservations = self.db.reservations().list_for_requester(&caller.id).await?;
        Ok(reservations
            .into_iter()
            .map(|reservation| {
                let active = reservation.is_active_at(now);
                (reservation, active)
            })
            .collect())
    }

    async fn undo_slot_claim(&self, slot_id: Option<&str>, now: DateTime<Utc>) {
        if let Some(slot_id) = slot_id {
            if let Err(err) = self.db.slots().release_capacity(slot_id, now).await {
                error!(slot_id, error = %err, "failed to release slot after aborted reservation");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
