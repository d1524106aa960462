//! # Reservation Repository
//!
//! Database operations for reservations.
//!
//! ## Two Guards, Both in the Database
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Duplicate guard                                                        │
//! │  ───────────────                                                        │
//! │  Partial UNIQUE index on (requester_id, target_id) for rows whose      │
//! │  status != 'cancelled'. Two concurrent inserts for the same pair:      │
//! │  one lands, the other hits the index and surfaces as a unique          │
//! │  violation the engine maps to AlreadyRegistered.                       │
//! │                                                                         │
//! │  Capacity guard (classes)                                               │
//! │  ────────────────────────                                               │
//! │  INSERT ... SELECT ... WHERE confirmed_count < max_capacity.           │
//! │  Count and insert are one statement, so two racing registrations       │
//! │  for the last seat cannot both observe the stale count.                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use parlor_core::Reservation;

/// Outcome of a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The reservation is now cancelled; any slot capacity was returned.
    Cancelled,
    /// It was already cancelled. Nothing changed.
    AlreadyCancelled,
    /// No reservation with that id exists.
    NotFound,
}

/// Repository for reservation database operations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Inserts a reservation.
    ///
    /// A duplicate (another non-cancelled reservation for the same
    /// requester and target) surfaces as a unique violation; callers
    /// inspect it with [`DbError::is_unique_violation`].
    pub async fn insert(&self, reservation: &Reservation) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reservations (id, requester_id, target_id, slot_id, amount_paise,
                                      currency, payment_method, payment_status, status,
                                      external_order_id, external_payment_id, expires_at,
                                      created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reservation.id)
        .bind(&reservation.requester_id)
        .bind(&reservation.target_id)
        .bind(&reservation.slot_id)
        .bind(reservation.amount_paise)
        .bind(&reservation.currency)
        .bind(reservation.payment_method)
        .bind(reservation.payment_status)
        .bind(reservation.status)
        .bind(&reservation.external_order_id)
        .bind(&reservation.external_payment_id)
        .bind(reservation.expires_at)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(reservation_id = %reservation.id, target_id = %reservation.target_id, "Inserted reservation");
        Ok(())
    }

    /// Inserts a reservation only while the target's confirmed-registration
    /// count is below `max_capacity`.
    ///
    /// Returns false when the capacity guard rejected the insert. The count
    /// and the insert are a single statement; this is what makes the class
    /// cap safe under concurrency, where a separate count-then-insert
    /// could admit one registration too many.
    pub async fn insert_bounded(
        &self,
        reservation: &Reservation,
        max_capacity: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO reservations (id, requester_id, target_id, slot_id, amount_paise,
                                      currency, payment_method, payment_status, status,
                                      external_order_id, external_payment_id, expires_at,
                                      created_at, updated_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            WHERE (
                SELECT COUNT(*) FROM reservations
                WHERE target_id = ? AND status = 'confirmed'
            ) < ?
            "#,
        )
        .bind(&reservation.id)
        .bind(&reservation.requester_id)
        .bind(&reservation.target_id)
        .bind(&reservation.slot_id)
        .bind(reservation.amount_paise)
        .bind(&reservation.currency)
        .bind(reservation.payment_method)
        .bind(reservation.payment_status)
        .bind(reservation.status)
        .bind(&reservation.external_order_id)
        .bind(&reservation.external_payment_id)
        .bind(reservation.expires_at)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .bind(&reservation.target_id)
        .bind(max_capacity)
        .execute(&self.pool)
        .await?;

        let admitted = result.rows_affected() == 1;
        debug!(
            reservation_id = %reservation.id,
            target_id = %reservation.target_id,
            admitted,
            "Bounded reservation insert"
        );
        Ok(admitted)
    }

    /// Gets a reservation by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("reservation", id))
    }

    /// Lists a requester's reservations, newest first.
    pub async fn list_for_requester(&self, requester_id: &str) -> DbResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE requester_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Records the gateway order created for this reservation.
    pub async fn set_external_order(
        &self,
        id: &str,
        order_id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE reservations SET external_order_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(order_id)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("reservation", id));
        }
        debug!(reservation_id = %id, order_id = %order_id, "Recorded gateway order");
        Ok(())
    }

    /// Cancels a reservation and returns its slot capacity, both in one
    /// transaction.
    ///
    /// The status flip is conditional on `status != 'cancelled'`, so a
    /// double cancel releases capacity exactly once.
    pub async fn cancel(&self, id: &str, now: DateTime<Utc>) -> DbResult<CancelOutcome> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT status, slot_id FROM reservations WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((status, slot_id)) = row else {
            return Ok(CancelOutcome::NotFound);
        };
        if status == "cancelled" {
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        let result = sqlx::query(
            "UPDATE reservations SET status = 'cancelled', updated_at = ? WHERE id = ? AND status != 'cancelled'",
        )
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            // Lost a cancel race after the read above
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        if let Some(slot_id) = slot_id {
            let released = sqlx::query(
                r#"
                UPDATE slots
                SET current_bookings = current_bookings - 1,
                    is_available = 1,
                    updated_at = ?
                WHERE id = ? AND current_bookings > 0
                "#,
            )
            .bind(now)
            .bind(&slot_id)
            .execute(&mut *tx)
            .await?;
            if released.rows_affected() == 0 {
                warn!(reservation_id = %id, slot_id = %slot_id, "Cancel found slot with no bookings");
            }
        }

        tx.commit().await?;

        debug!(reservation_id = %id, "Cancelled reservation");
        Ok(CancelOutcome::Cancelled)
    }
}
