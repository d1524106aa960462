//! # Slot Repository
//!
//! Database operations for bookable slots.
//!
//! ## Capacity Claims
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Capacity Claim Works                           │
//! │                                                                         │
//! │  Two requesters race for the last opening of a slot:                   │
//! │                                                                         │
//! │  A: UPDATE ... WHERE id = 's1' AND current_bookings < max_bookings     │
//! │  B: UPDATE ... WHERE id = 's1' AND current_bookings < max_bookings     │
//! │                                                                         │
//! │  SQLite serializes the writers. The first UPDATE matches the row and   │
//! │  increments; the second re-evaluates its WHERE clause against the new  │
//! │  row, matches nothing, and reports rows_affected() == 0.               │
//! │                                                                         │
//! │  A gets CapacityClaim::Claimed, B gets CapacityClaim::Full.            │
//! │  No read-then-write, no lost update, no in-process lock.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use parlor_core::Slot;

/// Outcome of a capacity claim on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityClaim {
    /// The claim won; one booking was consumed.
    Claimed,
    /// The slot was already at capacity.
    Full,
    /// No slot with that id exists.
    NotFound,
}

/// Outcome of a guarded slot deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDeletion {
    /// The slot was removed.
    Deleted,
    /// Refused: this many non-cancelled reservations still reference it.
    HasBookings(i64),
    /// No slot with that id exists.
    NotFound,
}

/// Repository for slot database operations.
#[derive(Debug, Clone)]
pub struct SlotRepository {
    pool: SqlitePool,
}

impl SlotRepository {
    /// Creates a new SlotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SlotRepository { pool }
    }

    /// Inserts a batch of generated slots in one transaction.
    ///
    /// Bulk generation is all-or-nothing: a half-written grid would leave
    /// the day's schedule misleading.
    pub async fn insert_batch(&self, slots: &[Slot]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        for slot in slots {
            sqlx::query(
                r#"
                INSERT INTO slots (id, date, start_time, end_time,
                                   max_bookings, current_bookings, is_available,
                                   created_by, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&slot.id)
            .bind(slot.date)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .bind(slot.max_bookings)
            .bind(slot.current_bookings)
            .bind(slot.is_available)
            .bind(&slot.created_by)
            .bind(slot.created_at)
            .bind(slot.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(count = slots.len(), "Inserted slot batch");
        Ok(())
    }

    /// Gets a slot by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Slot> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("slot", id))
    }

    /// Lists slots, optionally filtered to an exact date.
    ///
    /// Ordered by start time so the day reads top to bottom.
    pub async fn list(&self, date: Option<NaiveDate>) -> DbResult<Vec<Slot>> {
        let slots = match date {
            Some(date) => {
                sqlx::query_as::<_, Slot>(
                    "SELECT * FROM slots WHERE date = ? ORDER BY start_time ASC",
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Slot>("SELECT * FROM slots ORDER BY date ASC, start_time ASC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(slots)
    }

    /// Consumes one booking of capacity, if any remains.
    ///
    /// Single conditional UPDATE: the WHERE clause re-checks capacity
    /// under the write lock, so concurrent claims cannot oversell.
    /// `is_available` is kept in sync in the same statement and is never
    /// true while the slot is full.
    pub async fn claim_capacity(&self, id: &str, now: DateTime<Utc>) -> DbResult<CapacityClaim> {
        let result = sqlx::query(
            r#"
            UPDATE slots
            SET current_bookings = current_bookings + 1,
                is_available = CASE WHEN current_bookings + 1 < max_bookings THEN 1 ELSE 0 END,
                updated_at = ?
            WHERE id = ? AND current_bookings < max_bookings
            "#,
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            debug!(slot_id = %id, "Claimed slot capacity");
            return Ok(CapacityClaim::Claimed);
        }

        // Zero rows: the slot is full, or there is no such slot
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(if exists.is_some() {
            CapacityClaim::Full
        } else {
            CapacityClaim::NotFound
        })
    }

    /// Returns one booking of capacity (cancellation, or compensation when
    /// a reservation insert loses its race after the claim succeeded).
    ///
    /// Floored at zero by the WHERE clause; releasing an unclaimed slot is
    /// logged and ignored rather than left to corrupt the counter.
    pub async fn release_capacity(&self, id: &str, now: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE slots
            SET current_bookings = current_bookings - 1,
                is_available = 1,
                updated_at = ?
            WHERE id = ? AND current_bookings > 0
            "#,
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!(slot_id = %id, "Release on slot with no bookings");
        } else {
            debug!(slot_id = %id, "Released slot capacity");
        }
        Ok(())
    }

    /// Deletes a slot unless a non-cancelled reservation references it.
    ///
    /// The guard lives inside the DELETE statement itself, so a reservation
    /// landing concurrently cannot slip between a check and the delete.
    /// Cancelled reservations do not block deletion; their `slot_id` is
    /// nulled out by the foreign key.
    pub async fn delete_if_unreferenced(&self, id: &str) -> DbResult<SlotDeletion> {
        let result = sqlx::query(
            r#"
            DELETE FROM slots
            WHERE id = ?
              AND NOT EXISTS (
                  SELECT 1 FROM reservations
                  WHERE slot_id = ? AND status != 'cancelled'
              )
            "#,
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            debug!(slot_id = %id, "Deleted slot");
            return Ok(SlotDeletion::Deleted);
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Ok(SlotDeletion::NotFound);
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE slot_id = ? AND status != 'cancelled'",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(SlotDeletion::HasBookings(active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{NaiveTime, Utc};
    use parlor_core::Role;
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_profile(db: &Database, id: &str, role: Role) {
        sqlx::query("INSERT INTO profiles (id, display_name, role, wallet_balance_paise, created_at) VALUES (?, ?, ?, 0, ?)")
            .bind(id)
            .bind(id)
            .bind(role)
            .bind(Utc::now())
            .execute(db.pool())
            .await
            .unwrap();
    }

    fn make_slot(max_bookings: i64) -> Slot {
        let now = Utc::now();
        Slot {
            id: Uuid::new_v4().to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            max_bookings,
            current_bookings: 0,
            is_available: true,
            created_by: "staff-1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_batch_and_list_by_date() {
        let db = test_db().await;
        seed_profile(&db, "staff-1", Role::Admin).await;

        let mut morning = make_slot(2);
        morning.start_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        morning.end_time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let later = make_slot(2);

        // Insert out of order; listing must come back sorted by start
        db.slots()
            .insert_batch(&[later.clone(), morning.clone()])
            .await
            .unwrap();

        let listed = db.slots().list(Some(morning.date)).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, morning.id);
        assert_eq!(listed[1].id, later.id);

        let other_day = db
            .slots()
            .list(Some(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()))
            .await
            .unwrap();
        assert!(other_day.is_empty());
    }

    #[tokio::test]
    async fn test_claim_until_full() {
        let db = test_db().await;
        seed_profile(&db, "staff-1", Role::Admin).await;

        let slot = make_slot(2);
        db.slots().insert_batch(&[slot.clone()]).await.unwrap();
        let now = Utc::now();

        assert_eq!(
            db.slots().claim_capacity(&slot.id, now).await.unwrap(),
            CapacityClaim::Claimed
        );
        let mid = db.slots().get_by_id(&slot.id).await.unwrap();
        assert_eq!(mid.current_bookings, 1);
        assert!(mid.is_available);

        assert_eq!(
            db.slots().claim_capacity(&slot.id, now).await.unwrap(),
            CapacityClaim::Claimed
        );
        let full = db.slots().get_by_id(&slot.id).await.unwrap();
        assert_eq!(full.current_bookings, 2);
        assert!(!full.is_available, "full slot must not read as available");

        assert_eq!(
            db.slots().claim_capacity(&slot.id, now).await.unwrap(),
            CapacityClaim::Full
        );
        let after = db.slots().get_by_id(&slot.id).await.unwrap();
        assert_eq!(after.current_bookings, 2, "losing claim must not move the counter");
    }

    #[tokio::test]
    async fn test_claim_missing_slot() {
        let db = test_db().await;
        assert_eq!(
            db.slots().claim_capacity("ghost", Utc::now()).await.unwrap(),
            CapacityClaim::NotFound
        );
    }

    #[tokio::test]
    async fn test_release_restores_availability() {
        let db = test_db().await;
        seed_profile(&db, "staff-1", Role::Admin).await;

        let slot = make_slot(1);
        db.slots().insert_batch(&[slot.clone()]).await.unwrap();
        let now = Utc::now();

        db.slots().claim_capacity(&slot.id, now).await.unwrap();
        assert_eq!(
            db.slots().claim_capacity(&slot.id, now).await.unwrap(),
            CapacityClaim::Full
        );

        db.slots().release_capacity(&slot.id, now).await.unwrap();
        let released = db.slots().get_by_id(&slot.id).await.unwrap();
        assert_eq!(released.current_bookings, 0);
        assert!(released.is_available);

        // Releasing below zero is ignored, not applied
        db.slots().release_capacity(&slot.id, now).await.unwrap();
        db.slots().release_capacity(&slot.id, now).await.unwrap();
        let floored = db.slots().get_by_id(&slot.id).await.unwrap();
        assert_eq!(floored.current_bookings, 0);
    }

    #[tokio::test]
    async fn test_delete_unreferenced_slot() {
        let db = test_db().await;
        seed_profile(&db, "staff-1", Role::Admin).await;

        let slot = make_slot(3);
        db.slots().insert_batch(&[slot.clone()]).await.unwrap();

        assert_eq!(
            db.slots().delete_if_unreferenced(&slot.id).await.unwrap(),
            SlotDeletion::Deleted
        );
        assert!(db.slots().get_by_id(&slot.id).await.is_err());

        assert_eq!(
            db.slots().delete_if_unreferenced("ghost").await.unwrap(),
            SlotDeletion::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete_refused_while_referenced() {
        let db = test_db().await;
        seed_profile(&db, "staff-1", Role::Admin).await;
        seed_profile(&db, "member-1", Role::Member).await;

        let slot = make_slot(3);
        db.slots().insert_batch(&[slot.clone()]).await.unwrap();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO offerings (id, kind, title, price_paise, currency, beneficiary_id,
                                   status, created_at, updated_at)
            VALUES ('off-1', 'appointment', 'Sitting', 100000, 'INR', 'staff-1',
                    'active', ?, ?)
            "#,
        )
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        sqlx::query(
            r#"
            INSERT INTO reservations (id, requester_id, target_id, slot_id, amount_paise,
                                      currency, payment_method, payment_status, status,
                                      created_at, updated_at)
            VALUES ('res-1', 'member-1', 'off-1', ?, 100000,
                    'INR', 'at_venue', 'pending', 'pending_verification', ?, ?)
            "#,
        )
        .bind(&slot.id)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        assert_eq!(
            db.slots().delete_if_unreferenced(&slot.id).await.unwrap(),
            SlotDeletion::HasBookings(1)
        );
        assert!(db.slots().get_by_id(&slot.id).await.is_ok());

        // Cancelled reservations stop blocking deletion
        sqlx::query("UPDATE reservations SET status = 'cancelled' WHERE id = 'res-1'")
            .execute(db.pool())
            .await
            .unwrap();
        assert_eq!(
            db.slots().delete_if_unreferenced(&slot.id).await.unwrap(),
            SlotDeletion::Deleted
        );
    }
}
