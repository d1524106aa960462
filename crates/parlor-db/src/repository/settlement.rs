//! # Settlement Repository
//!
//! The settlement transaction: the point where a verified payment becomes
//! an immutable ledger record.
//!
//! ## Idempotency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Gateways redeliver callbacks. Two deliveries for one reservation      │
//! │  (possibly on two instances of this service) both try:                 │
//! │                                                                         │
//! │      INSERT INTO settlements (.., reservation_id, ..)                  │
//! │                                                                         │
//! │  reservation_id is UNIQUE. The first insert wins; the second gets a    │
//! │  unique violation, which this repository maps to AlreadySettled and    │
//! │  rolls back. No in-memory lock is involved, so the guarantee holds     │
//! │  across processes.                                                     │
//! │                                                                         │
//! │  Everything else in the transaction (listing sold-flip, reservation    │
//! │  confirm) rides on that insert: rolled back together, applied          │
//! │  together.                                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The wallet credit deliberately does NOT live in this transaction; see
//! the settlement engine for the policy.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use parlor_core::SettlementRecord;

/// Outcome of applying a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The settlement committed.
    Applied,
    /// A settlement for this reservation already exists. Nothing changed.
    AlreadySettled,
    /// The listing target was no longer active (sold to someone else or
    /// archived). Nothing changed.
    ListingUnavailable,
}

/// Repository for settlement database operations.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    pool: SqlitePool,
}

impl SettlementRepository {
    /// Creates a new SettlementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementRepository { pool }
    }

    /// Applies a settlement in one transaction:
    ///
    /// 1. insert the settlement record (UNIQUE reservation_id arbitrates
    ///    duplicate deliveries);
    /// 2. for listing targets, flip the offering `active → sold`,
    ///    conditional on it still being active;
    /// 3. confirm the reservation, record the gateway payment id, and set
    ///    the subscription expiry.
    ///
    /// Slot capacity was consumed when the reservation was created and is
    /// left untouched here.
    pub async fn settle(
        &self,
        record: &SettlementRecord,
        payment_id: &str,
        expires_at: Option<DateTime<Utc>>,
        listing_target: Option<&str>,
        now: DateTime<Utc>,
    ) -> DbResult<SettleOutcome> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO settlements (id, reservation_id, payer_id, beneficiary_id,
                                     gross_paise, fee_bps, net_paise, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.reservation_id)
        .bind(&record.payer_id)
        .bind(&record.beneficiary_id)
        .bind(record.gross_paise)
        .bind(record.fee_bps)
        .bind(record.net_paise)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            let err = DbError::from(e);
            if err.is_unique_violation("settlements.reservation_id") {
                debug!(reservation_id = %record.reservation_id, "Duplicate settlement delivery");
                return Ok(SettleOutcome::AlreadySettled);
            }
            return Err(err);
        }

        if let Some(target_id) = listing_target {
            let sold = sqlx::query(
                "UPDATE offerings SET status = 'sold', updated_at = ? WHERE id = ? AND status = 'active'",
            )
            .bind(now)
            .bind(target_id)
            .execute(&mut *tx)
            .await?;
            if sold.rows_affected() == 0 {
                // Dropping the transaction rolls the settlement insert back
                debug!(target_id = %target_id, "Listing no longer active at settlement");
                return Ok(SettleOutcome::ListingUnavailable);
            }
        }

        let confirmed = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'confirmed',
                payment_status = 'completed',
                external_payment_id = ?,
                expires_at = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(payment_id)
        .bind(expires_at)
        .bind(now)
        .bind(&record.reservation_id)
        .execute(&mut *tx)
        .await?;
        if confirmed.rows_affected() == 0 {
            return Err(DbError::Integrity(format!(
                "settlement {} references missing reservation {}",
                record.id, record.reservation_id
            )));
        }

        tx.commit().await?;

        debug!(
            settlement_id = %record.id,
            reservation_id = %record.reservation_id,
            gross_paise = record.gross_paise,
            net_paise = record.net_paise,
            "Settlement applied"
        );
        Ok(SettleOutcome::Applied)
    }

    /// Gets the settlement for a reservation, if one exists.
    pub async fn get_by_reservation(
        &self,
        reservation_id: &str,
    ) -> DbResult<Option<SettlementRecord>> {
        let record = sqlx::query_as::<_, SettlementRecord>(
            "SELECT * FROM settlements WHERE reservation_id = ?",
        )
        .bind(reservation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_profile(db: &Database, id: &str) {
        sqlx::query("INSERT INTO profiles (id, display_name, role, wallet_balance_paise, created_at) VALUES (?, ?, 'member', 0, ?)")
            .bind(id)
            .bind(id)
            .bind(Utc::now())
            .execute(db.pool())
            .await
            .unwrap();
    }

    async fn seed_offering(db: &Database, id: &str, kind: &str, beneficiary: &str) {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO offerings (id, kind, title, price_paise, currency, beneficiary_id,
                                   status, created_at, updated_at)
            VALUES (?, ?, 'Offering', 100000, 'INR', ?, 'active', ?, ?)
            "#,
        )
        .bind(id)
        .bind(kind)
        .bind(beneficiary)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();
    }

    async fn seed_reservation(db: &Database, id: &str, requester: &str, target: &str) {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO reservations (id, requester_id, target_id, amount_paise, currency,
                                      payment_method, payment_status, status,
                                      external_order_id, created_at, updated_at)
            VALUES (?, ?, ?, 100000, 'INR', 'online', 'pending', 'payment_pending',
                    'order_1', ?, ?)
            "#,
        )
        .bind(id)
        .bind(requester)
        .bind(target)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();
    }

    fn make_record(reservation_id: &str, payer: &str, beneficiary: &str) -> SettlementRecord {
        SettlementRecord {
            id: Uuid::new_v4().to_string(),
            reservation_id: reservation_id.to_string(),
            payer_id: payer.to_string(),
            beneficiary_id: beneficiary.to_string(),
            gross_paise: 100_000,
            fee_bps: 1000,
            net_paise: 90_000,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_settle_confirms_reservation() {
        let db = test_db().await;
        seed_profile(&db, "member-1").await;
        seed_profile(&db, "artist-1").await;
        seed_offering(&db, "off-1", "appointment", "artist-1").await;
        seed_reservation(&db, "res-1", "member-1", "off-1").await;

        let record = make_record("res-1", "member-1", "artist-1");
        let outcome = db
            .settlements()
            .settle(&record, "pay_1", None, None, Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::Applied);

        let reservation = db.reservations().get_by_id("res-1").await.unwrap();
        assert_eq!(
            reservation.external_payment_id.as_deref(),
            Some("pay_1"),
            "gateway payment id must be recorded"
        );
        assert!(reservation.is_active_at(Utc::now()));

        let stored = db
            .settlements()
            .get_by_reservation("res-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.gross_paise, 100_000);
        assert_eq!(stored.net_paise, 90_000);
        assert_eq!(stored.fee().paise(), 10_000);
    }

    #[tokio::test]
    async fn test_second_delivery_is_already_settled() {
        let db = test_db().await;
        seed_profile(&db, "member-1").await;
        seed_profile(&db, "artist-1").await;
        seed_offering(&db, "off-1", "appointment", "artist-1").await;
        seed_reservation(&db, "res-1", "member-1", "off-1").await;

        let first = make_record("res-1", "member-1", "artist-1");
        db.settlements()
            .settle(&first, "pay_1", None, None, Utc::now())
            .await
            .unwrap();

        // Redelivery arrives with a fresh settlement id but the same
        // reservation; it must bounce off the UNIQUE constraint
        let redelivery = make_record("res-1", "member-1", "artist-1");
        let outcome = db
            .settlements()
            .settle(&redelivery, "pay_1", None, None, Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::AlreadySettled);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM settlements WHERE reservation_id = 'res-1'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1, "exactly one settlement row may exist");
    }

    #[tokio::test]
    async fn test_listing_sold_exactly_once() {
        let db = test_db().await;
        seed_profile(&db, "member-1").await;
        seed_profile(&db, "member-2").await;
        seed_profile(&db, "artist-1").await;
        seed_offering(&db, "art-1", "listing", "artist-1").await;
        seed_reservation(&db, "res-1", "member-1", "art-1").await;
        seed_reservation(&db, "res-2", "member-2", "art-1").await;

        let first = make_record("res-1", "member-1", "artist-1");
        let outcome = db
            .settlements()
            .settle(&first, "pay_1", None, Some("art-1"), Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::Applied);

        let status: String = sqlx::query_scalar("SELECT status FROM offerings WHERE id = 'art-1'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(status, "sold");

        // A second buyer's settlement finds the listing gone and rolls
        // everything back, including its own settlement row
        let second = make_record("res-2", "member-2", "artist-1");
        let outcome = db
            .settlements()
            .settle(&second, "pay_2", None, Some("art-1"), Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::ListingUnavailable);

        assert!(db
            .settlements()
            .get_by_reservation("res-2")
            .await
            .unwrap()
            .is_none());
        let untouched = db.reservations().get_by_id("res-2").await.unwrap();
        assert_eq!(untouched.external_payment_id, None);
    }

    #[tokio::test]
    async fn test_settle_records_expiry() {
        let db = test_db().await;
        seed_profile(&db, "member-1").await;
        seed_profile(&db, "artist-1").await;
        seed_offering(&db, "off-1", "class", "artist-1").await;
        seed_reservation(&db, "res-1", "member-1", "off-1").await;

        let now = Utc::now();
        let expiry = now + chrono::Duration::days(30);
        let record = make_record("res-1", "member-1", "artist-1");
        db.settlements()
            .settle(&record, "pay_1", Some(expiry), None, now)
            .await
            .unwrap();

        let reservation = db.reservations().get_by_id("res-1").await.unwrap();
        assert!(reservation.is_active_at(now));
        assert!(!reservation.is_active_at(now + chrono::Duration::days(31)));
    }
}
