//! # Offering Repository
//!
//! Database operations for reservation targets.
//!
//! Offering rows are curated by the content-management collaborator; this
//! crate reads them during booking and flips listing status at settlement
//! (inside the settlement transaction, not here). The insert exists for
//! seeding and tests.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use parlor_core::Offering;

/// Repository for offering database operations.
#[derive(Debug, Clone)]
pub struct OfferingRepository {
    pool: SqlitePool,
}

impl OfferingRepository {
    /// Creates a new OfferingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OfferingRepository { pool }
    }

    /// Inserts an offering.
    pub async fn insert(&self, offering: &Offering) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO offerings (id, kind, title, description, price_paise, currency,
                                   beneficiary_id, max_capacity, subscription_days,
                                   status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&offering.id)
        .bind(offering.kind)
        .bind(&offering.title)
        .bind(&offering.description)
        .bind(offering.price_paise)
        .bind(&offering.currency)
        .bind(&offering.beneficiary_id)
        .bind(offering.max_capacity)
        .bind(offering.subscription_days)
        .bind(offering.status)
        .bind(offering.created_at)
        .bind(offering.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(offering_id = %offering.id, title = %offering.title, "Inserted offering");
        Ok(())
    }

    /// Gets an offering by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Offering> {
        sqlx::query_as::<_, Offering>("SELECT * FROM offerings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("offering", id))
    }
}
