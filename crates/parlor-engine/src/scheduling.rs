//! # Slot Engine
//!
//! Staff-facing slot administration: bulk grid generation, listing, and
//! guarded deletion. Capacity consumption itself lives in the booking
//! engine; this module never touches `current_bookings`.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use parlor_core::slots::build_slot_grid;
use parlor_core::validation::{validate_capacity, validate_slot_duration, validate_time_range};
use parlor_core::{CoreError, Identity, Role, Slot};
use parlor_db::repository::slot::SlotDeletion;
use parlor_db::{Database, DbError};

use crate::error::EngineResult;

// =============================================================================
// Requests
// =============================================================================

/// Parameters for bulk slot generation.
#[derive(Debug, Clone)]
pub struct GenerateSlotsRequest {
    /// Calendar date the grid is generated for.
    pub date: NaiveDate,
    /// Opening time (inclusive).
    pub start_time: NaiveTime,
    /// Closing time (exclusive).
    pub end_time: NaiveTime,
    /// Length of each slot in minutes.
    pub duration_minutes: u32,
    /// Booking capacity of each generated slot.
    pub max_bookings: i64,
}

// =============================================================================
// Slot Engine
// =============================================================================

/// Slot administration engine.
pub struct SlotEngine {
    db: Arc<Database>,
}

impl SlotEngine {
    /// Creates a slot engine over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        SlotEngine { db }
    }

    /// Generates a contiguous slot grid for one date. Admin only.
    ///
    /// The grid partitions `[start_time, end_time)` into whole
    /// `duration_minutes` intervals; a trailing remainder shorter than one
    /// slot is dropped. All slots are inserted in one transaction.
    pub async fn generate(
        &self,
        caller: &Identity,
        req: GenerateSlotsRequest,
    ) -> EngineResult<Vec<Slot>> {
        caller.require(Role::Admin)?;
        validate_time_range(req.start_time, req.end_time)?;
        validate_slot_duration(req.duration_minutes)?;
        validate_capacity(req.max_bookings)?;

        let intervals = build_slot_grid(req.start_time, req.end_time, req.duration_minutes)?;
        let now = Utc::now();

        let slots: Vec<Slot> = intervals
            .into_iter()
            .map(|interval| Slot {
                id: Uuid::new_v4().to_string(),
                date: req.date,
                start_time: interval.start_time,
                end_time: interval.end_time,
                max_bookings: req.max_bookings,
                current_bookings: 0,
                is_available: true,
                created_by: caller.id.clone(),
                created_at: now,
                updated_at: now,
            })
            .collect();

        self.db.slots().insert_batch(&slots).await?;
        info!(
            date = %req.date,
            count = slots.len(),
            max_bookings = req.max_bookings,
            "slot grid generated"
        );

        Ok(slots)
    }

    /// Lists slots, optionally filtered to one date.
    pub async fn list(&self, date: Option<NaiveDate>) -> EngineResult<Vec<Slot>> {
        Ok(self.db.slots().list(date).await?)
    }

    /// Deletes a slot with no live reservations. Admin only.
    ///
    /// Cancelled reservations do not block deletion; any other
    /// reservation does, and the caller is told how many.
    pub async fn delete(&self, caller: &Identity, slot_id: &str) -> EngineResult<()> {
        caller.require(Role::Admin)?;

        match self.db.slots().delete_if_unreferenced(slot_id).await? {
            SlotDeletion::Deleted => {
                debug!(slot_id, "slot deleted");
                Ok(())
            }
            SlotDeletion::HasBookings(active) => Err(CoreError::SlotHasBookings {
                slot_id: slot_id.to_string(),
                active,
            }
            .into()),
            SlotDeletion::NotFound => Err(DbError::not_found("slot", slot_id).into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
