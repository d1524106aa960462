//! # Repository Module
//!
//! Database repository implementations for Parlor.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Engine operation                                                       │
//! │       │                                                                 │
//! │       │  db.slots().claim_capacity(&slot_id, now)                      │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  SlotRepository                                                        │
//! │  ├── claim_capacity(&self, id, now)                                    │
//! │  ├── release_capacity(&self, id, now)                                  │
//! │  ├── list(&self, date)                                                 │
//! │  └── delete_if_unreferenced(&self, id)                                 │
//! │       │                                                                 │
//! │       │  SQL (conditional single-statement updates)                     │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Contended transitions return typed outcomes, not booleans:            │
//! │  the caller learns whether it won the race, lost it, or aimed at       │
//! │  a row that does not exist.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`slot::SlotRepository`] - slot grid storage and capacity claims
//! - [`offering::OfferingRepository`] - reservation targets
//! - [`reservation::ReservationRepository`] - reservation lifecycle rows
//! - [`settlement::SettlementRepository`] - the settlement transaction
//! - [`stake::StakeRepository`] - stake locks and the activity log
//! - [`task::TaskRepository`] - claimable staff tasks
//! - [`profile::ProfileRepository`] - profiles and wallet credits

pub mod offering;
pub mod profile;
pub mod reservation;
pub mod settlement;
pub mod slot;
pub mod stake;
pub mod task;
