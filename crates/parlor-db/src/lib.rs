//! # parlor-db: Database Layer
//!
//! SQLite persistence for Parlor. Repositories own the SQL; callers get
//! typed rows from [`parlor_core`] back.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          parlor-db                                      │
//! │                                                                         │
//! │  ┌────────────┐  ┌──────────────────────────────────────────────────┐  │
//! │  │  Database  │  │                 Repositories                     │  │
//! │  │            │  │                                                  │  │
//! │  │  • pool    │──→  slots()         SlotRepository                  │  │
//! │  │  • config  │  │  offerings()     OfferingRepository              │  │
//! │  │            │  │  reservations()  ReservationRepository           │  │
//! │  └────────────┘  │  settlements()   SettlementRepository            │  │
//! │        │         │  stakes()        StakeRepository                 │  │
//! │        ▼         │  tasks()         TaskRepository                  │  │
//! │  ┌────────────┐  │  profiles()      ProfileRepository               │  │
//! │  │ migrations │  └──────────────────────────────────────────────────┘  │
//! │  └────────────┘                                                        │
//! │        │                                                               │
//! │        ▼                                                               │
//! │     SQLite (WAL mode)                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! Contended transitions are single conditional statements, not
//! read-then-write sequences. A slot claim is one UPDATE whose WHERE clause
//! re-checks capacity; a task claim is one UPDATE whose WHERE clause
//! re-checks `assigned_to IS NULL`. SQLite serializes writers, so
//! `rows_affected()` tells us atomically whether we won or lost the race.
//!
//! ## Usage
//! ```rust,ignore
//! use parlor_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./parlor.db")).await?;
//! let day = db.slots().list(Some(date)).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// Re-export main types for convenience
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::offering::OfferingRepository;
pub use repository::profile::ProfileRepository;
pub use repository::reservation::ReservationRepository;
pub use repository::settlement::SettlementRepository;
pub use repository::slot::{CapacityClaim, SlotRepository};
pub use repository::stake::StakeRepository;
pub use repository::task::TaskRepository;
