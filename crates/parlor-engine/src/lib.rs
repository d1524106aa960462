//! # parlor-engine: Orchestration Engines for Parlor
//!
//! This crate composes the pure rules in `parlor-core`, the repositories
//! in `parlor-db`, and the payment client in `parlor-gateway` into the
//! five engines the HTTP surface exposes.
//!
//! ## Engine Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         parlor-engine                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────────────────────┐    │
//! │  │  SlotEngine  │ │ BookingEngine│ │      SettlementEngine        │    │
//! │  │              │ │              │ │                              │    │
//! │  │ grid gen     │ │ reserve      │ │ verify signature             │    │
//! │  │ list         │ │  ├ claim cap │ │ idempotent settle            │    │
//! │  │ guarded del  │ │  ├ dup guard │ │ fee split                    │    │
//! │  │              │ │  └ gw order  │ │ wallet credit (post-commit)  │    │
//! │  └──────┬───────┘ │ cancel       │ └──────────────┬───────────────┘    │
//! │         │         └──────┬───────┘                │                    │
//! │  ┌──────┴───────┐ ┌──────┴───────┐                │                    │
//! │  │ StakeEngine  │ │  TaskEngine  │                │                    │
//! │  │              │ │              │                │                    │
//! │  │ purchase     │ │ create       │                │                    │
//! │  │ lock/release │ │ claim (CAS)  │                │                    │
//! │  │ balances     │ │ list open    │                │                    │
//! │  └──────┬───────┘ └──────┬───────┘                │                    │
//! │         │                │                        │                    │
//! │         ▼                ▼                        ▼                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   parlor-db (repositories)        parlor-gateway (OrderGateway) │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules of the Layer
//!
//! 1. Every mutation starts with an [`parlor_core::Identity`] role check.
//! 2. Engines never hold an in-process lock across an await; races are
//!    settled by the database's conditional updates and constraints.
//! 3. Engines translate repository outcomes into typed [`CoreError`]s;
//!    HTTP codes are decided one layer up.
//!
//! [`CoreError`]: parlor_core::CoreError

// =============================================================================
// Module Declarations
// =============================================================================

pub mod booking;
pub mod claims;
pub mod config;
pub mod error;
pub mod scheduling;
pub mod settlement;
pub mod stakes;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use booking::{BookingEngine, ReserveRequest};
pub use claims::{CreateTaskRequest, TaskEngine};
pub use config::{ConfigError, PlatformConfig};
pub use error::{EngineError, EngineResult};
pub use scheduling::{GenerateSlotsRequest, SlotEngine};
pub use settlement::{SettleRequest, SettlementEngine};
pub use stakes::{InitiateLockRequest, RecordPurchaseRequest, StakeEngine};
