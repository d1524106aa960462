//! # parlor-gateway: Payment Gateway Adapter
//!
//! The boundary between Parlor and the external payment provider.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  reserve (online payment)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderGateway::create_order(amount, currency, receipt)                 │
//! │       │   POST {base_url}/orders, amount in minor units (paise)        │
//! │       ▼                                                                 │
//! │  { order_id } ──► stored on the reservation                            │
//! │                                                                         │
//! │  ... customer pays on the gateway's checkout (out of scope) ...        │
//! │                                                                         │
//! │  callback { order_id, payment_id, signature }                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_callback_signature: HMAC-SHA256(secret, order_id|payment_id)   │
//! │       │   constant-time compare                                         │
//! │       ▼                                                                 │
//! │  settlement engine                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`OrderGateway`] trait is the seam: engines depend on the trait, so
//! tests run against a stub and production runs against [`HttpGateway`].

pub mod client;
pub mod config;
pub mod error;
pub mod signature;

// Re-export main types for convenience
pub use client::{GatewayOrder, HttpGateway, OrderGateway};
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use signature::{sign_callback, verify_callback_signature};
