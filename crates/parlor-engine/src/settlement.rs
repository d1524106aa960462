//! # Settlement Engine
//!
//! Finalizes a paid reservation on receipt of the gateway callback.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        settle() flow                                    │
//! │                                                                         │
//! │  load reservation ─► stored order id ─► verify HMAC signature           │
//! │       │                                 (mismatch: warn + reject)       │
//! │       ▼                                                                 │
//! │  gross = reservation's frozen amount   (never the callback's)           │
//! │  fee/net split at the configured commission                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ONE TRANSACTION ───────────────────────────────────────────────┐       │
//! │  │ insert settlement record     (UNIQUE reservation_id is the   │       │
//! │  │ flip listing to sold         idempotency serialization point)│       │
//! │  │ confirm reservation + payment id + expiry                    │       │
//! │  └──────────────────────────────────────────────────────────────┘       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  wallet credit (post-commit; failure logged, sale never reversed)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The callback route is unauthenticated: the signature is the
//! authentication. Duplicate deliveries, including concurrent ones from
//! separate instances, collapse onto the database constraint.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use parlor_core::validation::validate_uuid;
use parlor_core::{CoreError, Identity, OfferingKind, Profile, Role, SettlementRecord};
use parlor_db::repository::settlement::SettleOutcome;
use parlor_db::Database;
use parlor_gateway::verify_callback_signature;

use crate::config::PlatformConfig;
use crate::error::EngineResult;

// =============================================================================
// Requests
// =============================================================================

/// A payment confirmation callback, as relayed by the HTTP surface.
#[derive(Debug, Clone)]
pub struct SettleRequest {
    /// The reservation being paid for.
    pub reservation_id: String,
    /// Gateway payment id.
    pub payment_id: String,
    /// Hex HMAC-SHA256 signature over `order_id|payment_id`.
    pub signature: String,
}

// =============================================================================
// Settlement Engine
// =============================================================================

/// Signature-verified, idempotent payment settlement.
pub struct SettlementEngine {
    db: Arc<Database>,
    config: PlatformConfig,
    callback_secret: String,
}

impl SettlementEngine {
    /// Creates a settlement engine.
    ///
    /// `callback_secret` is the gateway API secret; it comes from
    /// configuration and is required at startup.
    pub fn new(db: Arc<Database>, config: PlatformConfig, callback_secret: String) -> Self {
        SettlementEngine {
            db,
            config,
            callback_secret,
        }
    }

    /// Settles a reservation against a verified gateway callback.
    ///
    /// Exactly one settlement can ever exist per reservation; a duplicate
    /// delivery gets [`CoreError::AlreadySettled`] and the original record
    /// stands untouched.
    pub async fn settle(&self, req: SettleRequest) -> EngineResult<SettlementRecord> {
        validate_uuid(&req.reservation_id)?;

        let reservation = self.db.reservations().get_by_id(&req.reservation_id).await?;

        let order_id =
            reservation
                .external_order_id
                .clone()
                .ok_or_else(|| CoreError::MissingPaymentOrder {
                    reservation_id: reservation.id.clone(),
                })?;

        if !verify_callback_signature(
            &self.callback_secret,
            &order_id,
            &req.payment_id,
            &req.signature,
        ) {
            warn!(
                reservation_id = %reservation.id,
                order_id = %order_id,
                "payment callback signature mismatch"
            );
            return Err(CoreError::SignatureMismatch { order_id }.into());
        }

        let offering = self.db.offerings().get_by_id(&reservation.target_id).await?;

        // Gross is the price frozen at reservation time
        let gross = reservation.amount();
        let split = gross.split_fee(self.config.commission());
        let now = Utc::now();
        let expires_at = offering
            .subscription_days
            .map(|days| now + Duration::days(days));

        let record = SettlementRecord {
            id: Uuid::new_v4().to_string(),
            reservation_id: reservation.id.clone(),
            payer_id: reservation.requester_id.clone(),
            beneficiary_id: offering.beneficiary_id.clone(),
            gross_paise: gross.paise(),
            fee_bps: self.config.commission_bps,
            net_paise: split.net.paise(),
            created_at: now,
        };

        let listing_target =
            (offering.kind == OfferingKind::Listing).then_some(offering.id.as_str());

        match self
            .db
            .settlements()
            .settle(&record, &req.payment_id, expires_at, listing_target, now)
            .await?
        {
            SettleOutcome::Applied => {}
            SettleOutcome::AlreadySettled => {
                if let Some(existing) =
                    self.db.settlements().get_by_reservation(&reservation.id).await?
                {
                    debug!(
                        reservation_id = %reservation.id,
                        settlement_id = %existing.id,
                        "duplicate settlement delivery ignored"
                    );
                }
                return Err(CoreError::AlreadySettled {
                    reservation_id: reservation.id,
                }
                .into());
            }
            SettleOutcome::ListingUnavailable => {
                return Err(CoreError::OfferingUnavailable {
                    offering_id: offering.id,
                }
                .into());
            }
        }

        // Credit after the settlement has committed. A failure leaves the
        // sale standing and is surfaced through the error log only.
        if let Err(err) = self
            .db
            .profiles()
            .credit_wallet(&record.beneficiary_id, record.net_paise)
            .await
        {
            error!(
                settlement_id = %record.id,
                beneficiary_id = %record.beneficiary_id,
                net_paise = record.net_paise,
                error = %err,
                "wallet credit failed after settlement commit"
            );
        }

        info!(
            settlement_id = %record.id,
            reservation_id = %record.reservation_id,
            gross_paise = record.gross_paise,
            net_paise = record.net_paise,
            "settlement applied"
        );
        Ok(record)
    }

    /// Reads the caller's wallet.
    pub async fn wallet(&self, caller: &Identity) -> EngineResult<Profile> {
        caller.require(Role::Member)?;
        self.db.profiles().ensure_exists(&caller.id, caller.role).await?;
        Ok(self.db.profiles().get_by_id(&caller.id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
