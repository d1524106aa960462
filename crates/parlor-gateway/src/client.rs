//! # Order API Client
//!
//! Thin HTTP client for the payment gateway's order API. The only call
//! the platform makes is order creation; everything after that arrives
//! as a signed callback handled by [`crate::signature`].
//!
//! The [`OrderGateway`] trait exists so the settlement and booking
//! engines can run against a stub in tests without a live gateway.

use async_trait::async_trait;
use parlor_core::Money;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};

/// An order registered with the gateway.
///
/// The `order_id` is stored on the reservation and later bound into the
/// callback signature, so it is the anchor for the whole payment flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    /// Gateway-assigned order id (e.g. `order_Nx73k...`).
    pub order_id: String,

    /// Amount in minor units, echoed back by the gateway.
    pub amount_paise: i64,

    /// ISO currency code.
    pub currency: String,
}

/// Creates payment orders with the gateway.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Registers an order for `amount` and returns the gateway's handle.
    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        receipt: &str,
    ) -> GatewayResult<GatewayOrder>;
}

/// Wire shape of the gateway's order response.
#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

/// Production client talking to the real gateway over HTTPS.
pub struct HttpGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Creates a client with a default connection pool.
    pub fn new(config: GatewayConfig) -> Self {
        HttpGateway {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl OrderGateway for HttpGateway {
    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        receipt: &str,
    ) -> GatewayResult<GatewayOrder> {
        debug!(
            amount_paise = amount.paise(),
            currency, receipt, "creating gateway order"
        );

        let response = self
            .client
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(&self.config.secret))
            .json(&json!({
                "amount": amount.paise(),
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body, "gateway rejected order");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let order: OrderResponse = response.json().await?;
        debug!(order_id = %order.id, "gateway order created");

        Ok(GatewayOrder {
            order_id: order.id,
            amount_paise: order.amount,
            currency: order.currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_url_trims_trailing_slash() {
        let gateway = HttpGateway::new(GatewayConfig::new(
            "https://gateway.test/v1/",
            "key",
            "secret",
        ));
        assert_eq!(gateway.orders_url(), "https://gateway.test/v1/orders");

        let gateway =
            HttpGateway::new(GatewayConfig::new("https://gateway.test/v1", "key", "secret"));
        assert_eq!(gateway.orders_url(), "https://gateway.test/v1/orders");
    }

    #[test]
    fn test_order_response_parses() {
        let order: OrderResponse = serde_json::from_str(
            r#"{"id":"order_Nx73k","amount":135000,"currency":"INR","status":"created"}"#,
        )
        .unwrap();
        assert_eq!(order.id, "order_Nx73k");
        assert_eq!(order.amount, 135_000);
        assert_eq!(order.currency, "INR");
    }
}
