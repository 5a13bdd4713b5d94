//! Checkout session request and response types.

use serde::Deserialize;

use shopdeck_core::{CurrencyCode, OrderId};

/// One purchasable line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Product name shown on the hosted page.
    pub name: String,
    /// Unit price in minor units (cents).
    pub unit_amount: i64,
    pub currency: CurrencyCode,
    pub quantity: u32,
}

/// Everything needed to open a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Order this session pays for; echoed back in the session metadata.
    pub order_id: OrderId,
}

/// A created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page to send the shopper to.
    pub url: String,
}

/// Error envelope returned by the gateway on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}
