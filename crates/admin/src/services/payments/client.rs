//! Stripe API client.
//!
//! Stripe takes `application/x-www-form-urlencoded` bodies with bracketed
//! keys for nested fields (`line_items[0][price_data][currency]`).

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};
use url::Url;

use super::types::ApiErrorBody;
use super::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway};

/// Stripe API client for checkout sessions.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    api_url: Url,
    secret_key: SecretString,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_url", &self.api_url.as_str())
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Create a new Stripe client.
    #[must_use]
    pub fn new(api_url: Url, secret_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            api_url,
            secret_key,
        }
    }
}

/// Encode a checkout session request as Stripe form fields.
///
/// Quantity, currency and amount are per line; billing address collection
/// is required and phone collection enabled for every session.
#[must_use]
pub fn checkout_session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("billing_address_collection".to_owned(), "required".to_owned()),
        ("phone_number_collection[enabled]".to_owned(), "true".to_owned()),
        ("success_url".to_owned(), request.success_url.clone()),
        ("cancel_url".to_owned(), request.cancel_url.clone()),
        ("metadata[orderId]".to_owned(), request.order_id.to_string()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        form.push((
            format!("{prefix}[price_data][currency]"),
            item.currency.code().to_owned(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
    }

    form
}

#[async_trait]
impl PaymentGateway for StripeClient {
    #[instrument(skip(self, request), fields(order_id = %request.order_id, items = request.line_items.len()))]
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!(
            "{}/checkout/sessions",
            self.api_url.as_str().trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&checkout_session_form(request))
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Option<ApiErrorBody> = response.json().await.ok();
            let message = body
                .map(|b| {
                    format!(
                        "{}: {}",
                        b.error.kind.unwrap_or_else(|| "api_error".to_owned()),
                        b.error.message.unwrap_or_default()
                    )
                })
                .unwrap_or_else(|| status.to_string());
            error!(%status, message = %message, "Stripe API error creating checkout session");
            return Err(PaymentError::Api(message));
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| PaymentError::Response(e.to_string()))?;

        debug!(session_id = %session.id, "Checkout session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use shopdeck_core::{CurrencyCode, OrderId};

    use super::*;
    use crate::services::payments::LineItem;

    fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_checkout_session_form() {
        let order_id = OrderId::generate();
        let request = CheckoutSessionRequest {
            line_items: vec![
                LineItem {
                    name: "Tee".to_owned(),
                    unit_amount: 1999,
                    currency: CurrencyCode::USD,
                    quantity: 1,
                },
                LineItem {
                    name: "Cap".to_owned(),
                    unit_amount: 1500,
                    currency: CurrencyCode::USD,
                    quantity: 1,
                },
            ],
            success_url: "https://shop.example.com/cart?success=1".to_owned(),
            cancel_url: "https://shop.example.com/cart?canceled=1".to_owned(),
            order_id,
        };

        let form = checkout_session_form(&request);
        let order = order_id.to_string();

        assert_eq!(field(&form, "mode"), Some("payment"));
        assert_eq!(field(&form, "billing_address_collection"), Some("required"));
        assert_eq!(field(&form, "phone_number_collection[enabled]"), Some("true"));
        assert_eq!(field(&form, "metadata[orderId]"), Some(order.as_str()));
        assert_eq!(field(&form, "line_items[0][quantity]"), Some("1"));
        assert_eq!(
            field(&form, "line_items[0][price_data][currency]"),
            Some("USD")
        );
        assert_eq!(
            field(&form, "line_items[1][price_data][product_data][name]"),
            Some("Cap")
        );
        assert_eq!(
            field(&form, "line_items[1][price_data][unit_amount]"),
            Some("1500")
        );
        assert_eq!(
            field(&form, "success_url"),
            Some("https://shop.example.com/cart?success=1")
        );
    }
}
