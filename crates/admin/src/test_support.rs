//! In-process fakes for the external collaborators.
//!
//! Compiled for unit tests and behind the `test-support` feature, so the
//! integration-tests crate can build a full router without a database, an
//! auth provider or a payment gateway.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use shopdeck_core::UserId;

use crate::services::{
    CheckoutSession, CheckoutSessionRequest, IdentityError, IdentityProvider, PaymentError,
    PaymentGateway, Principal,
};

/// Identity provider backed by a fixed token table.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, UserId>,
}

impl StaticIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as a session for `user_id`.
    #[must_use]
    pub fn with_user(mut self, token: &str, user_id: &str) -> Self {
        self.tokens
            .insert(token.to_owned(), UserId::new(user_id.to_owned()));
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify(&self, token: &SecretString) -> Result<Option<Principal>, IdentityError> {
        Ok(self
            .tokens
            .get(token.expose_secret())
            .map(|user_id| Principal {
                user_id: user_id.clone(),
            }))
    }
}

/// Payment gateway that records every request and hands back a fake
/// hosted page.
#[derive(Debug, Default)]
pub struct RecordingPaymentGateway {
    requests: Mutex<Vec<CheckoutSessionRequest>>,
    failing: AtomicBool,
}

impl RecordingPaymentGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the gateway were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for RecordingPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PaymentError::Api("gateway unavailable".to_string()));
        }

        let mut requests = self
            .requests
            .lock()
            .map_err(|e| PaymentError::Request(e.to_string()))?;
        requests.push(request.clone());

        let id = format!("cs_test_{}", requests.len());
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.test/c/pay/{id}"),
            id,
        })
    }
}
