//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use url::Url;

use crate::{
    config::AdminConfig,
    db::{Datastore, PgDatastore},
    services::{ClerkClient, IdentityProvider, PaymentGateway, StripeClient},
};

/// Application state shared across all handlers.
///
/// Collaborators are held as trait objects so tests can swap in the
/// in-memory datastore and fake providers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    frontend_store_url: Url,
    datastore: Arc<dyn Datastore>,
    identity: Arc<dyn IdentityProvider>,
    payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Assemble state from already-built collaborators.
    #[must_use]
    pub fn new(
        frontend_store_url: Url,
        datastore: Arc<dyn Datastore>,
        identity: Arc<dyn IdentityProvider>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                frontend_store_url,
                datastore,
                identity,
                payments,
            }),
        }
    }

    /// Production wiring: Postgres, the auth provider and Stripe.
    #[must_use]
    pub fn from_config(config: &AdminConfig, pool: PgPool) -> Self {
        Self::new(
            config.frontend_store_url.clone(),
            Arc::new(PgDatastore::new(pool)),
            Arc::new(ClerkClient::new(
                config.auth.api_url.clone(),
                config.auth.secret_key.clone(),
            )),
            Arc::new(StripeClient::new(
                config.stripe.api_url.clone(),
                config.stripe.secret_key.clone(),
            )),
        )
    }

    /// Public storefront base URL.
    #[must_use]
    pub fn frontend_store_url(&self) -> &Url {
        &self.inner.frontend_store_url
    }

    #[must_use]
    pub fn datastore(&self) -> &dyn Datastore {
        self.inner.datastore.as_ref()
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    #[must_use]
    pub fn payments(&self) -> &dyn PaymentGateway {
        self.inner.payments.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("frontend_store_url", &self.inner.frontend_store_url.as_str())
            .finish_non_exhaustive()
    }
}
