//! Shopdeck admin API client.
//!
//! - [`ApiClient`] - reads and raw requests against the admin API
//! - [`HttpTransport`] - executes mutations over HTTP
//! - [`MutationRunner`] - the submit/retry/redirect procedure every form
//!   and delete action shares
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(Url::parse("http://localhost:3001")?)?;
//! let runner = MutationRunner::new(
//!     Arc::new(HttpTransport::new(api)),
//!     Arc::new(StaticCredentials::new(token)),
//!     Arc::new(shell),
//! );
//! let form = FormState::new();
//! runner.submit(&form, &MutationRequest::create(ResourceKind::Size, store_id, body)).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
mod credentials;
mod error;
pub mod mutation;
mod transport;

pub use api::ApiClient;
pub use credentials::{CredentialProvider, StaticCredentials};
pub use error::ClientError;
pub use mutation::{
    FormState, MutationOutcome, MutationRequest, MutationRunner, MutationVerb, Notification,
    Shell,
};
pub use transport::{HttpTransport, Transport};
