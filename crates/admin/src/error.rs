//! Unified error handling for the admin API.
//!
//! Every error becomes a plain-text response. The status code is the only
//! structured information a client gets; server-side details stay in the
//! logs and in Sentry.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{IdentityError, PaymentError};
use shopdeck_core::FieldErrors;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid credential on the request.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Payload failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Caller does not own the store.
    #[error("Unauthorized")]
    Forbidden,

    /// Nothing matched in the caller's store.
    #[error("Not found")]
    NotFound,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Identity provider could not be reached or answered badly.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Payment gateway operation failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound | Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Identity(_) | Self::Payment(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Whether this error is the server's fault and worth reporting.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::BadRequest(
            errors
                .first_message()
                .unwrap_or("Invalid request")
                .to_string(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(_) | Self::Internal(_) => "Internal error".to_string(),
            Self::Identity(_) | Self::Payment(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Attach a fixed route tag to a handler's failures.
///
/// Server-side failures are logged as `[TAG]` so each route can be traced
/// in the logs without exposing anything to the client.
pub trait RouteTag<T> {
    /// Convert the error into an [`AppError`], logging it under `tag`.
    ///
    /// # Errors
    ///
    /// Returns the converted error unchanged in meaning.
    fn tag(self, tag: &'static str) -> Result<T, AppError>;
}

impl<T, E> RouteTag<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn tag(self, tag: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            let err = e.into();
            if err.is_server_error() {
                tracing::error!(route = tag, error = %err, "[{tag}]");
            }
            err
        })
    }
}

/// Set the Sentry user context from the verified user id.
pub fn set_sentry_user(user_id: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}
