//! Subcommand implementations.

pub mod checkout;
pub mod migrate;
pub mod resources;

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use thiserror::Error;

use shopdeck_client::{
    ApiClient, ClientError, FormState, HttpTransport, MutationOutcome, MutationRequest,
    MutationRunner, StaticCredentials,
};
use shopdeck_core::{FieldErrors, Validate};

use crate::shell::TerminalShell;

/// Errors from store management commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Mutations need a session token.
    #[error("Missing session token: pass --token or set SHOPDECK_TOKEN")]
    MissingToken,

    /// Client-side validation rejected the form.
    #[error("Invalid input: {0}")]
    Invalid(FieldErrors),

    /// The API could not be reached or rejected a read.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The form could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// Every attempt failed; the failure was already shown.
    #[error("Request failed")]
    MutationFailed,
}

/// What every store management command needs.
pub struct Context {
    pub api: ApiClient,
    pub token: Option<SecretString>,
}

impl Context {
    fn runner(&self) -> Result<MutationRunner, CommandError> {
        let token = self.token.clone().ok_or(CommandError::MissingToken)?;
        Ok(MutationRunner::new(
            Arc::new(HttpTransport::new(self.api.clone())),
            Arc::new(StaticCredentials::new(token)),
            Arc::new(TerminalShell),
        ))
    }

    /// Run a mutation through the shared submission procedure.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::MutationFailed` once every attempt has failed.
    pub async fn submit(&self, request: MutationRequest) -> Result<(), CommandError> {
        let runner = self.runner()?;
        let form = FormState::new();
        match runner.submit(&form, &request).await {
            MutationOutcome::Succeeded(body) => {
                print_json(&body)?;
                Ok(())
            }
            MutationOutcome::Failed(_) | MutationOutcome::Busy => Err(CommandError::MutationFailed),
        }
    }
}

/// Validate a form and encode it as the request body.
///
/// Field errors are printed one per line before returning.
///
/// # Errors
///
/// Returns `CommandError::Invalid` when validation fails.
pub fn validated<T: Validate + Serialize>(input: &T) -> Result<serde_json::Value, CommandError> {
    if let Err(errors) = input.validate() {
        report(&errors);
        return Err(CommandError::Invalid(errors));
    }
    Ok(serde_json::to_value(input)?)
}

#[allow(clippy::print_stderr)]
fn report(errors: &FieldErrors) {
    for error in errors.iter() {
        eprintln!("  {}: {}", error.field, error.message);
    }
}

/// Pretty-print a value to stdout.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdeck_core::{ColorInput, StoreInput};

    #[test]
    fn test_validated_rejects_before_encoding() {
        let input = ColorInput {
            name: "Red".to_owned(),
            value: "ff0000".to_owned(),
        };
        let err = validated(&input);
        assert!(matches!(err, Err(CommandError::Invalid(ref e)) if e.get("value").is_some()));
    }

    #[test]
    fn test_validated_encodes_camel_case() {
        let body = validated(&StoreInput {
            name: "Shop".to_owned(),
        });
        assert!(matches!(body, Ok(ref v) if v["name"] == "Shop"));
    }
}
