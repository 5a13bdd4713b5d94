//! Form submission protocol.
//!
//! Every create, update and delete action in the admin UI goes through the
//! same procedure, parametrized only by resource kind and verb:
//!
//! 1. Refuse to start if the form already has a submission in flight.
//! 2. Up to [`ATTEMPTS`] times: signal a session refresh, wait the settle
//!    delay, fetch a fresh token, send the request. Clear `loading` (and
//!    close the confirm dialog for deletes) after every attempt.
//! 3. On the first success: refresh the view, navigate to the list view and
//!    show the success message.
//! 4. If every attempt fails: show the failure message once and stay put.
//!
//! Failures never propagate past the notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::Method;
use secrecy::SecretString;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use shopdeck_core::{ResourceKind, StoreId};

use crate::api::{collection_path, item_path, stores_path};
use crate::{ClientError, CredentialProvider, Transport};

/// Attempts per submission.
pub const ATTEMPTS: u32 = 2;

/// Wait between the refresh signal and the token fetch.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// What a submission does to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationVerb {
    Create,
    Update,
    Delete,
}

impl MutationVerb {
    /// HTTP method for the verb.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::Create => Method::POST,
            Self::Update => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }
}

/// Toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// The view the protocol drives.
pub trait Shell: Send + Sync {
    /// Re-fetch the current route's data.
    fn refresh(&self);

    /// Go to another route.
    fn navigate(&self, path: &str);

    fn notify(&self, notification: Notification);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Stores,
    Store(StoreId),
    Collection(StoreId),
    Item(StoreId, Uuid),
}

impl Target {
    const fn store_id(self) -> Option<StoreId> {
        match self {
            Self::Stores => None,
            Self::Store(id) | Self::Collection(id) | Self::Item(id, _) => Some(id),
        }
    }
}

/// One mutation, addressed by the current navigation context.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    kind: ResourceKind,
    verb: MutationVerb,
    target: Target,
    body: Option<serde_json::Value>,
}

impl MutationRequest {
    /// Create a resource in a store. For [`ResourceKind::Store`] the store
    /// id is ignored and a new store is created.
    #[must_use]
    pub fn create(kind: ResourceKind, store_id: StoreId, body: serde_json::Value) -> Self {
        let target = match kind {
            ResourceKind::Store => Target::Stores,
            _ => Target::Collection(store_id),
        };
        Self {
            kind,
            verb: MutationVerb::Create,
            target,
            body: Some(body),
        }
    }

    /// Create a new store.
    #[must_use]
    pub const fn create_store(body: serde_json::Value) -> Self {
        Self {
            kind: ResourceKind::Store,
            verb: MutationVerb::Create,
            target: Target::Stores,
            body: Some(body),
        }
    }

    /// Update a resource in a store.
    #[must_use]
    pub fn update(kind: ResourceKind, store_id: StoreId, id: Uuid, body: serde_json::Value) -> Self {
        Self {
            kind,
            verb: MutationVerb::Update,
            target: Self::item_target(kind, store_id, id),
            body: Some(body),
        }
    }

    /// Delete a resource from a store.
    #[must_use]
    pub fn delete(kind: ResourceKind, store_id: StoreId, id: Uuid) -> Self {
        Self {
            kind,
            verb: MutationVerb::Delete,
            target: Self::item_target(kind, store_id, id),
            body: None,
        }
    }

    /// Rename a store.
    #[must_use]
    pub const fn update_store(store_id: StoreId, body: serde_json::Value) -> Self {
        Self {
            kind: ResourceKind::Store,
            verb: MutationVerb::Update,
            target: Target::Store(store_id),
            body: Some(body),
        }
    }

    /// Delete a store.
    #[must_use]
    pub const fn delete_store(store_id: StoreId) -> Self {
        Self {
            kind: ResourceKind::Store,
            verb: MutationVerb::Delete,
            target: Target::Store(store_id),
            body: None,
        }
    }

    fn item_target(kind: ResourceKind, store_id: StoreId, id: Uuid) -> Target {
        match kind {
            ResourceKind::Store => Target::Store(store_id),
            _ => Target::Item(store_id, id),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub const fn verb(&self) -> MutationVerb {
        self.verb
    }

    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// API path the request is sent to.
    #[must_use]
    pub fn path(&self) -> String {
        match self.target {
            Target::Stores => stores_path(None),
            Target::Store(id) => stores_path(Some(id)),
            Target::Collection(store) => collection_path(store, self.kind),
            Target::Item(store, id) => item_path(store, self.kind, id),
        }
    }

    /// Where to go after success. `None` means stay and refresh.
    ///
    /// A new store has no list view; the user lands on its dashboard, whose
    /// path is the id the server assigned.
    #[must_use]
    pub fn redirect(&self, response: &serde_json::Value) -> Option<String> {
        match (self.kind, self.verb) {
            (ResourceKind::Store, MutationVerb::Create) => response
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(|id| format!("/{id}")),
            (ResourceKind::Store, MutationVerb::Update) => None,
            (ResourceKind::Store, MutationVerb::Delete) => Some("/".to_owned()),
            (kind, _) => self
                .target
                .store_id()
                .map(|store| format!("/{store}/{}", kind.path_segment())),
        }
    }
}

/// Message shown after a successful mutation.
#[must_use]
pub fn success_message(kind: ResourceKind, verb: MutationVerb) -> String {
    let done = match verb {
        MutationVerb::Create => "created",
        MutationVerb::Update => "updated",
        MutationVerb::Delete => "deleted",
    };
    format!("{kind} {done}.")
}

/// Message shown once every attempt has failed.
///
/// Delete failures are almost always a dependent row still pointing at the
/// target, so the message says which one to remove first.
#[must_use]
pub const fn failure_message(kind: ResourceKind, verb: MutationVerb) -> &'static str {
    match (kind, verb) {
        (ResourceKind::Billboard, MutationVerb::Delete) => {
            "Make sure you remove all categories using this billboard first."
        }
        (ResourceKind::Category, MutationVerb::Delete) => {
            "Make sure you remove all products using this category first."
        }
        (ResourceKind::Color, MutationVerb::Delete) => {
            "Make sure you remove all products using this color first."
        }
        (ResourceKind::Size, MutationVerb::Delete) => {
            "Make sure you remove all products using this size first."
        }
        (ResourceKind::Store, MutationVerb::Delete) => {
            "Make sure you remove all products and categories first."
        }
        (ResourceKind::Store, _) => "Something went wrong.",
        _ => "Something went wrong",
    }
}

/// Per-form view flags.
///
/// `loading` disables the submit control and `dialog_open` shows the delete
/// confirmation. A separate in-flight flag spans the whole submission so a
/// second submit is refused even between attempts.
#[derive(Debug, Default)]
pub struct FormState {
    in_flight: AtomicBool,
    loading: AtomicBool,
    dialog_open: AtomicBool,
}

impl FormState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            loading: AtomicBool::new(false),
            dialog_open: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open.load(Ordering::SeqCst)
    }

    /// Whether a submission is running.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Show the delete confirmation.
    pub fn open_dialog(&self) {
        self.dialog_open.store(true, Ordering::SeqCst);
    }

    pub fn close_dialog(&self) {
        self.dialog_open.store(false, Ordering::SeqCst);
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlight(self))
    }

    fn cleanup(&self, verb: MutationVerb) {
        self.loading.store(false, Ordering::SeqCst);
        if verb == MutationVerb::Delete {
            self.close_dialog();
        }
    }
}

/// Releases the in-flight flag when the submission ends, however it ends.
struct InFlight<'a>(&'a FormState);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Result of [`MutationRunner::submit`].
#[derive(Debug)]
pub enum MutationOutcome {
    /// The server accepted the mutation; carries the response body.
    Succeeded(serde_json::Value),
    /// Every attempt failed; carries the last error.
    Failed(ClientError),
    /// Another submission on the same form was still running.
    Busy,
}

impl MutationOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Runs the submission procedure for any form.
pub struct MutationRunner {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    shell: Arc<dyn Shell>,
    settle: Duration,
}

impl MutationRunner {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialProvider>,
        shell: Arc<dyn Shell>,
    ) -> Self {
        Self {
            transport,
            credentials,
            shell,
            settle: DEFAULT_SETTLE,
        }
    }

    /// Override the settle delay.
    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Submit `request` on behalf of `form`.
    ///
    /// Never fails outright: the outcome is reported to the [`Shell`] and
    /// returned for callers that want it.
    #[instrument(skip_all, fields(kind = %request.kind(), verb = ?request.verb()))]
    pub async fn submit(&self, form: &FormState, request: &MutationRequest) -> MutationOutcome {
        let Some(_in_flight) = form.try_begin() else {
            debug!("Submission already in flight");
            return MutationOutcome::Busy;
        };

        let mut last_error = None;
        for attempt in 1..=ATTEMPTS {
            form.loading.store(true, Ordering::SeqCst);
            let result = self.attempt(request).await;
            form.cleanup(request.verb());

            match result {
                Ok(body) => {
                    self.succeed(request, &body);
                    return MutationOutcome::Succeeded(body);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Mutation attempt failed");
                    last_error = Some(e);
                }
            }
        }

        let message = failure_message(request.kind(), request.verb());
        error!(%message, "Mutation failed after {ATTEMPTS} attempts");
        self.shell.notify(Notification::Error(message.to_owned()));
        MutationOutcome::Failed(
            last_error.unwrap_or_else(|| ClientError::Request("no attempt was made".to_owned())),
        )
    }

    async fn attempt(&self, request: &MutationRequest) -> Result<serde_json::Value, ClientError> {
        self.credentials.refresh_session().await;
        tokio::time::sleep(self.settle).await;
        let token: SecretString = self.credentials.token().await?;
        self.transport.execute(request, &token).await
    }

    fn succeed(&self, request: &MutationRequest, body: &serde_json::Value) {
        self.shell.refresh();
        if let Some(path) = request.redirect(body) {
            self.shell.navigate(&path);
        }
        self.shell
            .notify(Notification::Success(success_message(request.kind(), request.verb())));
    }
}
