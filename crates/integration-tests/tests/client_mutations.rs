//! The client mutation protocol against a live admin server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;

use shopdeck_client::{
    ApiClient, ClientError, FormState, HttpTransport, MutationOutcome, MutationRequest,
    MutationRunner, Notification, Shell, StaticCredentials,
};
use shopdeck_core::{Billboard, ProductQuery, ResourceKind, Store};
use shopdeck_integration_tests::{INTRUDER_TOKEN, OWNER_TOKEN, TestApp};

#[derive(Default)]
struct RecordingShell {
    refreshes: Mutex<usize>,
    navigations: Mutex<Vec<String>>,
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingShell {
    fn refreshes(&self) -> usize {
        self.refreshes.lock().map(|n| *n).unwrap_or_default()
    }

    fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Shell for RecordingShell {
    fn refresh(&self) {
        if let Ok(mut n) = self.refreshes.lock() {
            *n += 1;
        }
    }

    fn navigate(&self, path: &str) {
        if let Ok(mut paths) = self.navigations.lock() {
            paths.push(path.to_owned());
        }
    }

    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.notifications.lock() {
            seen.push(notification);
        }
    }
}

struct Harness {
    app: TestApp,
    api: ApiClient,
    shell: Arc<RecordingShell>,
    runner: MutationRunner,
}

async fn harness(token: &str) -> Harness {
    let app = TestApp::new();
    let base = app.spawn().await;
    let api = ApiClient::new(base).unwrap_or_else(|e| panic!("client builds: {e}"));
    let shell = Arc::new(RecordingShell::default());
    let runner = MutationRunner::new(
        Arc::new(HttpTransport::new(api.clone())),
        Arc::new(StaticCredentials::new(SecretString::from(token.to_owned()))),
        shell.clone(),
    )
    .with_settle(Duration::ZERO);

    Harness {
        app,
        api,
        shell,
        runner,
    }
}

#[tokio::test]
async fn test_store_create_navigates_to_new_store() {
    let h = harness(OWNER_TOKEN).await;
    let form = FormState::new();

    let outcome = h
        .runner
        .submit(&form, &MutationRequest::create_store(json!({ "name": "Shop" })))
        .await;

    let MutationOutcome::Succeeded(body) = outcome else {
        panic!("store create failed: {outcome:?}");
    };
    let id = body["id"].as_str().unwrap_or_default();
    assert_eq!(h.shell.navigations(), vec![format!("/{id}")]);
    assert_eq!(h.shell.refreshes(), 1);
    assert_eq!(
        h.shell.notifications(),
        vec![Notification::Success("Store created.".to_owned())]
    );
    assert!(!form.is_loading());
    assert!(!form.is_submitting());

    let stores: Vec<Store> = h
        .api
        .list_stores(&SecretString::from(OWNER_TOKEN.to_owned()))
        .await
        .unwrap_or_default();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].id.to_string(), id);
}

#[tokio::test]
async fn test_billboard_create_returns_to_list() {
    let h = harness(OWNER_TOKEN).await;
    let store = h.app.create_store("Shop").await;

    let outcome = h
        .runner
        .submit(
            &FormState::new(),
            &MutationRequest::create(
                ResourceKind::Billboard,
                store,
                json!({ "label": "Summer", "imageUrl": "https://img.test/a.png" }),
            ),
        )
        .await;

    assert!(outcome.is_success());
    assert_eq!(h.shell.navigations(), vec![format!("/{store}/billboards")]);

    let billboards: Vec<Billboard> = h
        .api
        .list(store, ResourceKind::Billboard)
        .await
        .unwrap_or_default();
    assert_eq!(billboards.len(), 1);
    let fetched: Option<Billboard> = h
        .api
        .get(store, ResourceKind::Billboard, billboards[0].id.into())
        .await
        .unwrap_or_default();
    assert_eq!(fetched.map(|b| b.label), Some("Summer".to_owned()));
}

#[tokio::test]
async fn test_blocked_delete_reports_dependency() {
    let h = harness(OWNER_TOKEN).await;
    let store = h.app.create_store("Shop").await;
    let catalog = h.app.seed_catalog(store).await;
    let billboard = Uuid::parse_str(&catalog.billboard).unwrap_or_default();
    let form = FormState::new();
    form.open_dialog();

    let outcome = h
        .runner
        .submit(
            &form,
            &MutationRequest::delete(ResourceKind::Billboard, store, billboard),
        )
        .await;

    assert!(matches!(
        outcome,
        MutationOutcome::Failed(ClientError::Api { status: 500, .. })
    ));
    assert!(h.shell.navigations().is_empty());
    assert_eq!(
        h.shell.notifications(),
        vec![Notification::Error(
            "Make sure you remove all categories using this billboard first.".to_owned()
        )]
    );
    assert!(!form.is_dialog_open());
    assert!(!form.is_loading());
}

#[tokio::test]
async fn test_rejected_session_fails_store_create() {
    let h = harness("sess_expired").await;

    let outcome = h
        .runner
        .submit(
            &FormState::new(),
            &MutationRequest::create_store(json!({ "name": "Shop" })),
        )
        .await;

    assert!(matches!(
        outcome,
        MutationOutcome::Failed(ClientError::Api { status: 401, .. })
    ));
    assert_eq!(
        h.shell.notifications(),
        vec![Notification::Error("Something went wrong.".to_owned())]
    );
    assert_eq!(h.shell.refreshes(), 0);
}

#[tokio::test]
async fn test_foreign_store_update_is_refused() {
    let h = harness(INTRUDER_TOKEN).await;
    let store = h.app.create_store("Shop").await;

    let outcome = h
        .runner
        .submit(
            &FormState::new(),
            &MutationRequest::update_store(store, json!({ "name": "Mine now" })),
        )
        .await;

    assert!(matches!(
        outcome,
        MutationOutcome::Failed(ClientError::Api { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_list_products_applies_filters() {
    let h = harness(OWNER_TOKEN).await;
    let store = h.app.create_store("Shop").await;
    let catalog = h.app.seed_catalog(store).await;
    h.app
        .create(store, "products", catalog.product("plain", "10", false))
        .await;
    h.app
        .create(store, "products", catalog.product("star", "12", true))
        .await;

    let featured = h
        .api
        .list_products(
            store,
            &ProductQuery {
                is_featured: Some(true),
                ..ProductQuery::default()
            },
        )
        .await
        .unwrap_or_default();

    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].product.name, "star");
    assert_eq!(featured[0].color.value, "#f00");
}
