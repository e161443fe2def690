use super::*;
use crate::store::{CredentialStore, MemoryStore};
use crate::test_support::{self, ScriptedTransport};
use crate::transport::{HttpRequest, HttpResponse, Method, TransportError};
use crate::types::ApplicationStatus;
use futures::channel::oneshot;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn loaded_view(transport: &ScriptedTransport, store: &MemoryStore) -> ApplicationsView<ScriptedTransport> {
    ApplicationsView::new(test_support::client(transport, store))
}

fn two_pending() -> serde_json::Value {
    json!([
        test_support::application_json(1, ApplicationStatus::Pending),
        test_support::application_json(2, ApplicationStatus::Pending),
    ])
}

// =============================================================
// Mount
// =============================================================

#[tokio::test]
async fn mount_without_token_shows_fixed_error_and_sends_nothing() {
    let transport = ScriptedTransport::new();
    let store = MemoryStore::new();
    let mut view = loaded_view(&transport, &store);

    view.mount().await.unwrap();
    assert_eq!(view.state().collection.load_error(), Some("Access token not found."));
    assert!(!view.state().collection.is_loading());
    assert!(view.state().items().is_empty());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn mount_stores_fetched_applications() {
    let transport = ScriptedTransport::new().reply(200, two_pending());
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);

    view.mount().await.unwrap();
    assert_eq!(view.state().items().len(), 2);
    assert_eq!(view.state().collection.load_error(), None);
    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, format!("{}/api/v1/applications", test_support::BASE_URL));
    assert_eq!(request.authorization().as_deref(), Some("Bearer tok"));
}

#[tokio::test]
async fn mount_failure_leaves_loaded_but_empty() {
    let transport = ScriptedTransport::new().reply(503, json!({}));
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);

    view.mount().await.unwrap();
    assert_eq!(view.state().collection.load_error(), Some("Failed to fetch applications"));
    assert!(view.state().items().is_empty());
    assert!(!view.state().collection.is_loading());
}

#[tokio::test]
async fn mount_keeps_records_with_null_fields() {
    let mut odd = test_support::application_json(2, ApplicationStatus::Pending);
    odd["status"] = json!("escalated");
    odd["farm"]["address"] = serde_json::Value::Null;
    odd["farm"]["farmer"]["last_name"] = serde_json::Value::Null;
    let transport = ScriptedTransport::new()
        .reply(200, json!([test_support::application_json(1, ApplicationStatus::Pending), odd]));
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);

    view.mount().await.unwrap();
    assert_eq!(view.state().collection.load_error(), None);
    assert_eq!(view.state().items().len(), 2);
    let kept = view.state().collection.get(2).unwrap();
    assert_eq!(kept.farm.address, "");
    assert_eq!(kept.farm.farmer.full_name(), "Ana");
    assert_eq!(kept.status, ApplicationStatus::Other("escalated".to_owned()));
    assert!(!kept.is_pending());
}

// =============================================================
// Approve / reject
// =============================================================

#[tokio::test]
async fn approve_replaces_item_with_server_record() {
    let mut server_record = test_support::application(1, ApplicationStatus::Approved);
    server_record.farm.is_verified = true;
    let transport = ScriptedTransport::new()
        .reply(200, two_pending())
        .reply(200, serde_json::to_value(&server_record).unwrap());
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);

    view.mount().await.unwrap();
    view.approve(1).await.unwrap();

    assert_eq!(view.state().collection.get(1), Some(&server_record));
    assert_eq!(
        view.state().collection.get(2).map(|a| a.status.clone()),
        Some(ApplicationStatus::Pending)
    );
    let request = &transport.requests()[1];
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.body, Some(json!({ "status": "approved" })));
}

#[tokio::test]
async fn reject_with_empty_reason_sends_nothing() {
    let transport = ScriptedTransport::new().reply(200, two_pending());
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);
    view.mount().await.unwrap();

    view.state_mut().open_rejection(1);
    view.state_mut().set_reason(1, "   ");
    view.reject(1).await.unwrap();

    assert_eq!(transport.request_count(), 1);
    assert_eq!(
        view.state().collection.errors().get(ActionKey::Reject(1)),
        Some(REJECTION_REASON_REQUIRED)
    );
    assert_eq!(view.state().rejecting(), Some(1));
}

#[tokio::test]
async fn reject_sends_trimmed_reason_and_closes_draft() {
    let transport = ScriptedTransport::new()
        .reply(200, two_pending())
        .reply(200, test_support::application_json(2, ApplicationStatus::Rejected));
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);
    view.mount().await.unwrap();

    view.state_mut().open_rejection(2);
    view.state_mut().set_reason(2, " blurry photos ");
    view.reject(2).await.unwrap();

    let request = &transport.requests()[1];
    assert_eq!(request.url, format!("{}/api/v1/applications/2/", test_support::BASE_URL));
    assert_eq!(request.body, Some(json!({ "status": "rejected", "rejection_reason": "blurry photos" })));
    assert_eq!(view.state().rejecting(), None);
    assert_eq!(view.state().reason(2), "");
    assert_eq!(
        view.state().collection.get(2).map(|a| a.status.clone()),
        Some(ApplicationStatus::Rejected)
    );
}

#[tokio::test]
async fn failed_approve_is_scoped_to_its_item() {
    let transport = ScriptedTransport::new()
        .reply(200, two_pending())
        .reply(500, json!({}));
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);
    view.mount().await.unwrap();

    view.approve(2).await.unwrap();
    let errors = view.state().collection.errors();
    assert_eq!(errors.for_item(2), Some("Failed to update application status"));
    assert_eq!(errors.for_item(1), None);
    assert_eq!(errors.latest(), Some("Failed to update application status"));
    assert!(view.state().items().iter().all(Application::is_pending));
}

#[tokio::test]
async fn unauthorized_update_ends_session_for_later_actions() {
    let transport = ScriptedTransport::new()
        .reply(200, two_pending())
        .reply(401, json!({}));
    let store = MemoryStore::with_access_token("tok");
    let mut view = loaded_view(&transport, &store);
    view.mount().await.unwrap();

    view.approve(1).await.unwrap();
    assert_eq!(store.access_token(), None);

    view.approve(2).await.unwrap();
    assert_eq!(transport.request_count(), 2);
    assert_eq!(
        view.state().collection.errors().get(ActionKey::Approve(2)),
        Some("Access token not found.")
    );
}

#[test]
fn apply_update_ignores_non_item_keys() {
    let mut state = ApplicationsState::new();
    state.apply_update(ActionKey::Load, Err(ApiError::MissingCredential));
    assert!(state.collection.errors().is_empty());
}

// =============================================================
// Cancellation
// =============================================================

/// Holds the single response until the test releases it.
#[derive(Clone)]
struct GatedTransport {
    gate: Arc<Mutex<Option<oneshot::Receiver<HttpResponse>>>>,
}

#[async_trait::async_trait(?Send)]
impl Transport for GatedTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let rx = self.gate.lock().unwrap().take();
        match rx {
            Some(rx) => rx.await.map_err(|_| TransportError("gate dropped".to_owned())),
            None => Err(TransportError("gate already used".to_owned())),
        }
    }
}

#[tokio::test]
async fn response_after_unmount_does_not_touch_state() {
    let (tx, rx) = oneshot::channel();
    let transport = GatedTransport { gate: Arc::new(Mutex::new(Some(rx))) };
    let store = MemoryStore::with_access_token("tok");
    let client = ApiClient::new(&test_support::config(crate::MessageSource::Fixed), transport, Arc::new(store));
    let mut view = ApplicationsView::new(client);
    let lifetime = view.lifetime().clone();

    let unmount = async {
        tokio::task::yield_now().await;
        lifetime.cancel();
        tx.send(HttpResponse::new(200, two_pending().to_string())).unwrap();
    };
    let (result, ()) = tokio::join!(view.mount(), unmount);

    assert_eq!(result, Err(Cancelled));
    assert!(view.state().items().is_empty());
    assert!(view.state().collection.is_loading());
}
