use super::*;
use crate::store::{CredentialStore, MemoryStore, REFRESH_TOKEN_KEY};
use crate::test_support::{self, ScriptedTransport};
use serde_json::json;

fn tokens_reply(transport: ScriptedTransport) -> ScriptedTransport {
    transport.reply(200, json!({ "access": "acc-new", "refresh": "ref-new" }))
}

// =============================================================
// Form state machine
// =============================================================

#[test]
fn new_form_is_idle_with_login_label() {
    let form = LoginForm::new("a@b.c", "pw");
    assert_eq!(form.state(), &LoginState::Idle);
    assert_eq!(form.button_label(), "Login");
    assert_eq!(form.message(), None);
}

#[test]
fn begin_submit_trims_email_and_enters_submitting() {
    let mut form = LoginForm::new("  a@b.c ", "pw");
    let creds = form.begin_submit().unwrap();
    assert_eq!(creds.email, "a@b.c");
    assert_eq!(creds.password, "pw");
    assert!(form.is_submitting());
    assert_eq!(form.button_label(), "Logging in...");
}

#[test]
fn second_submit_while_in_flight_is_refused() {
    let mut form = LoginForm::new("a@b.c", "pw");
    form.begin_submit().unwrap();
    assert_eq!(form.begin_submit(), Err(SubmitRefused::InFlight));
    assert!(form.is_submitting());
}

#[test]
fn empty_fields_are_refused_locally() {
    let mut form = LoginForm::new("   ", "pw");
    assert_eq!(form.begin_submit(), Err(SubmitRefused::Incomplete));
    assert_eq!(form.message(), Some(INCOMPLETE_FORM_MESSAGE));

    let mut form = LoginForm::new("a@b.c", "");
    assert_eq!(form.begin_submit(), Err(SubmitRefused::Incomplete));
}

#[test]
fn finish_navigates_exactly_once() {
    let mut form = LoginForm::new("a@b.c", "pw");
    form.begin_submit().unwrap();
    assert_eq!(form.finish(LoginOutcome::Authenticated), Some(Route::Dashboard));
    assert_eq!(form.finish(LoginOutcome::Authenticated), None);
    assert_eq!(form.state(), &LoginState::Authenticated);
}

#[test]
fn finish_without_submit_is_ignored() {
    let mut form = LoginForm::default();
    assert_eq!(form.finish(LoginOutcome::Authenticated), None);
    assert_eq!(form.state(), &LoginState::Idle);
}

#[test]
fn failed_and_rejected_are_reenterable() {
    let mut form = LoginForm::new("a@b.c", "pw");
    form.begin_submit().unwrap();
    form.finish(LoginOutcome::Rejected);
    assert_eq!(form.message(), Some("Not allowed"));

    form.begin_submit().unwrap();
    form.finish(LoginOutcome::Failed("boom".to_owned()));
    assert_eq!(form.message(), Some("boom"));

    assert!(form.begin_submit().is_ok());
}

#[test]
fn abandon_releases_in_flight_flag() {
    let mut form = LoginForm::new("a@b.c", "pw");
    form.begin_submit().unwrap();
    form.abandon();
    assert_eq!(form.state(), &LoginState::Idle);
    assert!(form.begin_submit().is_ok());
}

// =============================================================
// authenticate
// =============================================================

#[tokio::test]
async fn failed_exchange_reports_invalid_credentials_for_any_status() {
    for status in [400_u16, 401, 403, 500, 502] {
        let transport = ScriptedTransport::new().reply(status, json!({ "detail": "whatever" }));
        let store = MemoryStore::new();
        let client = test_support::client(&transport, &store);
        let mut form = LoginForm::new("a@b.c", "pw");

        assert_eq!(form.submit(&client).await, None);
        assert_eq!(form.state(), &LoginState::Failed("Invalid email or password".to_owned()));
        assert!(store.is_empty());
        assert_eq!(transport.request_count(), 1);
    }
}

#[tokio::test]
async fn network_failure_also_reports_invalid_credentials() {
    let transport = ScriptedTransport::new().fail("dns");
    let store = MemoryStore::new();
    let client = test_support::client(&transport, &store);
    let mut form = LoginForm::new("a@b.c", "pw");

    form.submit(&client).await;
    assert_eq!(form.message(), Some("Invalid email or password"));
}

#[tokio::test]
async fn admin_role_navigates_to_dashboard() {
    let transport = tokens_reply(ScriptedTransport::new()).reply(200, json!({ "role": "Admin", "id": 1 }));
    let store = MemoryStore::new();
    let client = test_support::client(&transport, &store);
    let mut form = LoginForm::new("a@b.c", "pw");

    assert_eq!(form.submit(&client).await, Some(Route::Dashboard));
    assert_eq!(form.state(), &LoginState::Authenticated);
    assert_eq!(store.access_token().as_deref(), Some("acc-new"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].authorization().as_deref(), Some("Bearer acc-new"));
}

#[tokio::test]
async fn non_admin_is_rejected_but_tokens_persist() {
    let transport = tokens_reply(ScriptedTransport::new()).reply(200, json!({ "role": "Farmer" }));
    let store = MemoryStore::new();
    let client = test_support::client(&transport, &store);
    let mut form = LoginForm::new("a@b.c", "pw");

    assert_eq!(form.submit(&client).await, None);
    assert_eq!(form.state(), &LoginState::Rejected);
    assert_eq!(form.message(), Some("Not allowed"));
    assert_eq!(store.access_token().as_deref(), Some("acc-new"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-new"));
}

#[tokio::test]
async fn profile_failure_fails_but_keeps_tokens() {
    let transport = tokens_reply(ScriptedTransport::new()).reply(500, json!({}));
    let store = MemoryStore::new();
    let client = test_support::client(&transport, &store);

    let outcome = authenticate(&client, &LoginForm::new("a@b.c", "pw").begin_submit().unwrap()).await;
    assert_eq!(outcome, LoginOutcome::Failed("Failed to fetch profile".to_owned()));
    assert_eq!(store.access_token().as_deref(), Some("acc-new"));
}

#[tokio::test]
async fn unauthorized_profile_clears_fresh_tokens() {
    let transport = tokens_reply(ScriptedTransport::new()).reply(401, json!({}));
    let store = MemoryStore::new();
    let client = test_support::client(&transport, &store);

    let outcome = authenticate(&client, &LoginForm::new("a@b.c", "pw").begin_submit().unwrap()).await;
    assert_eq!(outcome, LoginOutcome::Failed("Failed to fetch profile".to_owned()));
    assert!(store.is_empty());
}

#[tokio::test]
async fn refused_submit_sends_nothing() {
    let transport = ScriptedTransport::new();
    let store = MemoryStore::new();
    let client = test_support::client(&transport, &store);
    let mut form = LoginForm::new("", "");

    assert_eq!(form.submit(&client).await, None);
    assert_eq!(transport.request_count(), 0);
}
