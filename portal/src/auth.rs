//! Login state machine and the admin role gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Idle → Submitting → {Authenticated, Rejected, Failed}`. The form owns the
//! in-flight flag; [`LoginForm::begin_submit`] refuses while a submit is
//! outstanding, so a second trigger never dispatches a second exchange.
//! [`authenticate`] does the network part and [`LoginForm::finish`] applies
//! its outcome. Splitting the two lets browser pages run the network part in a
//! detached task while the form lives in a signal.
//!
//! Tokens are persisted as soon as the exchange succeeds. A later profile
//! failure or role rejection leaves them in place; only a 401 clears them.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::client::ApiClient;
use crate::routes::Route;
use crate::transport::Transport;
use crate::types::Credentials;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
pub const NOT_ALLOWED_MESSAGE: &str = "Not allowed";
pub const INCOMPLETE_FORM_MESSAGE: &str = "Enter both email and password.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoginState {
    #[default]
    Idle,
    Submitting,
    Authenticated,
    Rejected,
    Failed(String),
}

/// Result of one credential exchange + role check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Rejected,
    Failed(String),
}

/// Why [`LoginForm::begin_submit`] did not start a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitRefused {
    /// A submission is already in flight.
    InFlight,
    /// Email or password is empty.
    Incomplete,
}

/// Login form fields plus the state machine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    state: LoginState,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into(), state: LoginState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> &LoginState {
        &self.state
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state == LoginState::Submitting
    }

    /// Message to show under the form, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            LoginState::Failed(message) => Some(message),
            LoginState::Rejected => Some(NOT_ALLOWED_MESSAGE),
            _ => None,
        }
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.is_submitting() { "Logging in..." } else { "Login" }
    }

    /// Move to `Submitting` and hand out the credentials to send.
    ///
    /// # Errors
    ///
    /// Refuses while a submission is in flight (state unchanged) or when a
    /// field is empty (state becomes `Failed` with a prompt).
    pub fn begin_submit(&mut self) -> Result<Credentials, SubmitRefused> {
        if self.is_submitting() {
            tracing::debug!("login submit ignored while one is in flight");
            return Err(SubmitRefused::InFlight);
        }
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            self.state = LoginState::Failed(INCOMPLETE_FORM_MESSAGE.to_owned());
            return Err(SubmitRefused::Incomplete);
        }
        let credentials = Credentials { email: email.to_owned(), password: self.password.clone() };
        self.state = LoginState::Submitting;
        Ok(credentials)
    }

    /// Apply an outcome. Returns the route to navigate to, at most once per
    /// submission; outcomes arriving while not `Submitting` are ignored.
    pub fn finish(&mut self, outcome: LoginOutcome) -> Option<Route> {
        if !self.is_submitting() {
            return None;
        }
        match outcome {
            LoginOutcome::Authenticated => {
                self.state = LoginState::Authenticated;
                Some(Route::Dashboard)
            }
            LoginOutcome::Rejected => {
                self.state = LoginState::Rejected;
                None
            }
            LoginOutcome::Failed(message) => {
                self.state = LoginState::Failed(message);
                None
            }
        }
    }

    /// Release the in-flight flag without an outcome (e.g. the page went away).
    pub fn abandon(&mut self) {
        if self.is_submitting() {
            self.state = LoginState::Idle;
        }
    }

    /// Full submit: begin, authenticate, finish.
    ///
    /// Holding `&mut self` across the exchange is fine for callers that own the
    /// form outright (the CLI, tests). Returns the navigation target, if any.
    pub async fn submit<T: Transport>(&mut self, client: &ApiClient<T>) -> Option<Route> {
        let credentials = self.begin_submit().ok()?;
        let outcome = authenticate(client, &credentials).await;
        self.finish(outcome)
    }
}

/// Exchange credentials for tokens, persist them, and gate on the admin role.
pub async fn authenticate<T: Transport>(client: &ApiClient<T>, credentials: &Credentials) -> LoginOutcome {
    let tokens = match client.obtain_tokens(credentials).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::info!(error = %e, "credential exchange failed");
            return LoginOutcome::Failed(INVALID_CREDENTIALS_MESSAGE.to_owned());
        }
    };

    if let Err(e) = client.store().save_tokens(&tokens) {
        tracing::warn!(error = %e, "could not persist tokens");
        return LoginOutcome::Failed(e.to_string());
    }

    let profile = match client.fetch_profile(&tokens.access).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::info!(error = %e, "profile fetch failed after login");
            return LoginOutcome::Failed(e.to_string());
        }
    };

    if profile.is_admin() {
        tracing::info!("admin login accepted");
        LoginOutcome::Authenticated
    } else {
        tracing::info!(role = %profile.role, "login rejected by role gate");
        LoginOutcome::Rejected
    }
}
