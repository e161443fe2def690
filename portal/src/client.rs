//! REST client for the verification API.
//!
//! SYSTEM CONTEXT
//! ==============
//! One method per remote call. Authenticated calls read the access token from
//! the credential store at call time and fail with
//! [`ApiError::MissingCredential`] before touching the transport when it is
//! absent.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::RequestFailed`] carrying the call's
//! fixed message, or the server's detail when the config asks for it. A 401 on
//! an authenticated call invalidates the session before the error returns. A
//! 2xx body that does not decode also surfaces the fixed message; the serde
//! detail only goes to the log.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{MessageSource, PortalConfig};
use crate::error::ApiError;
use crate::store::CredentialStore;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::types::{Application, Category, Credentials, NewCategory, Profile, StatusUpdate, TokenPair};

pub const TOKEN_PATH: &str = "/api/v1/token/";
pub const PROFILE_PATH: &str = "/api/v1/profile";
pub const APPLICATIONS_PATH: &str = "/api/v1/applications";
pub const CATEGORIES_PATH: &str = "/api/v1/categories";

/// Longest server detail surfaced under [`MessageSource::Server`].
const MAX_SERVER_DETAIL_CHARS: usize = 200;

#[must_use]
pub fn application_path(id: u64) -> String {
    format!("{APPLICATIONS_PATH}/{id}/")
}

#[must_use]
pub fn add_category_path() -> String {
    format!("{CATEGORIES_PATH}/")
}

#[must_use]
pub fn category_path(id: u64) -> String {
    format!("{CATEGORIES_PATH}/{id}")
}

/// Remote calls, used for logging and fixed failure messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Login,
    Profile,
    ListApplications,
    UpdateApplication,
    ListCategories,
    AddCategory,
    DeleteCategory,
}

impl Call {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Profile => "profile",
            Self::ListApplications => "applications:list",
            Self::UpdateApplication => "applications:update",
            Self::ListCategories => "categories:list",
            Self::AddCategory => "categories:add",
            Self::DeleteCategory => "categories:delete",
        }
    }

    #[must_use]
    pub fn fixed_message(self) -> &'static str {
        match self {
            Self::Login => "Invalid email or password",
            Self::Profile => "Failed to fetch profile",
            Self::ListApplications => "Failed to fetch applications",
            Self::UpdateApplication => "Failed to update application status",
            Self::ListCategories => "Failed to fetch categories",
            Self::AddCategory => "Failed to add category",
            Self::DeleteCategory => "Failed to delete category",
        }
    }
}

/// API client over a pluggable transport and a shared credential store.
#[derive(Clone)]
pub struct ApiClient<T> {
    base_url: String,
    messages: MessageSource,
    transport: T,
    store: Arc<dyn CredentialStore>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: &PortalConfig, transport: T, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            messages: config.messages,
            transport,
            store,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The stored access token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] when none is stored.
    pub fn require_token(&self) -> Result<String, ApiError> {
        self.store.access_token().ok_or(ApiError::MissingCredential)
    }

    /// End the session by clearing the credential store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store.invalidate()?;
        tracing::info!("session invalidated by logout");
        Ok(())
    }

    /// Exchange email/password for a token pair. Does not persist the tokens.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn obtain_tokens(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let body = encode(Call::Login, credentials)?;
        let response = self.execute(Call::Login, Method::Post, TOKEN_PATH, Some(body), None).await?;
        decode(Call::Login, &response)
    }

    /// Fetch the profile for an explicit access token.
    ///
    /// Used right after login so the check runs against the fresh token rather
    /// than whatever the store holds.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<Profile, ApiError> {
        let response =
            self.execute(Call::Profile, Method::Get, PROFILE_PATH, None, Some(access_token)).await?;
        decode(Call::Profile, &response)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] without a token, else any request failure.
    pub async fn list_applications(&self) -> Result<Vec<Application>, ApiError> {
        let token = self.require_token()?;
        let response =
            self.execute(Call::ListApplications, Method::Get, APPLICATIONS_PATH, None, Some(&token)).await?;
        decode(Call::ListApplications, &response)
    }

    /// Change an application's status and return the server's record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] without a token, else any request failure.
    pub async fn update_application(&self, id: u64, update: &StatusUpdate) -> Result<Application, ApiError> {
        let token = self.require_token()?;
        let body = encode(Call::UpdateApplication, update)?;
        let path = application_path(id);
        let response =
            self.execute(Call::UpdateApplication, Method::Put, &path, Some(body), Some(&token)).await?;
        decode(Call::UpdateApplication, &response)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] without a token, else any request failure.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let token = self.require_token()?;
        let response =
            self.execute(Call::ListCategories, Method::Get, CATEGORIES_PATH, None, Some(&token)).await?;
        decode(Call::ListCategories, &response)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] without a token, else any request failure.
    pub async fn add_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let token = self.require_token()?;
        let body = encode(Call::AddCategory, category)?;
        let path = add_category_path();
        let response = self.execute(Call::AddCategory, Method::Post, &path, Some(body), Some(&token)).await?;
        decode(Call::AddCategory, &response)
    }

    /// Delete a category. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] without a token, else any request failure.
    pub async fn delete_category(&self, id: u64) -> Result<(), ApiError> {
        let token = self.require_token()?;
        let path = category_path(id);
        self.execute(Call::DeleteCategory, Method::Delete, &path, None, Some(&token)).await?;
        Ok(())
    }

    async fn execute(
        &self,
        call: Call,
        method: Method,
        path: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest { method, url: self.url(path), bearer: bearer.map(str::to_owned), body };
        tracing::debug!(call = call.name(), %method, path, "sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(call = call.name(), error = %e, "request did not complete");
                return Err(ApiError::RequestFailed { status: None, message: self.failure_message(call, None) });
            }
        };

        if response.is_success() {
            tracing::debug!(call = call.name(), status = response.status, "request succeeded");
            return Ok(response);
        }

        tracing::warn!(call = call.name(), status = response.status, "request failed");
        if response.status == 401 && bearer.is_some() {
            match self.store.invalidate() {
                Ok(()) => tracing::info!(call = call.name(), "session invalidated after 401"),
                Err(e) => tracing::warn!(call = call.name(), error = %e, "failed to invalidate session after 401"),
            }
        }
        Err(ApiError::RequestFailed {
            status: Some(response.status),
            message: self.failure_message(call, Some(&response.body)),
        })
    }

    fn failure_message(&self, call: Call, body: Option<&str>) -> String {
        match self.messages {
            MessageSource::Fixed => call.fixed_message().to_owned(),
            MessageSource::Server => body
                .and_then(server_detail)
                .unwrap_or_else(|| call.fixed_message().to_owned()),
        }
    }
}

fn encode<B: Serialize>(call: Call, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| {
        tracing::warn!(call = call.name(), error = %e, "request body did not serialize");
        ApiError::Decode(call.fixed_message().to_owned())
    })
}

fn decode<R: DeserializeOwned>(call: Call, response: &HttpResponse) -> Result<R, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| {
        tracing::warn!(call = call.name(), error = %e, "response body did not match");
        ApiError::Decode(call.fixed_message().to_owned())
    })
}

/// Extract a human-readable detail from an error body.
///
/// Looks for `detail`, `message`, or `error` string fields in a JSON object,
/// then falls back to the trimmed raw body.
pub(crate) fn server_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return ["detail", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_owned);
    }
    Some(trimmed.chars().take(MAX_SERVER_DETAIL_CHARS).collect())
}
