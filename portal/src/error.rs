//! Error taxonomy shared by the API client and the views.
//!
//! ERROR HANDLING
//! ==============
//! Every variant renders as the flat string the views show to the user, so
//! `to_string()` is the display contract. Nothing here is retried.

use crate::lifetime::Cancelled;
use crate::store::StoreError;

/// Message shown when a call needs a bearer token and none is stored.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Access token not found.";

/// Errors produced by API calls and view actions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No access token in the credential store. Raised before any request.
    #[error("Access token not found.")]
    MissingCredential,

    /// Non-2xx response or transport failure. `status` is `None` when the
    /// request never produced a response.
    #[error("{message}")]
    RequestFailed { status: Option<u16>, message: String },

    /// Client-side input check failed; no request was sent.
    #[error("{0}")]
    ValidationFailed(String),

    /// A 2xx body did not match the expected record. Carries the call's
    /// fixed message.
    #[error("{0}")]
    Decode(String),

    /// The credential store could not be written.
    #[error("{0}")]
    Store(String),

    /// The owning view went away before the call completed.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// HTTP status of a failed request, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<Cancelled> for ApiError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
