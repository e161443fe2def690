//! Applications dashboard: list, approve, reject with a reason.

#[cfg(test)]
#[path = "applications_test.rs"]
mod applications_test;

use std::collections::HashMap;

use super::{ActionKey, Collection};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::lifetime::{Cancelled, Lifetime};
use crate::transport::Transport;
use crate::types::{Application, StatusUpdate};

pub const REJECTION_REASON_REQUIRED: &str = "Rejection reason is required.";

/// Dashboard state: the application list plus per-item rejection drafts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplicationsState {
    pub collection: Collection<Application>,
    reasons: HashMap<u64, String>,
    rejecting: Option<u64>,
}

impl ApplicationsState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Application] {
        self.collection.items()
    }

    /// Application whose reason input is open.
    #[must_use]
    pub fn rejecting(&self) -> Option<u64> {
        self.rejecting
    }

    pub fn open_rejection(&mut self, id: u64) {
        self.rejecting = Some(id);
    }

    pub fn set_reason(&mut self, id: u64, reason: impl Into<String>) {
        self.reasons.insert(id, reason.into());
    }

    #[must_use]
    pub fn reason(&self, id: u64) -> &str {
        self.reasons.get(&id).map_or("", String::as_str)
    }

    /// Validate the draft reason for `id` and build the update to send.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ValidationFailed`] for a blank reason and records it
    /// under the item's reject action.
    pub fn prepare_rejection(&mut self, id: u64) -> Result<StatusUpdate, ApiError> {
        let reason = self.reason(id).trim();
        if reason.is_empty() {
            let err = ApiError::ValidationFailed(REJECTION_REASON_REQUIRED.to_owned());
            self.collection.record_error(ActionKey::Reject(id), &err);
            return Err(err);
        }
        Ok(StatusUpdate::reject(reason))
    }

    /// Apply the result of an approve or reject call.
    ///
    /// On success the server's record replaces the local one, the item's
    /// errors are cleared, and a completed rejection closes its draft.
    pub fn apply_update(&mut self, key: ActionKey, result: Result<Application, ApiError>) {
        let Some(id) = key.item_id() else {
            return;
        };
        match result {
            Ok(updated) => {
                if !self.collection.replace(updated) {
                    tracing::debug!(id, "updated application no longer in view");
                }
                self.collection.clear_error(ActionKey::Approve(id));
                self.collection.clear_error(ActionKey::Reject(id));
                if matches!(key, ActionKey::Reject(_)) {
                    self.reasons.remove(&id);
                    if self.rejecting == Some(id) {
                        self.rejecting = None;
                    }
                }
            }
            Err(e) => self.collection.record_error(key, &e),
        }
    }
}

/// Dashboard controller bound to one view lifetime. Dropping it cancels any
/// call still in flight.
pub struct ApplicationsView<T: Transport> {
    client: ApiClient<T>,
    lifetime: Lifetime,
    state: ApplicationsState,
}

impl<T: Transport> ApplicationsView<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client, lifetime: Lifetime::new(), state: ApplicationsState::new() }
    }

    #[must_use]
    pub fn state(&self) -> &ApplicationsState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ApplicationsState {
        &mut self.state
    }

    #[must_use]
    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    /// Fetch the collection. Without a token this records the missing
    /// credential and sends nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the view was unmounted; state is untouched then.
    pub async fn mount(&mut self) -> Result<(), Cancelled> {
        self.state.collection.begin_load();
        let result = self.lifetime.bind(self.client.list_applications()).await?;
        self.state.collection.finish_load(result);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Cancelled`] if the view was unmounted; state is untouched then.
    pub async fn approve(&mut self, id: u64) -> Result<(), Cancelled> {
        let key = ActionKey::Approve(id);
        if let Err(e) = self.client.require_token() {
            self.state.collection.record_error(key, &e);
            return Ok(());
        }
        let result = self
            .lifetime
            .bind(self.client.update_application(id, &StatusUpdate::approve()))
            .await?;
        self.state.apply_update(key, result);
        Ok(())
    }

    /// Reject with the reason currently drafted for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the view was unmounted; state is untouched then.
    pub async fn reject(&mut self, id: u64) -> Result<(), Cancelled> {
        let key = ActionKey::Reject(id);
        if let Err(e) = self.client.require_token() {
            self.state.collection.record_error(key, &e);
            return Ok(());
        }
        let Ok(update) = self.state.prepare_rejection(id) else {
            return Ok(());
        };
        let result = self.lifetime.bind(self.client.update_application(id, &update)).await?;
        self.state.apply_update(key, result);
        Ok(())
    }

    /// Unmount: cancel outstanding calls and hand back the final state.
    pub fn unmount(self) -> ApplicationsState {
        self.lifetime.cancel();
        self.state.clone()
    }
}

impl<T: Transport> Drop for ApplicationsView<T> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
