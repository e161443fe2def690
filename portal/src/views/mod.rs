//! Resource view state for the applications dashboard and categories screen.
//!
//! ARCHITECTURE
//! ============
//! Each view has a plain state struct (`ApplicationsState`, `CategoriesState`)
//! with synchronous transitions, and a controller (`ApplicationsView`,
//! `CategoriesView`) that runs the network calls through a [`Lifetime`] and
//! feeds results back into the state. Browser pages keep the state in a signal
//! and drive the same transitions from detached tasks; the CLI and tests use
//! the controllers directly.
//!
//! Mutations patch the local collection from the server's response body
//! instead of refetching. Errors are recorded per action so one item's failure
//! does not mask another's.

pub mod applications;
pub mod categories;


pub use applications::{ApplicationsState, ApplicationsView};
pub use categories::{CategoriesState, CategoriesView};

use crate::error::ApiError;
use crate::types::{Application, Category};

/// The user action an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Load,
    Approve(u64),
    Reject(u64),
    Add,
    Delete(u64),
}

impl ActionKey {
    /// The collection item this action targets, if any.
    #[must_use]
    pub fn item_id(self) -> Option<u64> {
        match self {
            Self::Approve(id) | Self::Reject(id) | Self::Delete(id) => Some(id),
            Self::Load | Self::Add => None,
        }
    }
}

/// Errors keyed by action, ordered oldest to newest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionErrors {
    entries: Vec<(ActionKey, String)>,
}

impl ActionErrors {
    /// Record `message` for `key`, replacing any earlier error for it.
    pub fn record(&mut self, key: ActionKey, message: impl Into<String>) {
        self.clear(key);
        self.entries.push((key, message.into()));
    }

    pub fn clear(&mut self, key: ActionKey) {
        self.entries.retain(|(k, _)| *k != key);
    }

    #[must_use]
    pub fn get(&self, key: ActionKey) -> Option<&str> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, m)| m.as_str())
    }

    /// Most recent error across all actions.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(|(_, m)| m.as_str())
    }

    /// Most recent error from an action on item `id`.
    #[must_use]
    pub fn for_item(&self, id: u64) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.item_id() == Some(id))
            .map(|(_, m)| m.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKey, &str)> {
        self.entries.iter().map(|(k, m)| (*k, m.as_str()))
    }
}

/// A server record with a stable integer id.
pub trait Record {
    fn id(&self) -> u64;
}

impl Record for Application {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for Category {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Working set of a resource view: items, loading flag, and keyed errors.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
    loading: bool,
    errors: ActionErrors,
}

impl<T> Default for Collection<T> {
    /// Views start in the loading state, as on mount.
    fn default() -> Self {
        Self { items: Vec::new(), loading: true, errors: ActionErrors::default() }
    }
}

impl<T: Record> Collection<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn errors(&self) -> &ActionErrors {
        &self.errors
    }

    /// Error that replaces the view body when the initial fetch failed.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.errors.get(ActionKey::Load)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.errors.clear(ActionKey::Load);
    }

    /// Store the fetched set, or record the failure and stay empty.
    pub fn finish_load(&mut self, result: Result<Vec<T>, ApiError>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.errors.clear(ActionKey::Load);
            }
            Err(e) => {
                self.items.clear();
                self.errors.record(ActionKey::Load, e.to_string());
            }
        }
    }

    /// Replace the item with the same id as `item`. Returns false if absent.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove every item with `id`, leaving the rest in order.
    pub fn remove(&mut self, id: u64) {
        self.items.retain(|item| item.id() != id);
    }

    pub fn record_error(&mut self, key: ActionKey, error: &ApiError) {
        self.errors.record(key, error.to_string());
    }

    pub fn clear_error(&mut self, key: ActionKey) {
        self.errors.clear(key);
    }
}
