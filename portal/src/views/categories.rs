//! Categories screen: list, add, delete.

#[cfg(test)]
#[path = "categories_test.rs"]
mod categories_test;

use super::{ActionKey, Collection};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::lifetime::{Cancelled, Lifetime};
use crate::transport::Transport;
use crate::types::{Category, NewCategory};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoriesState {
    pub collection: Collection<Category>,
    /// Add-form inputs.
    pub draft: NewCategory,
}

impl CategoriesState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Category] {
        self.collection.items()
    }

    /// Append the server's record and reset the inputs.
    pub fn apply_added(&mut self, result: Result<Category, ApiError>) {
        match result {
            Ok(category) => {
                self.collection.push(category);
                self.draft = NewCategory::default();
                self.collection.clear_error(ActionKey::Add);
            }
            Err(e) => self.collection.record_error(ActionKey::Add, &e),
        }
    }

    pub fn apply_deleted(&mut self, id: u64, result: Result<(), ApiError>) {
        let key = ActionKey::Delete(id);
        match result {
            Ok(()) => {
                self.collection.remove(id);
                self.collection.clear_error(key);
            }
            Err(e) => self.collection.record_error(key, &e),
        }
    }
}

/// Categories controller bound to one view lifetime.
pub struct CategoriesView<T: Transport> {
    client: ApiClient<T>,
    lifetime: Lifetime,
    state: CategoriesState,
}

impl<T: Transport> CategoriesView<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client, lifetime: Lifetime::new(), state: CategoriesState::new() }
    }

    #[must_use]
    pub fn state(&self) -> &CategoriesState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CategoriesState {
        &mut self.state
    }

    #[must_use]
    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    /// # Errors
    ///
    /// Returns [`Cancelled`] if the view was unmounted; state is untouched then.
    pub async fn mount(&mut self) -> Result<(), Cancelled> {
        self.state.collection.begin_load();
        let result = self.lifetime.bind(self.client.list_categories()).await?;
        self.state.collection.finish_load(result);
        Ok(())
    }

    /// Submit the current draft.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the view was unmounted; state is untouched then.
    pub async fn add(&mut self) -> Result<(), Cancelled> {
        if let Err(e) = self.client.require_token() {
            self.state.collection.record_error(ActionKey::Add, &e);
            return Ok(());
        }
        let draft = self.state.draft.clone();
        let result = self.lifetime.bind(self.client.add_category(&draft)).await?;
        self.state.apply_added(result);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Cancelled`] if the view was unmounted; state is untouched then.
    pub async fn delete(&mut self, id: u64) -> Result<(), Cancelled> {
        if let Err(e) = self.client.require_token() {
            self.state.collection.record_error(ActionKey::Delete(id), &e);
            return Ok(());
        }
        let result = self.lifetime.bind(self.client.delete_category(id)).await?;
        self.state.apply_deleted(id, result);
        Ok(())
    }

    pub fn unmount(self) -> CategoriesState {
        self.lifetime.cancel();
        self.state.clone()
    }
}

impl<T: Transport> Drop for CategoriesView<T> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
