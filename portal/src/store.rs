//! Credential store contract and the in-memory implementation.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is the only state shared between the login flow and the
//! resource views. The login flow writes both tokens once; every authenticated
//! call reads the access token; `invalidate` clears both on logout or 401.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::TokenPair;

/// Storage key holding the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Error raised when a backing store cannot persist a write.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("credential store write failed: {0}")]
pub struct StoreError(pub String);

/// Synchronous key/value storage for session tokens.
///
/// No expiry, no encryption, no namespacing. Implementations decide where the
/// values live (process memory, a file, browser `localStorage`).
pub trait CredentialStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the backing medium rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backing medium rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// The stored access token, treating an empty string as absent.
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Persist both tokens from a successful credential exchange.
    ///
    /// # Errors
    ///
    /// Returns the first write failure.
    fn save_tokens(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.set(REFRESH_TOKEN_KEY, &tokens.refresh)
    }

    /// Terminate the session by clearing both tokens.
    ///
    /// # Errors
    ///
    /// Returns the first removal failure.
    fn invalidate(&self) -> Result<(), StoreError> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }
}

/// Process-local store. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an access token, for views that skip login.
    #[must_use]
    pub fn with_access_token(token: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ACCESS_TOKEN_KEY.to_owned(), token.to_owned());
        store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
