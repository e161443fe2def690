//! Cancellation scope tying in-flight calls to the view that started them.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser pages spawn detached tasks for their network calls. A page owns one
//! [`Lifetime`] and cancels it on cleanup; every call is awaited through
//! [`Lifetime::bind`], so a completion that lands after unmount is dropped
//! instead of writing into disposed view state.

#[cfg(test)]
#[path = "lifetime_test.rs"]
mod lifetime_test;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{AbortHandle, Abortable};

/// The owning scope was cancelled before or while the call ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cancelled")]
pub struct Cancelled;

#[derive(Debug, Default)]
struct Inner {
    cancelled: bool,
    next_id: u64,
    pending: HashMap<u64, AbortHandle>,
}

/// Shared cancellation scope. Clones observe and control the same scope.
#[derive(Clone, Debug, Default)]
pub struct Lifetime {
    inner: Arc<Mutex<Inner>>,
}

impl Lifetime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Number of bound calls still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Cancel the scope and abort every bound call. Idempotent.
    pub fn cancel(&self) {
        let handles: Vec<AbortHandle> = {
            let mut inner = self.lock();
            if inner.cancelled {
                return;
            }
            inner.cancelled = true;
            inner.pending.drain().map(|(_, handle)| handle).collect()
        };
        if !handles.is_empty() {
            tracing::debug!(aborted = handles.len(), "lifetime cancelled with calls in flight");
        }
        for handle in handles {
            handle.abort();
        }
    }

    /// Await `future` inside this scope.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the scope was already cancelled, is cancelled
    /// while the future runs, or is cancelled by the time it resolves.
    pub async fn bind<F: Future>(&self, future: F) -> Result<F::Output, Cancelled> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut inner = self.lock();
            if inner.cancelled {
                return Err(Cancelled);
            }
            let id = inner.next_id;
            inner.next_id += 1;
            inner.pending.insert(id, handle);
            id
        };

        let outcome = Abortable::new(future, registration).await;

        let mut inner = self.lock();
        inner.pending.remove(&id);
        match outcome {
            Ok(output) if !inner.cancelled => Ok(output),
            _ => Err(Cancelled),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
