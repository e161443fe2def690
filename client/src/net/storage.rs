//! `localStorage`-backed credential store.
//!
//! Reads degrade to "absent" when storage is unavailable (private mode,
//! blocked cookies); writes report the failure so the login flow can surface
//! it. Outside the `csr` build there is no storage at all.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use portal::{CredentialStore, StoreError};

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(feature = "csr")]
fn storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StoreError("localStorage unavailable".to_owned()))
}

#[cfg(feature = "csr")]
fn js_error(op: &str, key: &str, err: &wasm_bindgen::JsValue) -> StoreError {
    StoreError(format!("{op} {key}: {err:?}"))
}

impl CredentialStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            storage().ok()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            storage()?.set_item(key, value).map_err(|e| js_error("set", key, &e))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = value;
            Err(StoreError(format!("set {key}: localStorage requires the csr build")))
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            storage()?.remove_item(key).map_err(|e| js_error("remove", key, &e))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Ok(())
        }
    }
}
