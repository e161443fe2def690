//! Browser glue for the portal client: `localStorage` credentials and a
//! `gloo-net` transport.
//!
//! Configuration is fixed at build time. `PORTAL_BASE_URL` and
//! `PORTAL_ERROR_MESSAGES` are read with `option_env!` when the WASM bundle is
//! compiled; anything unset falls back to the portal defaults.

pub mod storage;
pub mod transport;


use std::sync::Arc;

use portal::config::parse_message_source;
use portal::{ApiClient, MessageSource, PortalConfig};

use self::storage::LocalStorage;
use self::transport::BrowserTransport;

pub type PortalClient = ApiClient<BrowserTransport>;

/// Build config from optional build-time values. An unknown message source
/// keeps the default.
pub fn config_from(base_url: Option<&str>, messages: Option<&str>) -> PortalConfig {
    let mut config = PortalConfig::default();
    if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
        config = config.with_base_url(base_url);
    }
    let messages = parse_message_source(messages).unwrap_or_else(|e| {
        #[cfg(feature = "csr")]
        log::warn!("{e}; using fixed messages");
        #[cfg(not(feature = "csr"))]
        let _ = e;
        MessageSource::default()
    });
    config.with_messages(messages)
}

pub fn config() -> PortalConfig {
    config_from(option_env!("PORTAL_BASE_URL"), option_env!("PORTAL_ERROR_MESSAGES"))
}

/// A client over the browser transport and `localStorage`. Cheap to build;
/// pages create one per task instead of holding it in reactive closures.
pub fn portal_client() -> PortalClient {
    ApiClient::new(&config(), BrowserTransport, Arc::new(LocalStorage))
}
