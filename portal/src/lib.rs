//! Session-gated API access for the farm verification admin portal.
//!
//! This crate owns everything the front-ends share: the credential store
//! contract, the REST client, the login state machine, the resource view
//! state for applications and categories, and the route table. It has no
//! HTTP or runtime dependency of its own; the `cli` crate plugs in `reqwest`
//! and the `client` crate plugs in `gloo-net` through [`Transport`].
//!
//! ARCHITECTURE
//! ============
//! `routes` → `auth` (produces tokens) → `views` (consume tokens through
//! `client` → `store`). Views bind every network call to a [`Lifetime`] so
//! late completions after unmount are discarded.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod lifetime;
pub mod routes;
pub mod store;
pub mod transport;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{LoginForm, LoginOutcome, LoginState};
pub use client::{ApiClient, Call};
pub use config::{ConfigError, MessageSource, PortalConfig};
pub use error::ApiError;
pub use lifetime::{Cancelled, Lifetime};
pub use routes::Route;
pub use store::{CredentialStore, MemoryStore, StoreError};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
pub use types::{Application, ApplicationStatus, Category, NewCategory, Profile, StatusUpdate, TokenPair};
