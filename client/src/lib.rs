//! # client
//!
//! Leptos browser front-end for the farm verification admin portal.
//!
//! Pages keep `portal` view state in signals and drive its transitions from
//! `spawn_local` tasks. Network and storage glue lives in [`net`]; both are
//! inert outside the `csr` build so the crate still compiles and tests
//! natively.

pub mod app;
pub mod net;
pub mod pages;

/// WASM entry point: install the panic hook and logger, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
