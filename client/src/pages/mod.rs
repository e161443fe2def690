//! Routed pages.

pub mod categories;
pub mod dashboard;
pub mod login;
pub mod not_found;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use portal::Route;

use crate::net::portal_client;

/// Clears both stored tokens and returns to the login page.
#[component]
pub fn LogoutButton() -> impl IntoView {
    let navigate = use_navigate();
    let on_logout = move |_| {
        if let Err(e) = portal_client().logout() {
            #[cfg(feature = "csr")]
            log::warn!("logout: {e}");
            #[cfg(not(feature = "csr"))]
            let _ = e;
        }
        navigate(Route::Login.path(), NavigateOptions::default());
    };

    view! { <button class="btn page-header__logout" on:click=on_logout>"Logout"</button> }
}
