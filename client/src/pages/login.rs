//! Admin login page: email + password, admin-only gate.
//!
//! The form state lives in a `portal::LoginForm` signal. Submitting flips it to
//! `Submitting` synchronously, so a second click before the exchange returns
//! is refused by the form itself. The exchange runs in a detached task bound
//! to the page lifetime; if the page is gone when it resolves, nothing is
//! applied.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use portal::auth::authenticate;
use portal::{Lifetime, LoginForm};

use crate::net::portal_client;

#[component]
pub fn LoginPage() -> impl IntoView {
    let form = RwSignal::new(LoginForm::new("", ""));
    let lifetime = StoredValue::new(Lifetime::new());
    on_cleanup(move || {
        if let Some(lifetime) = lifetime.try_get_value() {
            lifetime.cancel();
        }
    });
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(Ok(credentials)) = form.try_update(LoginForm::begin_submit) else {
            return;
        };
        let navigate = navigate.clone();
        let lifetime = lifetime.get_value();
        leptos::task::spawn_local(async move {
            let client = portal_client();
            let Ok(outcome) = lifetime.bind(authenticate(&client, &credentials)).await else {
                return;
            };
            if let Some(Some(route)) = form.try_update(|f| f.finish(outcome)) {
                navigate(route.path(), NavigateOptions::default());
            }
        });
    };

    view! {
        <div class="login-page">
            <form class="login-card" on:submit=on_submit>
                <h1>"Admin Login"</h1>
                <input
                    class="login-input"
                    type="email"
                    placeholder="Email"
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                />
                <input
                    class="login-input"
                    type="password"
                    placeholder="Password"
                    prop:value=move || form.with(|f| f.password.clone())
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                />
                <button class="login-button" type="submit" disabled=move || form.with(LoginForm::is_submitting)>
                    {move || form.with(LoginForm::button_label)}
                </button>
                <Show when=move || form.with(|f| f.message().is_some())>
                    <p class="login-message">{move || form.with(|f| f.message().unwrap_or_default().to_owned())}</p>
                </Show>
            </form>
        </div>
    }
}
