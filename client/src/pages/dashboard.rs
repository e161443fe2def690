//! Applications dashboard: farm cards with approve / reject for pending ones.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting fetches the list once. Approve and reject send a status update
//! and patch the one card from the server's response. Every call is bound to
//! the page's `Lifetime`, which `on_cleanup` cancels, so a response arriving
//! after navigation is dropped instead of written into a disposed signal.

use leptos::prelude::*;
use portal::views::{ActionKey, ApplicationsState};
use portal::{Application, Lifetime, Route, StatusUpdate};

use super::LogoutButton;
use crate::net::portal_client;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = RwSignal::new(ApplicationsState::new());
    let lifetime = StoredValue::new(Lifetime::new());
    on_cleanup(move || {
        if let Some(lifetime) = lifetime.try_get_value() {
            lifetime.cancel();
        }
    });
    load(state, lifetime.get_value());

    let load_error = move || state.with(|s| s.collection.load_error().map(str::to_owned));

    view! {
        <div class="dashboard-page">
            <header class="page-header">
                <h1>"Farm Applications"</h1>
                <a href=Route::Categories.path()>"Manage categories"</a>
                <LogoutButton/>
            </header>
            <Show
                when=move || !state.with(|s| s.collection.is_loading())
                fallback=|| view! { <p>"Loading..."</p> }
            >
                <Show
                    when=move || load_error().is_none()
                    fallback=move || view! { <p class="page-error">{move || load_error().unwrap_or_default()}</p> }
                >
                    <Show
                        when=move || !state.with(|s| s.items().is_empty())
                        fallback=|| view! { <p>"No applications available."</p> }
                    >
                        <div class="application-list">
                            <For
                                each=move || state.with(|s| s.items().to_vec())
                                key=|a: &Application| (a.id, a.status.to_string(), a.farm.is_verified)
                                children=move |application| view! { <ApplicationCard application=application state=state lifetime=lifetime/> }
                            />
                        </div>
                    </Show>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ApplicationCard(
    application: Application,
    state: RwSignal<ApplicationsState>,
    lifetime: StoredValue<Lifetime>,
) -> impl IntoView {
    let id = application.id;
    let pending = application.is_pending();
    let status = application.status.to_string();
    let farm = application.farm;
    let item_error = move || state.with(|s| s.collection.errors().for_item(id).map(str::to_owned));

    let actions = pending.then(|| {
        view! {
            <div class="application-card__actions">
                <button class="btn" on:click=move |_| approve(state, lifetime.get_value(), id)>"Approve"</button>
                <button class="btn" on:click=move |_| state.update(|s| s.open_rejection(id))>"Reject"</button>
            </div>
            <Show when=move || state.with(|s| s.rejecting() == Some(id))>
                <div class="application-card__reject">
                    <textarea
                        placeholder="Reason for rejection"
                        prop:value=move || state.with(|s| s.reason(id).to_owned())
                        on:input=move |ev| state.update(|s| s.set_reason(id, event_target_value(&ev)))
                    ></textarea>
                    <button class="btn" on:click=move |_| reject(state, lifetime.get_value(), id)>
                        "Submit rejection"
                    </button>
                </div>
            </Show>
        }
    });

    view! {
        <div class="application-card">
            <h3>{farm.name.clone()}</h3>
            <p>"Farmer: " {farm.farmer.full_name()}</p>
            <p>"Status: " {status}</p>
            <p>"Address: " {farm.address.clone()}</p>
            <p>"Crop types: " {farm.crop_types_label()}</p>
            <p>"Size: " {farm.size_label()}</p>
            <p>"Verified: " {farm.verified_label()}</p>
            {actions}
            <Show when=move || item_error().is_some()>
                <p class="application-card__error">{move || item_error().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}

fn load(state: RwSignal<ApplicationsState>, lifetime: Lifetime) {
    leptos::task::spawn_local(async move {
        let client = portal_client();
        if let Ok(result) = lifetime.bind(client.list_applications()).await {
            state.update(|s| s.collection.finish_load(result));
        }
    });
}

fn approve(state: RwSignal<ApplicationsState>, lifetime: Lifetime, id: u64) {
    let key = ActionKey::Approve(id);
    let client = portal_client();
    if let Err(e) = client.require_token() {
        state.update(|s| s.collection.record_error(key, &e));
        return;
    }
    let update = StatusUpdate::approve();
    leptos::task::spawn_local(async move {
        if let Ok(result) = lifetime.bind(client.update_application(id, &update)).await {
            state.update(|s| s.apply_update(key, result));
        }
    });
}

fn reject(state: RwSignal<ApplicationsState>, lifetime: Lifetime, id: u64) {
    let key = ActionKey::Reject(id);
    let client = portal_client();
    if let Err(e) = client.require_token() {
        state.update(|s| s.collection.record_error(key, &e));
        return;
    }
    let Some(Ok(update)) = state.try_update(|s| s.prepare_rejection(id)) else {
        return;
    };
    leptos::task::spawn_local(async move {
        if let Ok(result) = lifetime.bind(client.update_application(id, &update)).await {
            state.update(|s| s.apply_update(key, result));
        }
    });
}
