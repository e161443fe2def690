//! Categories page: list, add form, per-row delete.

use leptos::prelude::*;
use portal::views::{ActionKey, CategoriesState};
use portal::{Category, Lifetime, Route};

use super::LogoutButton;
use crate::net::portal_client;

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let state = RwSignal::new(CategoriesState::new());
    let lifetime = StoredValue::new(Lifetime::new());
    on_cleanup(move || {
        if let Some(lifetime) = lifetime.try_get_value() {
            lifetime.cancel();
        }
    });
    load(state, lifetime.get_value());

    let load_error = move || state.with(|s| s.collection.load_error().map(str::to_owned));
    let add_error = move || state.with(|s| s.collection.errors().get(ActionKey::Add).map(str::to_owned));

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        add(state, lifetime.get_value());
    };

    view! {
        <div class="categories-page">
            <header class="page-header">
                <h1>"Categories"</h1>
                <a href=Route::Dashboard.path()>"Back to applications"</a>
                <LogoutButton/>
            </header>
            <form class="category-form" on:submit=on_add>
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=move || state.with(|s| s.draft.name.clone())
                    on:input=move |ev| state.update(|s| s.draft.name = event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Description"
                    prop:value=move || state.with(|s| s.draft.description.clone())
                    on:input=move |ev| state.update(|s| s.draft.description = event_target_value(&ev))
                />
                <button class="btn" type="submit">"Add category"</button>
            </form>
            <Show when=move || add_error().is_some()>
                <p class="page-error">{move || add_error().unwrap_or_default()}</p>
            </Show>
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
                        fallback=|| view! { <p>"No categories available."</p> }
                    >
                        <ul class="category-list">
                            <For
                                each=move || state.with(|s| s.items().to_vec())
                                key=|c: &Category| c.id
                                children=move |category| view! { <CategoryRow category=category state=state lifetime=lifetime/> }
                            />
                        </ul>
                    </Show>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn CategoryRow(category: Category, state: RwSignal<CategoriesState>, lifetime: StoredValue<Lifetime>) -> impl IntoView {
    let id = category.id;
    let row_error = move || state.with(|s| s.collection.errors().for_item(id).map(str::to_owned));

    view! {
        <li class="category-row">
            <strong>{category.name}</strong>
            <span class="category-row__description">{category.description}</span>
            <button class="btn" on:click=move |_| delete(state, lifetime.get_value(), id)>"Delete"</button>
            <Show when=move || row_error().is_some()>
                <p class="category-row__error">{move || row_error().unwrap_or_default()}</p>
            </Show>
        </li>
    }
}

fn load(state: RwSignal<CategoriesState>, lifetime: Lifetime) {
    leptos::task::spawn_local(async move {
        let client = portal_client();
        if let Ok(result) = lifetime.bind(client.list_categories()).await {
            state.update(|s| s.collection.finish_load(result));
        }
    });
}

fn add(state: RwSignal<CategoriesState>, lifetime: Lifetime) {
    let client = portal_client();
    if let Err(e) = client.require_token() {
        state.update(|s| s.collection.record_error(ActionKey::Add, &e));
        return;
    }
    let draft = state.with_untracked(|s| s.draft.clone());
    leptos::task::spawn_local(async move {
        if let Ok(result) = lifetime.bind(client.add_category(&draft)).await {
            state.update(|s| s.apply_added(result));
        }
    });
}

fn delete(state: RwSignal<CategoriesState>, lifetime: Lifetime, id: u64) {
    let client = portal_client();
    if let Err(e) = client.require_token() {
        state.update(|s| s.collection.record_error(ActionKey::Delete(id), &e));
        return;
    }
    leptos::task::spawn_local(async move {
        if let Ok(result) = lifetime.bind(client.delete_category(id)).await {
            state.update(|s| s.apply_deleted(id, result));
        }
    });
}
