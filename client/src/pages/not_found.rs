use leptos::prelude::*;
use portal::Route;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found-page">
            <p>"Page not found."</p>
            <a href=Route::Login.path()>"Back to login"</a>
        </div>
    }
}
