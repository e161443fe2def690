//! Root component and route table.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::StaticSegment;
use leptos_router::components::{Route, Router, Routes};
use portal::Route as PortalRoute;

use crate::pages::{
    categories::CategoriesPage, dashboard::DashboardPage, login::LoginPage, not_found::NotFoundPage,
};

/// Router segment for a portal route (its path without the leading `/`).
pub fn segment(route: PortalRoute) -> &'static str {
    route.path().trim_start_matches('/')
}

/// Root application component. Routes carry no guards; each page checks the
/// stored token through its own calls.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Farm Admin Portal"/>

        <Router>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=StaticSegment(segment(PortalRoute::Login)) view=LoginPage/>
                <Route path=StaticSegment(segment(PortalRoute::Dashboard)) view=DashboardPage/>
                <Route path=StaticSegment(segment(PortalRoute::Categories)) view=CategoriesPage/>
            </Routes>
        </Router>
    }
}
