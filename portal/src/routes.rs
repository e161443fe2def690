//! Route table shared by the browser router and the CLI `open` command.
//!
//! There are no guards: visiting `/dashboard` without a session is allowed and
//! fails when the view issues its first call.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Categories,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Login, Route::Dashboard, Route::Categories];

    /// Resolve a URL path. Query strings, fragments, and one trailing slash
    /// are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let path = if path.len() > 1 { path.strip_suffix('/').unwrap_or(path) } else { path };
        match path {
            "" | "/" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/categories" => Self::Categories,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::Categories => "/categories",
            Self::NotFound => "/404",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Applications",
            Self::Categories => "Categories",
            Self::NotFound => "Page not found.",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
