//! Plain-text rendering of the portal views for the terminal.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use portal::Application;
use portal::Route;
use portal::views::{ActionKey, ActionErrors, ApplicationsState, CategoriesState};

/// The login screen has no data; point at the command that drives it.
#[must_use]
pub fn login_prompt() -> String {
    "Login\n  portal-cli login --email <EMAIL> --password <PASSWORD>\n".to_owned()
}

#[must_use]
pub fn not_found(path: &str) -> String {
    format!("Page not found: {path}\n  Go to {}\n", Route::Login.path())
}

#[must_use]
pub fn applications(state: &ApplicationsState) -> String {
    let mut out = String::from("Applications\n");
    if state.collection.is_loading() {
        out.push_str("  Loading...\n");
        return out;
    }
    if let Some(message) = state.collection.load_error() {
        let _ = writeln!(out, "  Error: {message}");
        return out;
    }
    push_general_errors(&mut out, state.collection.errors());
    if state.items().is_empty() {
        out.push_str("  No applications available.\n");
    }
    for application in state.items() {
        push_application(&mut out, state, application);
    }
    let _ = writeln!(out, "\nSee also: {}", Route::Categories.path());
    out
}

fn push_application(out: &mut String, state: &ApplicationsState, application: &Application) {
    let farm = &application.farm;
    let _ = writeln!(out, "\n  #{} {}", application.id, farm.name);
    let _ = writeln!(out, "    Farmer:     {}", farm.farmer.full_name());
    let _ = writeln!(out, "    Status:     {}", application.status);
    let _ = writeln!(out, "    Address:    {}", farm.address);
    let _ = writeln!(out, "    Crop Types: {}", farm.crop_types_label());
    let _ = writeln!(out, "    Size:       {}", farm.size_label());
    let _ = writeln!(out, "    Verified:   {}", farm.verified_label());
    if application.is_pending() {
        let _ = writeln!(
            out,
            "    Actions:    applications approve {id} | applications reject {id} --reason <REASON>",
            id = application.id
        );
    }
    if let Some(message) = state.collection.errors().for_item(application.id) {
        let _ = writeln!(out, "    Error:      {message}");
    }
}

#[must_use]
pub fn categories(state: &CategoriesState) -> String {
    let mut out = String::from("Categories\n");
    if state.collection.is_loading() {
        out.push_str("  Loading...\n");
        return out;
    }
    if let Some(message) = state.collection.load_error() {
        let _ = writeln!(out, "  Error: {message}");
        return out;
    }
    push_general_errors(&mut out, state.collection.errors());
    if state.items().is_empty() {
        out.push_str("  No categories available.\n");
    }
    for category in state.items() {
        let _ = write!(out, "  [{}] {}", category.id, category.name);
        if !category.description.is_empty() {
            let _ = write!(out, ": {}", category.description);
        }
        out.push('\n');
        if let Some(message) = state.collection.errors().for_item(category.id) {
            let _ = writeln!(out, "      Error: {message}");
        }
    }
    let _ = writeln!(out, "\nSee also: {}", Route::Dashboard.path());
    out
}

/// Add-form errors, which belong to no listed item.
fn push_general_errors(out: &mut String, errors: &ActionErrors) {
    for (key, message) in errors.iter() {
        if matches!(key, ActionKey::Add) {
            let _ = writeln!(out, "  Error: {message}");
        }
    }
}
