use super::*;

#[test]
fn known_paths_resolve() {
    assert_eq!(Route::from_path("/"), Route::Login);
    assert_eq!(Route::from_path("/dashboard"), Route::Dashboard);
    assert_eq!(Route::from_path("/categories"), Route::Categories);
}

#[test]
fn trailing_slash_query_and_fragment_are_ignored() {
    assert_eq!(Route::from_path("/dashboard/"), Route::Dashboard);
    assert_eq!(Route::from_path("/categories?tab=1"), Route::Categories);
    assert_eq!(Route::from_path("/dashboard#top"), Route::Dashboard);
    assert_eq!(Route::from_path(""), Route::Login);
}

#[test]
fn unknown_paths_are_not_found() {
    assert_eq!(Route::from_path("/admin"), Route::NotFound);
    assert_eq!(Route::from_path("/dashboard/extra"), Route::NotFound);
    assert_eq!(Route::from_path("dashboard"), Route::NotFound);
}

#[test]
fn path_round_trips_for_every_routed_view() {
    for route in Route::ALL {
        assert_eq!(Route::from_path(route.path()), route);
    }
}

#[test]
fn display_is_path() {
    assert_eq!(Route::Categories.to_string(), "/categories");
    assert_eq!(Route::Dashboard.title(), "Applications");
}
