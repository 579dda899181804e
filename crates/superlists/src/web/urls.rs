//! URL table.
//!
//! Every page the application serves has a [`Route`]. The router is built
//! from this table, views redirect through it, and [`resolve`] maps a
//! request path back to the route that handles it.

use std::fmt;

/// Path of the one and only list.
pub const LIST_PATH: &str = "/lists/the-only-list-in-the-world/";

/// A named page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The home page with the new item form.
    Home,
    /// The page listing every saved item.
    List,
}

impl Route {
    /// Every route, in routing order.
    pub const ALL: [Self; 2] = [Self::Home, Self::List];

    /// The URL path served by this route.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::List => LIST_PATH,
        }
    }

    /// Name of the view function that handles this route.
    #[must_use]
    pub fn view_name(self) -> &'static str {
        match self {
            Self::Home => "home_page",
            Self::List => "view_list",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.view_name())
    }
}

/// Find the route that serves `path`.
///
/// Matching is exact; `/lists/the-only-list-in-the-world` without the
/// trailing slash does not resolve.
#[must_use]
pub fn resolve(path: &str) -> Option<Route> {
    Route::ALL.into_iter().find(|route| route.path() == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_url_resolves_to_home_page_view() {
        let found = resolve("/").unwrap();
        assert_eq!(found, Route::Home);
        assert_eq!(found.view_name(), "home_page");
    }

    #[test]
    fn test_list_url_resolves_to_list_view() {
        let found = resolve("/lists/the-only-list-in-the-world/").unwrap();
        assert_eq!(found, Route::List);
        assert_eq!(found.view_name(), "view_list");
    }

    #[test]
    fn test_unknown_urls_do_not_resolve() {
        assert!(resolve("/nope/").is_none());
        assert!(resolve("").is_none());
        assert!(resolve("/lists/the-only-list-in-the-world").is_none());
    }

    #[test]
    fn test_reverse_then_resolve() {
        for route in Route::ALL {
            assert_eq!(resolve(route.path()), Some(route));
        }
    }

    #[test]
    fn test_display_uses_view_name() {
        assert_eq!(Route::List.to_string(), "view_list");
    }
}
