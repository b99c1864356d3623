//! Client-side routes: which view a URL path shows, and the document title.
//!
//! # Design
//! The table is static. Resolution strips the query string and fragment,
//! tolerates a trailing slash, and compares static segments without regard
//! to case. `:name` segments capture a parameter. Anything unmatched lands
//! on the catch-all not-found route.

use std::collections::BTreeMap;

/// Title used when a route does not set its own.
pub const APP_TITLE: &str = "Tic-To-Tac-To-Toe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    About,
    Forgot,
    Game,
    Home,
    Login,
    Logout,
    Register,
    PageNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub view: View,
    pub title: Option<&'static str>,
}

/// `/` has no view of its own.
const REDIRECTS: &[(&str, &str)] = &[("/", "login")];

pub const ROUTES: &[Route] = &[
    Route {
        name: "about",
        path: "/about",
        view: View::About,
        title: Some("Tic-To-Tac-To-Toe - About"),
    },
    Route {
        name: "forgot",
        path: "/forgot",
        view: View::Forgot,
        title: Some("Tic-To-Tac-To-Toe - Forgot"),
    },
    Route {
        name: "game",
        path: "/games/:gameId",
        view: View::Game,
        title: Some("Tic-To-Tac-To-Toe - Game"),
    },
    Route {
        name: "home",
        path: "/home",
        view: View::Home,
        title: Some("Tic-To-Tac-To-Toe - Home"),
    },
    Route {
        name: "login",
        path: "/login",
        view: View::Login,
        title: Some("Tic-To-Tac-To-Toe - Login"),
    },
    Route {
        name: "logout",
        path: "/logout",
        view: View::Logout,
        title: Some("Tic-To-Tac-To-Toe - Logout"),
    },
    Route {
        name: "register",
        path: "/register",
        view: View::Register,
        title: Some("Tic-To-Tac-To-Toe - Register"),
    },
];

pub const NOT_FOUND: Route = Route {
    name: "pageNotFound",
    path: "/:catchAll(.*)",
    view: View::PageNotFound,
    title: Some("Tic-To-Tac-To-Toe - Page Not Found"),
};

/// Where a path led.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub params: BTreeMap<String, String>,
    /// The path that redirected here, if any.
    pub redirected_from: Option<String>,
}

impl Navigation {
    pub fn view(&self) -> View {
        self.route.view
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

pub fn resolve(path: &str) -> Navigation {
    let path = normalize_path(path);
    if let Some((_, target)) = REDIRECTS.iter().find(|(from, _)| *from == path) {
        if let Some(route) = by_name(target) {
            return Navigation {
                route: *route,
                params: BTreeMap::new(),
                redirected_from: Some(path),
            };
        }
    }
    for route in ROUTES {
        if let Some(params) = match_path(route.path, &path) {
            return Navigation {
                route: *route,
                params,
                redirected_from: None,
            };
        }
    }
    let mut params = BTreeMap::new();
    params.insert("pathMatch".to_string(), path);
    Navigation {
        route: NOT_FOUND,
        params,
        redirected_from: None,
    }
}

pub fn by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}

/// Title to put on the document after navigating.
pub fn document_title(navigation: &Navigation) -> &'static str {
    navigation.route.title.unwrap_or(APP_TITLE)
}

fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path[..end].trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn match_path(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern: Vec<&str> = pattern.split('/').skip(1).collect();
    let segments: Vec<&str> = path.split('/').skip(1).collect();
    if pattern.len() != segments.len() {
        return None;
    }
    let mut params = BTreeMap::new();
    for (expected, actual) in pattern.iter().zip(&segments) {
        if let Some(name) = expected.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            params.insert(name.to_string(), actual.to_string());
        } else if !expected.eq_ignore_ascii_case(actual) {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_route_captures_id() {
        let nav = resolve("/games/42");
        assert_eq!(nav.view(), View::Game);
        assert_eq!(nav.param("gameId"), Some("42"));
        assert_eq!(document_title(&nav), "Tic-To-Tac-To-Toe - Game");
    }

    #[test]
    fn root_redirects_to_login() {
        let nav = resolve("/");
        assert_eq!(nav.view(), View::Login);
        assert_eq!(nav.route.name, "login");
        assert_eq!(nav.redirected_from.as_deref(), Some("/"));
        assert_eq!(document_title(&nav), "Tic-To-Tac-To-Toe - Login");

        assert_eq!(resolve("").view(), View::Login);
    }

    #[test]
    fn static_routes() {
        let cases = [
            ("/about", View::About, "Tic-To-Tac-To-Toe - About"),
            ("/forgot", View::Forgot, "Tic-To-Tac-To-Toe - Forgot"),
            ("/home", View::Home, "Tic-To-Tac-To-Toe - Home"),
            ("/login", View::Login, "Tic-To-Tac-To-Toe - Login"),
            ("/logout", View::Logout, "Tic-To-Tac-To-Toe - Logout"),
            ("/register", View::Register, "Tic-To-Tac-To-Toe - Register"),
        ];
        for (path, view, title) in cases {
            let nav = resolve(path);
            assert_eq!(nav.view(), view, "{path}");
            assert_eq!(document_title(&nav), title, "{path}");
            assert!(nav.params.is_empty());
        }
    }

    #[test]
    fn trailing_slash_query_and_case_are_ignored() {
        assert_eq!(resolve("/home/").view(), View::Home);
        assert_eq!(resolve("/Home?tab=games#top").view(), View::Home);
        assert_eq!(resolve("/games/abc/?x=1").param("gameId"), Some("abc"));
    }

    #[test]
    fn unmapped_paths_are_not_found() {
        for path in ["/nope", "/games", "/games/1/moves", "/about/us"] {
            let nav = resolve(path);
            assert_eq!(nav.view(), View::PageNotFound, "{path}");
            assert_eq!(nav.param("pathMatch"), Some(path));
            assert_eq!(document_title(&nav), "Tic-To-Tac-To-Toe - Page Not Found");
        }
    }

    #[test]
    fn untitled_route_falls_back_to_app_title() {
        let nav = Navigation {
            route: Route {
                title: None,
                ..*by_name("home").unwrap()
            },
            params: BTreeMap::new(),
            redirected_from: None,
        };
        assert_eq!(document_title(&nav), APP_TITLE);
    }

    #[test]
    fn routes_are_found_by_name() {
        assert_eq!(by_name("game").unwrap().path, "/games/:gameId");
        assert!(by_name("pageNotFound").is_none());
    }
}
