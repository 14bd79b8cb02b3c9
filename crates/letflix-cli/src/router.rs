//! Static path-to-view routing.
//!
//! `login` and `register` map to their forms. The empty path and every
//! unknown path redirect to `/login`. There are no guards or parameters.

use std::fmt;

/// A view the router can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Login form.
    Login,
    /// Registration form.
    Registration,
}

impl View {
    /// Canonical path of the view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Registration => "/register",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("Login"),
            Self::Registration => f.write_str("Registration"),
        }
    }
}

/// Route table.
const ROUTES: &[(&str, View)] = &[("login", View::Login), ("register", View::Registration)];

/// Target of every redirect.
const FALLBACK: View = View::Login;

/// Result of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// View to show.
    pub view: View,
    /// The requested path, when it was redirected.
    pub redirected_from: Option<String>,
}

/// Resolves `path` to a view.
///
/// Leading and trailing slashes, a query string and a fragment are ignored
/// when matching.
#[must_use]
pub fn resolve(path: &str) -> Resolution {
    let route = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_matches('/');

    ROUTES
        .iter()
        .find(|(name, _)| *name == route)
        .map_or_else(
            || Resolution {
                view: FALLBACK,
                redirected_from: Some(String::from(path)),
            },
            |&(_, view)| Resolution {
                view,
                redirected_from: None,
            },
        )
}
