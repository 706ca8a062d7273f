//! # View Routing
//!
//! Path → view resolution and screen gating.
//!
//! Unknown paths never fail: they route to the dashboard, the same way the
//! client-side router redirects to `/`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level view reachable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Dashboard,
    Input,
    Solutions,
    Journal,
    Profile,
    Admin,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Input,
        View::Solutions,
        View::Journal,
        View::Profile,
        View::Admin,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            View::Dashboard => "/",
            View::Input => "/input",
            View::Solutions => "/solutions",
            View::Journal => "/journal",
            View::Profile => "/profile",
            View::Admin => "/admin",
        }
    }

    /// Exact match on a known path. A leading `#` and a trailing `/` are
    /// tolerated.
    #[must_use]
    pub fn from_path(path: &str) -> Option<View> {
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = match path.strip_suffix('/') {
            Some("") | None => path,
            Some(trimmed) => trimmed,
        };
        View::ALL.into_iter().find(|view| view.path() == path)
    }

    /// Route a path, falling back to the dashboard for anything unknown.
    #[must_use]
    pub fn route(path: &str) -> View {
        View::from_path(path).unwrap_or(View::Dashboard)
    }

    /// Whether the view needs an admin account.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(self, View::Admin)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What the session should show for a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "view", rename_all = "snake_case")]
pub enum Screen {
    Login,
    Onboarding,
    AccessDenied,
    View(View),
}

impl Screen {
    /// Short label used by the landing endpoint.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::Onboarding => "onboarding",
            Screen::AccessDenied => "access_denied",
            Screen::View(View::Dashboard) => "dashboard",
            Screen::View(View::Input) => "input",
            Screen::View(View::Solutions) => "solutions",
            Screen::View(View::Journal) => "journal",
            Screen::View(View::Profile) => "profile",
            Screen::View(View::Admin) => "admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_route() {
        for view in View::ALL {
            assert_eq!(View::from_path(view.path()), Some(view));
        }
    }

    #[test]
    fn hash_prefix_is_tolerated() {
        assert_eq!(View::route("#/journal"), View::Journal);
        assert_eq!(View::route("#/"), View::Dashboard);
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(View::route("/input/"), View::Input);
    }

    #[test]
    fn unknown_paths_fall_back_to_dashboard() {
        assert_eq!(View::from_path("/settings"), None);
        assert_eq!(View::route("/settings"), View::Dashboard);
        assert_eq!(View::route(""), View::Dashboard);
        assert_eq!(View::route("/solutions/extra"), View::Dashboard);
    }

    #[test]
    fn only_admin_requires_admin() {
        let gated: Vec<_> = View::ALL.into_iter().filter(|v| v.requires_admin()).collect();
        assert_eq!(gated, vec![View::Admin]);
    }

    #[test]
    fn screen_serializes_with_tag() {
        let json = serde_json::to_value(Screen::View(View::Journal)).expect("serialize");
        assert_eq!(json, serde_json::json!({"screen": "view", "view": "journal"}));
        let json = serde_json::to_value(Screen::Login).expect("serialize");
        assert_eq!(json, serde_json::json!({"screen": "login"}));
    }
}
