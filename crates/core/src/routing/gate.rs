//! Route gate
//!
//! Runs on every navigation, before any page logic. Public paths are always
//! reachable; protected paths require at least one credential. A session
//! holding only a refresh credential is let through so the request client
//! can refresh on its first call.

use cinelog_domain::constants::{HOME_PATH, SIGN_IN_PATH};
use cinelog_domain::Credentials;
use tracing::debug;

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Continue,
    Redirect(String),
}

/// Decides whether a navigation may proceed.
#[derive(Debug, Clone)]
pub struct RouteGate {
    public_paths: Vec<String>,
    public_prefixes: Vec<String>,
    sign_in_path: String,
    home_path: String,
}

impl Default for RouteGate {
    fn default() -> Self {
        Self {
            public_paths: vec![SIGN_IN_PATH.to_string()],
            public_prefixes: vec!["/_next".to_string(), "/static".to_string(), "/api".to_string()],
            sign_in_path: SIGN_IN_PATH.to_string(),
            home_path: HOME_PATH.to_string(),
        }
    }
}

impl RouteGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` skips the credential check.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
            || self.public_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
            || looks_like_asset(path)
    }

    pub fn decide(&self, path: &str, credentials: &Credentials) -> RouteDecision {
        if self.is_public(path) {
            if credentials.has_access() && path == self.sign_in_path {
                debug!(path, redirect = %self.home_path, "already signed in");
                return RouteDecision::Redirect(self.home_path.clone());
            }
            return RouteDecision::Continue;
        }

        if credentials.is_empty() {
            debug!(path, redirect = %self.sign_in_path, "no session for protected path");
            return RouteDecision::Redirect(self.sign_in_path.clone());
        }

        RouteDecision::Continue
    }
}

/// Any path with a dot is treated as a static asset (`/favicon.ico`).
fn looks_like_asset(path: &str) -> bool {
    path.contains('.')
}
