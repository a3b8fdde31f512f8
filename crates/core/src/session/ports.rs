//! Port interfaces for session storage and notification
//!
//! These traits define the boundary between the request client and whatever
//! persists cookies or reacts to session changes (a browser, a CLI, tests).

use cinelog_domain::{CookieOptions, Result};

/// Cookie-like key/value store holding the credential pair.
///
/// Implementations decide how values persist; callers only rely on
/// `get` observing the latest `set`/`remove` and on expired entries
/// reading as absent.
pub trait CredentialStore: Send + Sync {
    /// Current value for `name`, or `None` if absent or expired
    fn get(&self, name: &str) -> Option<String>;

    /// Insert or replace `name`
    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> Result<()>;

    /// Delete `name`; removing a missing entry is not an error
    fn remove(&self, name: &str) -> Result<()>;
}

/// Session transitions observed by the application shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { email: Option<String> },
    SignedOut,
    /// Credentials were cleared after an unrecoverable auth failure; the shell
    /// should navigate to `redirect_to`.
    SignInRequired { redirect_to: String },
}

/// Receives session transitions.
pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: &SessionEvent);
}
