//! Credential stores
//!
//! Both jars implement `CredentialStore` with cookie semantics: every entry
//! carries its `CookieOptions`, and entries past their expiry read as absent.

mod file;
mod memory;

pub use file::FileCookieJar;
pub use memory::MemoryCookieJar;

use chrono::{DateTime, Utc};
use cinelog_domain::CookieOptions;
use serde::{Deserialize, Serialize};

/// One cookie as held by a jar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredCookie {
    pub value: String,
    pub options: CookieOptions,
    /// `None` for session cookies
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    pub fn new(value: &str, options: &CookieOptions, now: DateTime<Utc>) -> Self {
        Self { value: value.to_string(), options: options.clone(), expires_at: options.expires_at(now) }
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}
