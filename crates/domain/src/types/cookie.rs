//! Cookie attributes used when persisting credentials

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_attribute_conversions;

/// `SameSite` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl_attribute_conversions!(SameSite {
    Strict => "Strict",
    Lax => "Lax",
    None => "None",
});

/// Options attached to a `set` on the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    /// Lifetime in days; `None` means a session cookie.
    pub expires_days: Option<i64>,
    pub path: String,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieOptions {
    /// Cookie scoped to `/` that expires after `days`.
    #[must_use]
    pub fn expiring_in_days(days: i64) -> Self {
        Self { expires_days: Some(days), ..Self::default() }
    }

    /// Hardened variant used at sign-in: secure, `SameSite=Lax`.
    #[must_use]
    pub fn secure_lax(days: i64) -> Self {
        Self { expires_days: Some(days), path: "/".to_string(), secure: true, same_site: SameSite::Lax }
    }

    /// Absolute expiry computed from `now`.
    #[must_use]
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_days.map(|days| now + Duration::days(days))
    }
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self { expires_days: None, path: "/".to_string(), secure: false, same_site: SameSite::Lax }
    }
}
