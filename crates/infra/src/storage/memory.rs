use std::collections::HashMap;

use chrono::Utc;
use cinelog_core::CredentialStore;
use cinelog_domain::{CookieOptions, Result};
use parking_lot::RwLock;

use super::StoredCookie;

/// In-process cookie jar
#[derive(Default)]
pub struct MemoryCookieJar {
    cookies: RwLock<HashMap<String, StoredCookie>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options the live entry `name` was stored with
    pub fn options(&self, name: &str) -> Option<CookieOptions> {
        let now = Utc::now();
        self.cookies.read().get(name).filter(|c| c.is_live(now)).map(|c| c.options.clone())
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.cookies.read().values().filter(|c| c.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let now = Utc::now();
        self.cookies.read().get(name).filter(|c| c.is_live(now)).map(|c| c.value.clone())
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> Result<()> {
        self.cookies.write().insert(name.to_string(), StoredCookie::new(value, options, Utc::now()));
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.cookies.write().remove(name);
        Ok(())
    }
}
