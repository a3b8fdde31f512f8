use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use cinelog_core::CredentialStore;
use cinelog_domain::{CinelogError, CookieOptions, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::StoredCookie;
use crate::errors::InfraError;

/// Cookie jar persisted as JSON.
///
/// Every mutation rewrites the file through a temporary sibling and a rename,
/// so a crash never leaves a half-written jar behind. Expired entries are
/// skipped on read and dropped on the next write.
pub struct FileCookieJar {
    path: PathBuf,
    cookies: Mutex<HashMap<String, StoredCookie>>,
}

impl FileCookieJar {
    /// Open the jar at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cookies = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                CinelogError::Storage(format!("Cookie jar {} is corrupt: {e}", path.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(storage_error(&path, err)),
        };

        debug!(path = %path.display(), entries = cookies.len(), "opened cookie jar");
        Ok(Self { path, cookies: Mutex::new(cookies) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, cookies: &mut HashMap<String, StoredCookie>) -> Result<()> {
        let now = Utc::now();
        cookies.retain(|_, cookie| cookie.is_live(now));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&*cookies).map_err(InfraError::from)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "failed to replace cookie jar");
            storage_error(&self.path, e)
        })
    }
}

impl CredentialStore for FileCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let now = Utc::now();
        self.cookies.lock().get(name).filter(|c| c.is_live(now)).map(|c| c.value.clone())
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> Result<()> {
        let mut cookies = self.cookies.lock();
        cookies.insert(name.to_string(), StoredCookie::new(value, options, Utc::now()));
        self.persist(&mut cookies)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let mut cookies = self.cookies.lock();
        if cookies.remove(name).is_none() {
            return Ok(());
        }
        self.persist(&mut cookies)
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> CinelogError {
    CinelogError::Storage(format!("{}: {err}", path.display()))
}
