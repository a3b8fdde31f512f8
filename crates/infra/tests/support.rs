//! Shared helpers for infra integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cinelog_core::{CredentialStore, SessionEvent, SessionListener};
use cinelog_domain::{ApiConfig, CookieOptions, Result};
use cinelog_infra::{AuthClient, MemoryCookieJar};
use wiremock::MockServer;

/// Credential store that counts writes and removals.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryCookieJar,
    pub sets: AtomicUsize,
    pub removes: AtomicUsize,
}

impl CountingStore {
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        let store = Self::default();
        store.inner.set("accessToken", access, &CookieOptions::default()).expect("seed access");
        store.inner.set("refreshToken", refresh, &CookieOptions::default()).expect("seed refresh");
        store
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn get(&self, name: &str) -> Option<String> {
        self.inner.get(name)
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(name, value, options)
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(name)
    }
}

/// Listener that keeps every event it sees.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().expect("listener mutex poisoned").clone()
    }
}

impl SessionListener for RecordingListener {
    fn on_session_event(&self, event: &SessionEvent) {
        self.events.lock().expect("listener mutex poisoned").push(event.clone());
    }
}

/// Client pointed at `server` with fast failure settings.
pub fn client_for(
    server: &MockServer,
    store: Arc<dyn CredentialStore>,
    listener: Arc<dyn SessionListener>,
) -> AuthClient {
    let mut config = ApiConfig::new(server.uri());
    config.max_attempts = 1;
    config.refresh_timeout_secs = 2;
    AuthClient::builder()
        .config(config)
        .store(store)
        .listener(listener)
        .build()
        .expect("client should build")
}
