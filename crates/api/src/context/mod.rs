//! Application context - dependency injection container

use std::sync::Arc;

use cinelog_core::{load_credentials, CredentialStore, MovieCatalog, RouteGate, SessionListener};
use cinelog_domain::{Config, Credentials, Result};
use cinelog_infra::{config, ApiMovieCatalog, AuthClient, AuthService, FileCookieJar, SessionEvents};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub store: Arc<FileCookieJar>,
    pub events: SessionEvents,
    pub client: Arc<AuthClient>,
    pub auth: AuthService,
    pub catalog: Arc<dyn MovieCatalog>,
    pub gate: RouteGate,
}

impl AppContext {
    /// Build the context from the loaded configuration.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or the cookie jar
    /// cannot be opened.
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    /// Build the context from an explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the cookie jar cannot be opened or the client
    /// cannot be built.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let store = Arc::new(FileCookieJar::open(&config.session.cookie_jar_path)?);
        let events = SessionEvents::new();

        let credential_store: Arc<dyn CredentialStore> = store.clone();
        let listener: Arc<dyn SessionListener> = Arc::new(events.clone());
        let client = Arc::new(
            AuthClient::builder()
                .config(config.api.clone())
                .store(credential_store)
                .listener(listener)
                .build()?,
        );

        let auth = AuthService::new(client.clone());
        let catalog: Arc<dyn MovieCatalog> = Arc::new(ApiMovieCatalog::new(client.clone()));

        info!(
            api = %config.api.base_url,
            cookie_jar = %config.session.cookie_jar_path,
            "application context ready"
        );

        Ok(Self { config, store, events, client, auth, catalog, gate: RouteGate::new() })
    }

    /// Credentials currently in the cookie jar
    pub fn credentials(&self) -> Credentials {
        load_credentials(self.store.as_ref())
    }
}
