//! Sign-in and sign-out
//!
//! Login goes out without a bearer credential and never triggers a refresh.
//! The returned pair is stored with the remember-me or standard lifetimes.

use std::sync::Arc;

use cinelog_core::{
    clear_credentials, load_credentials, store_tokens, SessionEvent, TokenLifetimes,
};
use cinelog_domain::constants::{LOGIN_ENDPOINT, REMEMBERED_EMAIL_KEY};
use cinelog_domain::{CookieOptions, LoginRequest, LoginResponse, UserSummary};
use reqwest::Method;
use tracing::{info, instrument, warn};

use super::body::{RequestBody, RequestOptions};
use super::client::{decode_json, AuthClient};
use super::errors::ApiError;

/// User-facing label for a failed login.
pub fn login_failure_label(err: &ApiError) -> &'static str {
    if matches!(err, ApiError::Network(_) | ApiError::Timeout(_)) {
        return "Some error occurred";
    }
    match err.status() {
        Some(400) => "Bad Request",
        Some(401) => "Invalid Credentials",
        Some(404) => "Email Not Registered",
        _ => "Internal Server Error",
    }
}

/// Authentication flow on top of [`AuthClient`]
pub struct AuthService {
    client: Arc<AuthClient>,
}

impl AuthService {
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }

    /// Sign in and store the issued credentials.
    ///
    /// With `remember_me` both credentials live 30 days and the email is kept
    /// for the next sign-in form; otherwise access lives 1 day and refresh 7.
    ///
    /// # Errors
    ///
    /// Returns the classified API error; [`login_failure_label`] turns it into
    /// the message shown to the user.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<UserSummary, ApiError> {
        let body = RequestBody::json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let response = self
            .client
            .request(Method::POST, LOGIN_ENDPOINT, body, RequestOptions::public())
            .await
            .inspect_err(|e| warn!(error = %e, "login rejected"))?;
        let login: LoginResponse = decode_json(response).await?;

        let store = self.client.store().as_ref();
        store_tokens(store, &login.tokens, TokenLifetimes::for_sign_in(remember_me))?;

        let user = login.user.unwrap_or_else(|| UserSummary { email: email.to_string() });
        if remember_me {
            store.set(REMEMBERED_EMAIL_KEY, &user.email, &CookieOptions::default())?;
        } else {
            store.remove(REMEMBERED_EMAIL_KEY)?;
        }

        info!(remember_me, "signed in");
        self.client.notify(SessionEvent::SignedIn { email: Some(user.email.clone()) });
        Ok(user)
    }

    /// Clear both credentials. The remembered email survives.
    pub fn logout(&self) -> Result<(), ApiError> {
        clear_credentials(self.client.store().as_ref())?;
        info!("signed out");
        self.client.notify(SessionEvent::SignedOut);
        Ok(())
    }

    /// Whether either credential is present.
    pub fn is_authenticated(&self) -> bool {
        !load_credentials(self.client.store().as_ref()).is_empty()
    }

    /// Email saved by the last remember-me sign-in
    pub fn remembered_email(&self) -> Option<String> {
        self.client.store().get(REMEMBERED_EMAIL_KEY)
    }
}

#[cfg(test)]
mod tests {
    use cinelog_core::{CredentialStore, SessionListener};
    use cinelog_domain::constants::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
    use cinelog_domain::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::session::SessionEvents;
    use crate::storage::MemoryCookieJar;

    fn service_for(server: &MockServer) -> (AuthService, Arc<MemoryCookieJar>, SessionEvents) {
        let jar = Arc::new(MemoryCookieJar::new());
        let events = SessionEvents::new();
        let listener: Arc<dyn SessionListener> = Arc::new(events.clone());
        let client = AuthClient::builder()
            .config(ApiConfig::new(server.uri()))
            .store(jar.clone())
            .listener(listener)
            .build()
            .unwrap();
        (AuthService::new(Arc::new(client)), jar, events)
    }

    fn login_ok() -> ResponseTemplate {
        ResponseTemplate::new(201).set_body_json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "user": { "email": "ana@example.com" }
        }))
    }

    #[tokio::test]
    async fn login_stores_credentials_and_remembers_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "ana@example.com", "password": "pw"})))
            .respond_with(login_ok())
            .expect(1)
            .mount(&server)
            .await;

        let (service, jar, events) = service_for(&server);
        let mut rx = events.subscribe();

        let user = service.login("ana@example.com", "pw", true).await.unwrap();

        assert_eq!(user.email, "ana@example.com");
        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).as_deref(), Some("a1"));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).as_deref(), Some("r1"));
        assert_eq!(service.remembered_email().as_deref(), Some("ana@example.com"));
        assert_eq!(jar.options(ACCESS_TOKEN_COOKIE).and_then(|o| o.expires_days), Some(30));
        assert!(service.is_authenticated());
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::SignedIn { email: Some("ana@example.com".into()) }
        );
    }

    #[tokio::test]
    async fn login_without_remember_me_forgets_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).and(path("/auth/login")).respond_with(login_ok()).mount(&server).await;

        let (service, jar, _events) = service_for(&server);
        jar.set(REMEMBERED_EMAIL_KEY, "old@example.com", &CookieOptions::default()).unwrap();

        service.login("ana@example.com", "pw", false).await.unwrap();

        assert!(service.remembered_email().is_none());
        assert_eq!(jar.options(ACCESS_TOKEN_COOKIE).and_then(|o| o.expires_days), Some(1));
        assert_eq!(jar.options(REFRESH_TOKEN_COOKIE).and_then(|o| o.expires_days), Some(7));
    }

    #[tokio::test]
    async fn rejected_login_maps_to_label_without_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (service, _jar, _events) = service_for(&server);
        let err = service.login("ana@example.com", "wrong", false).await.unwrap_err();

        assert_eq!(login_failure_label(&err), "Invalid Credentials");
        assert!(!service.is_authenticated());
    }

    #[test]
    fn failure_labels_follow_status() {
        let client = |status| ApiError::Client { status, message: String::new() };
        assert_eq!(login_failure_label(&client(400)), "Bad Request");
        assert_eq!(login_failure_label(&client(404)), "Email Not Registered");
        assert_eq!(login_failure_label(&client(422)), "Internal Server Error");
        assert_eq!(
            login_failure_label(&ApiError::Network("refused".into())),
            "Some error occurred"
        );
        assert_eq!(
            login_failure_label(&ApiError::Timeout(std::time::Duration::from_secs(30))),
            "Some error occurred"
        );
    }

    #[tokio::test]
    async fn logout_clears_credentials_but_keeps_email() {
        let server = MockServer::start().await;
        let (service, jar, events) = service_for(&server);
        let mut rx = events.subscribe();
        jar.set(ACCESS_TOKEN_COOKIE, "a", &CookieOptions::default()).unwrap();
        jar.set(REFRESH_TOKEN_COOKIE, "r", &CookieOptions::default()).unwrap();
        jar.set(REMEMBERED_EMAIL_KEY, "ana@example.com", &CookieOptions::default()).unwrap();

        service.logout().unwrap();

        assert!(!service.is_authenticated());
        assert_eq!(service.remembered_email().as_deref(), Some("ana@example.com"));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::SignedOut);
    }
}
