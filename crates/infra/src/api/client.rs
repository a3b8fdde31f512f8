//! Authenticated request client
//!
//! Attaches `Authorization: Bearer <access>` to every request. When the API
//! answers 401 to a request that has not been retried yet, the client
//! refreshes the credential pair (or joins the refresh already in flight)
//! and replays the request once with the new access credential. If no
//! refresh credential exists or the refresh fails, both credentials are
//! cleared, listeners are told to send the user to the sign-in page, and
//! every pending request is rejected.

use std::sync::Arc;
use std::time::Duration;

use cinelog_core::{clear_credentials, store_tokens, CredentialStore, SessionEvent, SessionListener, TokenLifetimes};
use cinelog_domain::constants::{ACCESS_TOKEN_COOKIE, REFRESH_ENDPOINT, REFRESH_TOKEN_COOKIE, SIGN_IN_PATH};
use cinelog_domain::{ApiConfig, RefreshRequest, TokenPair};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::body::{RequestBody, RequestOptions};
use super::errors::ApiError;
use super::refresh::{RefreshCoordinator, RefreshTicket};
use crate::http::HttpClient;

/// A request that can be sent more than once.
struct PreparedRequest<'a> {
    method: Method,
    url: Url,
    body: &'a RequestBody,
    options: &'a RequestOptions,
    /// Set once the request has been replayed after a refresh.
    retried: bool,
    /// Credential the request goes out with; `None` reads the store.
    bearer: Option<String>,
}

/// HTTP client with bearer credentials and transparent refresh
pub struct AuthClient {
    http: HttpClient,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
    listener: Arc<dyn SessionListener>,
    coordinator: RefreshCoordinator,
    refresh_timeout: Duration,
}

impl AuthClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> AuthClientBuilder {
        AuthClientBuilder::default()
    }

    /// Credential store shared with the auth flow and the route gate
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Base URL relative request paths are joined onto
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a refresh is currently running
    pub fn is_refreshing(&self) -> bool {
        self.coordinator.is_refreshing()
    }

    pub(crate) fn notify(&self, event: SessionEvent) {
        self.listener.on_session_event(&event);
    }

    /// Execute a GET request
    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.request(Method::GET, path, RequestBody::Empty, RequestOptions::default()).await
    }

    /// Execute a POST request
    pub async fn post(&self, path: &str, body: RequestBody) -> Result<Response, ApiError> {
        self.request(Method::POST, path, body, RequestOptions::default()).await
    }

    /// Execute a PUT request
    pub async fn put(&self, path: &str, body: RequestBody) -> Result<Response, ApiError> {
        self.request(Method::PUT, path, body, RequestOptions::default()).await
    }

    /// Execute a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.request(Method::DELETE, path, RequestBody::Empty, RequestOptions::default()).await
    }

    /// Execute a request against `path` (relative to the base URL, or
    /// absolute).
    ///
    /// # Returns
    ///
    /// The upstream response, unchanged, for any 2xx status
    ///
    /// # Errors
    ///
    /// - `Client`/`Server` for non-2xx statuses other than 401
    /// - `AuthExpired` when a replayed request is rejected again
    /// - `SessionInvalid` when the session could not be recovered
    /// - `Network`/`Timeout` when no response was received
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        let mut prepared = PreparedRequest {
            method,
            url: self.resolve(path)?,
            body: &body,
            options: &options,
            retried: false,
            bearer: None,
        };

        loop {
            let sent_with = if prepared.options.skip_auth {
                None
            } else {
                prepared
                    .bearer
                    .clone()
                    .or_else(|| self.store.get(ACCESS_TOKEN_COOKIE))
                    .filter(|token| !token.is_empty())
            };

            let response = self.dispatch(&prepared, sent_with.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED || prepared.options.skip_auth {
                return check_status(response).await;
            }

            if prepared.retried {
                warn!(url = %prepared.url, "replayed request rejected again");
                return Err(ApiError::AuthExpired(format!(
                    "{} rejected the refreshed credential",
                    prepared.url
                )));
            }

            debug!(url = %prepared.url, "access credential rejected; recovering session");
            prepared.retried = true;
            prepared.bearer = Some(self.recover(sent_with.as_deref()).await?);
        }
    }

    async fn dispatch(
        &self,
        prepared: &PreparedRequest<'_>,
        bearer: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut builder = self.http.request(prepared.method.clone(), prepared.url.clone());

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &prepared.options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !prepared.options.query.is_empty() {
            builder = builder.query(&prepared.options.query);
        }
        builder = prepared.body.apply(builder)?;

        self.http.send(builder).await.map_err(ApiError::from)
    }

    /// Obtain a usable access credential after a 401.
    ///
    /// `stale` is the credential the failed request carried. If the store
    /// already holds a different one, a refresh finished in the meantime and
    /// the request is replayed with it directly. When the refresh being
    /// waited on is abandoned, the request leads or joins the next one.
    async fn recover(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let lease = loop {
            match self.coordinator.acquire_or_join() {
                RefreshTicket::Follower(waiter) => {
                    debug!("waiting for in-flight refresh");
                    match waiter.wait().await {
                        Some(outcome) => return outcome,
                        None => debug!("in-flight refresh abandoned; retrying"),
                    }
                }
                RefreshTicket::Leader(lease) => break lease,
            }
        };

        if let Some(current) = self.store.get(ACCESS_TOKEN_COOKIE).filter(|t| !t.is_empty()) {
            if Some(current.as_str()) != stale {
                debug!("credential already refreshed by an earlier request");
                lease.release(Ok(current.clone()));
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.store.get(REFRESH_TOKEN_COOKIE) else {
            warn!("no refresh credential; sign-in required");
            let err = ApiError::session_invalid("no refresh credential");
            self.invalidate_session();
            lease.release(Err(err.clone()));
            return Err(err);
        };

        match self.refresh_credentials(&refresh_token).await {
            Ok(tokens) => {
                if let Err(e) = store_tokens(self.store.as_ref(), &tokens, TokenLifetimes::STANDARD)
                {
                    error!(error = %e, "failed to persist refreshed credentials");
                }
                let woken = lease.release(Ok(tokens.access_token.clone()));
                info!(replayed = woken + 1, "access credential refreshed");
                Ok(tokens.access_token)
            }
            Err(err) => {
                warn!(error = %err, "credential refresh failed; sign-in required");
                self.invalidate_session();
                let woken = lease.release(Err(err.clone()));
                debug!(rejected = woken + 1, "pending requests rejected");
                Err(err)
            }
        }
    }

    /// Exchange the refresh credential for a new pair.
    ///
    /// Sent directly through the transport, never through [`request`](Self::request),
    /// so a 401 here is a refresh failure and not another refresh.
    async fn refresh_credentials(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let url = self.resolve(REFRESH_ENDPOINT)?;
        let builder = self
            .http
            .request(Method::POST, url)
            .json(&RefreshRequest { old_refresh_token: refresh_token.to_string() });

        let response = match tokio::time::timeout(self.refresh_timeout, self.http.send(builder)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(ApiError::session_invalid(format!("refresh call failed: {err}"))),
            Err(_) => {
                return Err(ApiError::session_invalid(format!(
                    "refresh call timed out after {:?}",
                    self.refresh_timeout
                )))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::SessionInvalid {
                reason: format!("refresh rejected with status {status}"),
                status: Some(status.as_u16()),
            });
        }

        response
            .json::<TokenPair>()
            .await
            .map_err(|e| ApiError::session_invalid(format!("malformed refresh response: {e}")))
    }

    fn invalidate_session(&self) {
        if let Err(e) = clear_credentials(self.store.as_ref()) {
            error!(error = %e, "failed to clear credentials");
        }
        self.notify(SessionEvent::SignInRequired { redirect_to: SIGN_IN_PATH.to_string() });
    }

    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|e| ApiError::Config(format!("Invalid URL '{path}': {e}")));
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::Config(format!("Invalid URL '{joined}': {e}")))
    }
}

/// Decode a successful response body as JSON.
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            ApiError::Decode(format!(
                "No content response ({}), but response type cannot be deserialized from empty body",
                status.as_u16()
            ))
        });
    }

    response.json().await.map_err(|e| ApiError::Decode(format!("Failed to parse response: {e}")))
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        format!("{url} returned status {status}")
    } else {
        format!("{url} returned status {status}: {body}")
    };

    Err(if status == StatusCode::UNAUTHORIZED {
        ApiError::AuthExpired(message)
    } else if status.is_server_error() {
        ApiError::Server { status: status.as_u16(), message }
    } else {
        ApiError::Client { status: status.as_u16(), message }
    })
}

/// Builder for [`AuthClient`]
#[derive(Default)]
pub struct AuthClientBuilder {
    config: Option<ApiConfig>,
    store: Option<Arc<dyn CredentialStore>>,
    listener: Option<Arc<dyn SessionListener>>,
    http: Option<HttpClient>,
}

impl AuthClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credential store
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the listener told about session transitions
    pub fn listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Use a preconfigured transport instead of one built from the config
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns error if the config, store or listener is missing, a timeout is
    /// zero, the base URL is invalid, or the transport cannot be created
    pub fn build(self) -> Result<AuthClient, ApiError> {
        let config = self.config.ok_or_else(|| ApiError::Config("API config not set".into()))?;
        let store =
            self.store.ok_or_else(|| ApiError::Config("Credential store not set".into()))?;
        let listener =
            self.listener.ok_or_else(|| ApiError::Config("Session listener not set".into()))?;

        if config.timeout_secs == 0 || config.refresh_timeout_secs == 0 {
            return Err(ApiError::Config("Timeouts must be at least one second".into()));
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL '{}': {e}", config.base_url)))?;

        let http = match self.http {
            Some(http) => http,
            None => HttpClient::builder()
                .timeout(config.timeout())
                .max_attempts(config.max_attempts)
                .build()
                .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?,
        };

        Ok(AuthClient {
            http,
            base_url,
            store,
            listener,
            coordinator: RefreshCoordinator::new(),
            refresh_timeout: config.refresh_timeout(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use cinelog_domain::CookieOptions;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::storage::MemoryCookieJar;

    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl RecordingListener {
        fn sign_in_required(&self) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| matches!(e, SessionEvent::SignInRequired { .. }))
                .count()
        }
    }

    impl SessionListener for RecordingListener {
        fn on_session_event(&self, event: &SessionEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn jar_with(access: Option<&str>, refresh: Option<&str>) -> Arc<MemoryCookieJar> {
        let jar = Arc::new(MemoryCookieJar::new());
        if let Some(token) = access {
            jar.set(ACCESS_TOKEN_COOKIE, token, &CookieOptions::default()).unwrap();
        }
        if let Some(token) = refresh {
            jar.set(REFRESH_TOKEN_COOKIE, token, &CookieOptions::default()).unwrap();
        }
        jar
    }

    fn client_for(
        server: &MockServer,
        jar: Arc<MemoryCookieJar>,
        listener: Arc<RecordingListener>,
    ) -> AuthClient {
        let mut config = ApiConfig::new(server.uri());
        config.max_attempts = 1;
        config.refresh_timeout_secs = 1;
        AuthClient::builder().config(config).store(jar).listener(listener).build().unwrap()
    }

    #[tokio::test]
    async fn attaches_bearer_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"movies": [], "total": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar_with(Some("access-1"), None), listener);

        let response = client.get("/movies").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn public_requests_carry_no_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar_with(Some("access-1"), Some("r1")), listener.clone());

        let err = client
            .request(Method::POST, "/auth/login", RequestBody::Empty, RequestOptions::public())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(listener.sign_in_required(), 0);
        let received = server.received_requests().await.unwrap();
        assert!(received[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn concurrent_rejections_share_one_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .and(body_json(json!({"oldRefreshToken": "r1"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"accessToken": "new", "refreshToken": "r2"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let jar = jar_with(Some("old"), Some("r1"));
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar.clone(), listener.clone());

        let (a, b, c) = tokio::join!(client.get("/a"), client.get("/b"), client.get("/c"));
        for result in [a, b, c] {
            assert_eq!(result.unwrap().status(), StatusCode::OK);
        }

        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).as_deref(), Some("new"));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).as_deref(), Some("r2"));
        assert_eq!(listener.sign_in_required(), 0);
        assert!(!client.is_refreshing());
    }

    #[tokio::test]
    async fn missing_refresh_credential_requires_sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let jar = jar_with(Some("old"), None);
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar.clone(), listener.clone());

        let err = client.get("/movies").await.unwrap_err();

        assert!(matches!(err, ApiError::SessionInvalid { .. }));
        assert!(err.requires_sign_in());
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
        assert_eq!(
            listener.events.lock().unwrap().as_slice(),
            &[SessionEvent::SignInRequired { redirect_to: "/sign-in".into() }]
        );
    }

    #[tokio::test]
    async fn failed_refresh_rejects_every_waiter_and_clears_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(403).set_delay(Duration::from_millis(150)))
            .expect(1)
            .mount(&server)
            .await;

        let jar = jar_with(Some("old"), Some("r1"));
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar.clone(), listener.clone());

        let (a, b, c) = tokio::join!(client.get("/a"), client.get("/b"), client.get("/c"));
        for result in [a, b, c] {
            let err = result.unwrap_err();
            assert!(matches!(err, ApiError::SessionInvalid { status: Some(403), .. }), "{err:?}");
        }

        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
        assert!(jar.get(REFRESH_TOKEN_COOKIE).is_none());
        assert_eq!(listener.sign_in_required(), 1);
    }

    #[tokio::test]
    async fn second_rejection_is_returned_without_another_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"accessToken": "new", "refreshToken": "r2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let jar = jar_with(Some("old"), Some("r1"));
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar.clone(), listener.clone());

        let err = client.get("/movies").await.unwrap_err();

        assert!(matches!(err, ApiError::AuthExpired(_)));
        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).as_deref(), Some("new"));
        assert_eq!(listener.sign_in_required(), 0);
    }

    #[tokio::test]
    async fn slow_refresh_times_out_into_sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"accessToken": "new", "refreshToken": "r2"}))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let jar = jar_with(Some("old"), Some("r1"));
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar.clone(), listener.clone());

        let err = client.get("/movies").await.unwrap_err();

        assert!(matches!(err, ApiError::SessionInvalid { status: None, .. }));
        assert!(jar.get(REFRESH_TOKEN_COOKIE).is_none());
        assert_eq!(listener.sign_in_required(), 1);
    }

    #[tokio::test]
    async fn non_auth_failures_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such movie"))
            .mount(&server)
            .await;

        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar_with(Some("a"), Some("r")), listener);

        let err = client.get("/missing").await.unwrap_err();
        match err {
            ApiError::Client { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("no such movie"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn builder_requires_store() {
        let result = AuthClient::builder()
            .config(ApiConfig::new("http://localhost:3000"))
            .listener(Arc::new(RecordingListener::default()))
            .build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[tokio::test]
    async fn empty_access_credential_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar_with(Some(""), Some("r1")), listener);

        client.get("/movies").await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert!(received[0].headers.get("authorization").is_none());
    }

    /// Mounts `/a` and `/b` rejecting `Bearer old`, `/b` answering after
    /// `b_delay`, and a refresh taking `refresh_delay` that may run `refreshes` times.
    async fn staggered_server(
        b_delay: Duration,
        refresh_delay: Duration,
        refreshes: u64,
    ) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401).set_delay(b_delay))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"accessToken": "new", "refreshToken": "r2"}))
                    .set_delay(refresh_delay),
            )
            .expect(refreshes)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn late_rejection_after_refresh_replays_with_stored_credential() {
        let server =
            staggered_server(Duration::from_millis(400), Duration::from_millis(100), 1).await;
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar_with(Some("old"), Some("r1")), listener.clone());

        let (a, b) = tokio::join!(client.get("/a"), client.get("/b"));

        assert_eq!(a.unwrap().status(), StatusCode::OK);
        assert_eq!(b.unwrap().status(), StatusCode::OK);
        assert_eq!(listener.sign_in_required(), 0);
    }

    #[tokio::test]
    async fn rejection_during_refresh_joins_the_queue() {
        let server =
            staggered_server(Duration::from_millis(20), Duration::from_millis(200), 1).await;
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar_with(Some("old"), Some("r1")), listener.clone());

        let (a, b) = tokio::join!(client.get("/a"), client.get("/b"));

        assert_eq!(a.unwrap().status(), StatusCode::OK);
        assert_eq!(b.unwrap().status(), StatusCode::OK);
        assert_eq!(listener.sign_in_required(), 0);
    }

    #[tokio::test]
    async fn cancelled_refresh_hands_over_to_a_waiting_request() {
        let server =
            staggered_server(Duration::from_millis(20), Duration::from_millis(300), 2).await;
        let jar = jar_with(Some("old"), Some("r1"));
        let listener = Arc::new(RecordingListener::default());
        let client = client_for(&server, jar.clone(), listener.clone());

        let (a, b) = tokio::join!(
            tokio::time::timeout(Duration::from_millis(100), client.get("/a")),
            client.get("/b"),
        );

        assert!(a.is_err(), "leader should have been cancelled");
        assert_eq!(b.unwrap().status(), StatusCode::OK);
        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).as_deref(), Some("new"));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).as_deref(), Some("r2"));
        assert!(listener.events.lock().unwrap().is_empty());
        assert!(!client.is_refreshing());
    }

    #[test]
    fn builder_rejects_zero_refresh_timeout() {
        let mut config = ApiConfig::new("http://localhost:3000");
        config.refresh_timeout_secs = 0;
        let result = AuthClient::builder()
            .config(config)
            .store(jar_with(None, None))
            .listener(Arc::new(RecordingListener::default()))
            .build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
