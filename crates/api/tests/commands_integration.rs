//! Integration tests for the CLI commands against a mock API.

use cinelog_core::RouteDecision;
use cinelog_domain::{ApiConfig, Config, SessionConfig};
use cinelog_lib::commands::{self, SignInReport};
use cinelog_lib::AppContext;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context_for(server: &MockServer, dir: &TempDir) -> AppContext {
    let mut api = ApiConfig::new(server.uri());
    api.max_attempts = 1;
    let config = Config {
        api,
        session: SessionConfig {
            cookie_jar_path: dir.path().join("jar.json").to_string_lossy().into_owned(),
            movies_per_page: 8,
        },
    };
    AppContext::new_with_config(config).expect("context should build")
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "user": { "email": "ana@example.com" }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sign_in_then_list_movies() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "movies": [{ "id": "m9", "title": "Heat", "publishedYear": 1995, "posterUrl": "uploads/heat.png" }],
            "total": 9
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let ctx = context_for(&server, &dir);

    let report = commands::sign_in(&ctx, "ana@example.com", "pw", true).await.expect("sign in");
    assert_eq!(report, SignInReport::SignedIn { email: "ana@example.com".into(), remembered: true });

    let listing = commands::list_movies(&ctx, 2).await.expect("list");
    assert_eq!(listing.pagination.total_pages(), 2);
    let rendered = listing.to_string();
    assert!(rendered.contains("Heat (1995)"));
    assert!(rendered.contains("/uploads/heat.png"));
    assert!(rendered.contains("Page 2 of 2"));
}

#[tokio::test]
async fn signed_in_user_skips_sign_in_page() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let dir = TempDir::new().expect("temp dir");
    let ctx = context_for(&server, &dir);
    commands::sign_in(&ctx, "ana@example.com", "pw", false).await.expect("sign in");

    let again = commands::sign_in(&ctx, "ana@example.com", "pw", false).await.expect("second call");
    assert_eq!(again, SignInReport::AlreadySignedIn { redirect_to: "/movies".into() });
    assert_eq!(commands::check_route(&ctx, "/sign-in"), RouteDecision::Redirect("/movies".into()));
}

#[tokio::test]
async fn invalid_credentials_surface_the_login_label() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let ctx = context_for(&server, &dir);

    let err = commands::sign_in(&ctx, "nobody@example.com", "pw", false).await.unwrap_err();
    assert_eq!(err.to_string(), "Email Not Registered");
}

#[tokio::test]
async fn protected_commands_require_a_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");
    let ctx = context_for(&server, &dir);

    assert_eq!(commands::check_route(&ctx, "/movies"), RouteDecision::Redirect("/sign-in".into()));
    assert_eq!(commands::check_route(&ctx, "/favicon.ico"), RouteDecision::Continue);

    let err = commands::list_movies(&ctx, 1).await.unwrap_err();
    assert!(err.to_string().contains("Sign in required"));
    assert!(server.received_requests().await.expect("recording").is_empty());
}

#[tokio::test]
async fn sign_out_forgets_the_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let dir = TempDir::new().expect("temp dir");
    let ctx = context_for(&server, &dir);
    commands::sign_in(&ctx, "ana@example.com", "pw", false).await.expect("sign in");

    commands::sign_out(&ctx).expect("sign out");

    assert!(ctx.credentials().is_empty());
    assert_eq!(commands::check_route(&ctx, "/movies"), RouteDecision::Redirect("/sign-in".into()));
}

#[tokio::test]
async fn add_movie_uploads_poster_file() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/movies/add"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "m1", "title": "Alien", "publishedYear": "1979"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let poster = dir.path().join("alien.png");
    std::fs::write(&poster, [0x89, b'P', b'N', b'G']).expect("poster written");
    let ctx = context_for(&server, &dir);
    commands::sign_in(&ctx, "ana@example.com", "pw", false).await.expect("sign in");

    let movie = commands::add_movie(&ctx, "Alien", "1979", Some(&poster)).await.expect("add");
    assert_eq!(movie.id.as_deref(), Some("m1"));

    let err = commands::add_movie(&ctx, "Alien", "79", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Published year is required");
}

#[tokio::test]
async fn catalog_failures_surface_per_command_labels() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/movies/add"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate title"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/movies/update/m404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let ctx = context_for(&server, &dir);
    commands::sign_in(&ctx, "ana@example.com", "pw", false).await.expect("sign in");

    let err = commands::add_movie(&ctx, "Alien", "1979", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Movie already exists");

    let err = commands::edit_movie(&ctx, "m404", "Alien", "1979", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Movie not found");

    let err = commands::list_movies(&ctx, 1).await.unwrap_err();
    assert_eq!(err.to_string(), "Movies not found");
}
