//! # Cinelog Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client
//! - The authenticated request client with single-flight token refresh
//! - Auth and movie catalog services built on that client
//! - Cookie-jar credential stores (in-memory and file-backed)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `cinelog-core`
//! - Contains all "impure" code (HTTP, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod session;
pub mod storage;

// Re-export commonly used items
pub use api::{
    movie_failure_label, ApiError, ApiErrorCategory, ApiMovieCatalog, AuthClient,
    AuthClientBuilder, AuthService, MovieOperation, RequestBody, RequestOptions,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use session::SessionEvents;
pub use storage::{FileCookieJar, MemoryCookieJar};
