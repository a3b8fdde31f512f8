//! Remote API access for the movie catalog
//!
//! This module provides the authenticated HTTP client and the services built
//! on it.
//!
//! # Architecture
//!
//! - [`AuthClient`] attaches the bearer credential and recovers from expired
//!   access credentials with a single-flight refresh
//! - [`refresh::RefreshCoordinator`] owns the in-flight flag and the queue of
//!   requests waiting for the refresh outcome
//! - [`AuthService`] signs users in and out
//! - [`ApiMovieCatalog`] implements the `MovieCatalog` port over HTTP
//!
//! Credentials are never logged.

pub mod auth;
pub mod body;
pub mod client;
pub mod errors;
pub mod movies;
pub mod refresh;

pub use auth::{login_failure_label, AuthService};
pub use body::{FilePart, MultipartPayload, RequestBody, RequestOptions};
pub use client::{decode_json, AuthClient, AuthClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
pub use movies::{movie_failure_label, ApiMovieCatalog, MovieOperation};
pub use refresh::{RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshTicket, RefreshWaiter};
