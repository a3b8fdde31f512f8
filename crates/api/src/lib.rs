//! # Cinelog App
//!
//! Command-line shell around the movie catalog client.
//!
//! This crate contains:
//! - Commands (sign-in, sign-out, movie list, create/edit, route checks)
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the cookie jar, the authenticated client and the services together

pub mod commands;
pub mod context;
pub mod utils;

pub use context::AppContext;
