//! # Cinelog Core
//!
//! Pure client logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (credential store, session listener, movie catalog)
//! - The route gate deciding which navigations need a session
//! - Pagination rules for the movie list
//!
//! ## Architecture Principles
//! - Only depends on `cinelog-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits

pub mod catalog;
pub mod routing;
pub mod session;

pub use catalog::pagination::Pagination;
pub use catalog::ports::MovieCatalog;
pub use routing::gate::{RouteDecision, RouteGate};
pub use session::credentials::{clear_credentials, load_credentials, store_tokens, TokenLifetimes};
pub use session::ports::{CredentialStore, SessionEvent, SessionListener};
