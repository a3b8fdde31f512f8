//! # Cinelog Domain
//!
//! Domain types and models for the Cinelog movie catalog client.
//!
//! This crate contains:
//! - Credential, cookie and movie data types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (cookie names, routes, expiry policy)
//!
//! ## Architecture
//! - No dependencies on other Cinelog crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
