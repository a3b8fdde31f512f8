//! Configuration loading
//!
//! Environment variables first, then `config.{json,toml}` /
//! `cinelog.{json,toml}` files.

pub mod loader;

pub use loader::{env_bool, load, load_from_env, load_from_file, probe_config_paths};
