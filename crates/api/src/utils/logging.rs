use std::time::Duration;

use cinelog_domain::CinelogError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to `info` for the cinelog crates and `warn`
/// for everything else. `json` switches to one JSON object per line.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cinelog_app=info,cinelog_infra=info,cinelog_core=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if json { builder.json().try_init() } else { builder.compact().try_init() };

    if result.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` must not carry credentials or user input.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `CinelogError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &CinelogError) -> &'static str {
    match error {
        CinelogError::Config(_) => "config",
        CinelogError::Network(_) => "network",
        CinelogError::Auth(_) => "auth",
        CinelogError::Storage(_) => "storage",
        CinelogError::NotFound(_) => "not_found",
        CinelogError::InvalidInput(_) => "invalid_input",
        CinelogError::Http { .. } => "http",
        CinelogError::Internal(_) => "internal",
    }
}
