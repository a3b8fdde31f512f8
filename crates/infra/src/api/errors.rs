//! API-specific error types
//!
//! Classifies failures of the authenticated client. Only `AuthExpired` is
//! handled by the client itself; everything else reaches the caller.

use std::time::Duration;

use cinelog_domain::CinelogError;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// No response received (connect failure, timeout)
    Network,
    /// 4xx other than 401
    Client,
    /// 401 that survived a refresh
    Authentication,
    /// No usable session; credentials were cleared
    Session,
    /// 5xx
    Server,
    /// Response arrived but could not be decoded
    Decode,
    /// Request could not be built
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Access credential rejected: {0}")]
    AuthExpired(String),

    #[error("Session invalid: {reason}")]
    SessionInvalid { reason: String, status: Option<u16> },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub(crate) fn session_invalid(reason: impl Into<String>) -> Self {
        Self::SessionInvalid { reason: reason.into(), status: None }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Client { .. } | Self::Validation(_) => ApiErrorCategory::Client,
            Self::AuthExpired(_) => ApiErrorCategory::Authentication,
            Self::SessionInvalid { .. } => ApiErrorCategory::Session,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// HTTP status that caused the error, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::AuthExpired(_) => Some(401),
            Self::SessionInvalid { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the caller must sign in again
    pub fn requires_sign_in(&self) -> bool {
        matches!(self.category(), ApiErrorCategory::Session | ApiErrorCategory::Authentication)
    }
}

impl From<CinelogError> for ApiError {
    fn from(err: CinelogError) -> Self {
        match err {
            CinelogError::Network(message) => Self::Network(message),
            CinelogError::Config(message) => Self::Config(message),
            CinelogError::Auth(message) => Self::AuthExpired(message),
            CinelogError::InvalidInput(message) => Self::Validation(message),
            CinelogError::NotFound(message) => Self::Client { status: 404, message },
            CinelogError::Http { status, message } if status >= 500 => {
                Self::Server { status, message }
            }
            CinelogError::Http { status, message } => Self::Client { status, message },
            CinelogError::Storage(message) | CinelogError::Internal(message) => {
                Self::Config(message)
            }
        }
    }
}

impl From<ApiError> for CinelogError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Network(_) | ApiError::Timeout(_) => Self::Network(message),
            ApiError::Client { status, message } | ApiError::Server { status, message } => {
                Self::Http { status, message }
            }
            ApiError::Validation(_) => Self::InvalidInput(message),
            ApiError::AuthExpired(_) | ApiError::SessionInvalid { .. } => Self::Auth(message),
            ApiError::Decode(_) => Self::Internal(message),
            ApiError::Config(_) => Self::Config(message),
        }
    }
}
