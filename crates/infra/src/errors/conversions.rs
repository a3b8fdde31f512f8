//! Conversions from external infrastructure errors into domain errors.

use cinelog_domain::CinelogError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CinelogError);

impl From<InfraError> for CinelogError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CinelogError> for InfraError {
    fn from(value: CinelogError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCinelogError {
    fn into_cinelog(self) -> CinelogError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CinelogError */
/* -------------------------------------------------------------------------- */

impl IntoCinelogError for HttpError {
    fn into_cinelog(self) -> CinelogError {
        if self.is_timeout() {
            return CinelogError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CinelogError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return CinelogError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => CinelogError::Auth(message),
                404 => CinelogError::NotFound(message),
                400..=499 => CinelogError::InvalidInput(message),
                _ => CinelogError::Network(message),
            };
        }

        CinelogError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_cinelog())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → CinelogError */
/* -------------------------------------------------------------------------- */

impl IntoCinelogError for std::io::Error {
    fn into_cinelog(self) -> CinelogError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => CinelogError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                CinelogError::Storage(format!("permission denied: {self}"))
            }
            _ => CinelogError::Storage(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_cinelog())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CinelogError */
/* -------------------------------------------------------------------------- */

impl IntoCinelogError for serde_json::Error {
    fn into_cinelog(self) -> CinelogError {
        if self.is_io() {
            CinelogError::Storage(format!("I/O error while handling JSON: {self}"))
        } else {
            CinelogError::InvalidInput(format!("malformed JSON: {self}"))
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_cinelog())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
