//! Credential and authentication payload types
//!
//! Wire names follow the remote API (`accessToken`, `oldRefreshToken`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access/refresh credential pair as read from the credential store.
///
/// Either half may be missing: an expired access cookie leaves a
/// refresh-only session behind.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self { access_token, refresh_token }
    }

    pub fn has_access(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn has_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Neither credential is present.
    pub fn is_empty(&self) -> bool {
        !self.has_access() && !self.has_refresh()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Freshly issued credentials (refresh endpoint response).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl From<TokenPair> for Credentials {
    fn from(pair: TokenPair) -> Self {
        Self { access_token: Some(pair.access_token), refresh_token: Some(pair.refresh_token) }
    }
}

/// Body of the refresh call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub old_refresh_token: String,
}

/// Body of the login call.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest").field("email", &self.email).finish_non_exhaustive()
    }
}

/// Minimal user record returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub email: String,
}

/// Login response: a token pair plus the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    #[serde(default)]
    pub user: Option<UserSummary>,
}
