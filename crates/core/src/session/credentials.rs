//! Reading and writing the credential pair through a [`CredentialStore`].

use cinelog_domain::constants::{
    ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_TTL_DAYS, REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_TTL_DAYS,
    REMEMBER_ME_TTL_DAYS,
};
use cinelog_domain::{CookieOptions, Credentials, Result, TokenPair};
use tracing::debug;

use super::ports::CredentialStore;

/// Cookie lifetimes (in days) applied when a token pair is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access_days: i64,
    pub refresh_days: i64,
}

impl TokenLifetimes {
    /// Lifetimes for a regular sign-in and for every refresh.
    pub const STANDARD: Self =
        Self { access_days: ACCESS_TOKEN_TTL_DAYS, refresh_days: REFRESH_TOKEN_TTL_DAYS };

    /// Lifetimes for a "remember me" sign-in.
    pub const REMEMBER_ME: Self =
        Self { access_days: REMEMBER_ME_TTL_DAYS, refresh_days: REMEMBER_ME_TTL_DAYS };

    pub fn for_sign_in(remember_me: bool) -> Self {
        if remember_me {
            Self::REMEMBER_ME
        } else {
            Self::STANDARD
        }
    }
}

/// Snapshot of both credentials.
pub fn load_credentials(store: &dyn CredentialStore) -> Credentials {
    Credentials::new(store.get(ACCESS_TOKEN_COOKIE), store.get(REFRESH_TOKEN_COOKIE))
}

/// Persist a freshly issued pair. Both cookies are secure, `SameSite=Lax`,
/// scoped to `/`.
pub fn store_tokens(
    store: &dyn CredentialStore,
    tokens: &TokenPair,
    lifetimes: TokenLifetimes,
) -> Result<()> {
    store.set(
        ACCESS_TOKEN_COOKIE,
        &tokens.access_token,
        &CookieOptions::secure_lax(lifetimes.access_days),
    )?;
    store.set(
        REFRESH_TOKEN_COOKIE,
        &tokens.refresh_token,
        &CookieOptions::secure_lax(lifetimes.refresh_days),
    )?;
    debug!(
        access_days = lifetimes.access_days,
        refresh_days = lifetimes.refresh_days,
        "credential pair stored"
    );
    Ok(())
}

/// Remove both credentials. Both removals are attempted even if the first
/// fails; the first error is returned.
pub fn clear_credentials(store: &dyn CredentialStore) -> Result<()> {
    let access = store.remove(ACCESS_TOKEN_COOKIE);
    let refresh = store.remove(REFRESH_TOKEN_COOKIE);
    debug!("credential pair cleared");
    access.and(refresh)
}
