use std::fmt;
use std::time::Instant;

use anyhow::anyhow;
use cinelog_core::RouteDecision;
use cinelog_domain::constants::SIGN_IN_PATH;
use cinelog_infra::api::login_failure_label;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Result of `sign-in`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInReport {
    SignedIn { email: String, remembered: bool },
    /// An access credential already exists; nothing was sent.
    AlreadySignedIn { redirect_to: String },
}

impl fmt::Display for SignInReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedIn { email, remembered: true } => {
                write!(f, "Signed in as {email} (remembered for 30 days)")
            }
            Self::SignedIn { email, .. } => write!(f, "Signed in as {email}"),
            Self::AlreadySignedIn { redirect_to } => {
                write!(f, "Already signed in; continue at {redirect_to}")
            }
        }
    }
}

/// Sign in with email and password.
///
/// # Errors
/// Fails with the user-facing login label ("Invalid Credentials", ...) or a
/// storage error.
pub async fn sign_in(
    ctx: &AppContext,
    email: &str,
    password: &str,
    remember_me: bool,
) -> anyhow::Result<SignInReport> {
    if let RouteDecision::Redirect(to) = ctx.gate.decide(SIGN_IN_PATH, &ctx.credentials()) {
        return Ok(SignInReport::AlreadySignedIn { redirect_to: to });
    }

    let started = Instant::now();
    let result = ctx.auth.login(email, password, remember_me).await;
    log_command_execution("auth::sign_in", started.elapsed(), result.is_ok());

    match result {
        Ok(user) => Ok(SignInReport::SignedIn { email: user.email, remembered: remember_me }),
        Err(err) => {
            tracing::debug!(error = %err, "login failed");
            Err(anyhow!(login_failure_label(&err)))
        }
    }
}

/// Clear the stored credentials.
///
/// # Errors
/// Fails if the cookie jar cannot be written.
pub fn sign_out(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.auth.logout()?;
    Ok(())
}
