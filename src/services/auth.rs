use crate::domain::session::Session;
use crate::forms::auth::LoginForm;
use crate::repository::errors::RepositoryError;
use crate::repository::{Authenticator, SessionStore};
use crate::services::{ServiceError, ServiceResult};

/// Message shown when the auth service rejects the credentials without
/// explaining why.
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Signs in and persists the issued session.
pub async fn login<A, S>(auth: &A, sessions: &S, form: &LoginForm) -> ServiceResult<Session>
where
    A: Authenticator + ?Sized,
    S: SessionStore + ?Sized,
{
    let credentials = form.to_credentials()?;

    let session = auth
        .login(&credentials)
        .await
        .map_err(|err| match err {
            RepositoryError::Unauthorized | RepositoryError::NotFound => {
                ServiceError::Form(LOGIN_FAILED.to_string())
            }
            other => {
                log::error!("Failed to sign in: {other}");
                ServiceError::from(other)
            }
        })?;

    sessions.save(&session).map_err(|err| {
        log::error!("Failed to save session: {err}");
        err
    })?;

    log::info!("Signed in as user {:?}", session.user_id());
    Ok(session)
}

/// Forgets the persisted session.
pub fn logout<S>(sessions: &S) -> ServiceResult<()>
where
    S: SessionStore + ?Sized,
{
    sessions.clear().map_err(|err| {
        log::error!("Failed to clear session: {err}");
        err
    })?;
    Ok(())
}

/// Session saved by a previous login, or an empty one.
pub fn current_session<S>(sessions: &S) -> ServiceResult<Session>
where
    S: SessionStore + ?Sized,
{
    Ok(sessions.load()?)
}
