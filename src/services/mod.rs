//! Operations of the lead dashboard, independent of how they are presented.

pub mod auth;
pub mod dashboard;
pub mod entries;
pub mod errors;
pub mod import;

pub use errors::{ServiceError, ServiceResult};

use crate::domain::session::Session;
use crate::domain::types::AuthToken;

/// Bearer token of a signed-in session.
pub(crate) fn require_token(session: &Session) -> ServiceResult<&AuthToken> {
    session.token().ok_or(ServiceError::Unauthorized)
}
