//! Authenticated session state persisted between invocations.

use serde::{Deserialize, Serialize};

use crate::domain::types::AuthToken;

/// Credentials posted to the login endpoint.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Token, user id and role issued at login.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    token: Option<AuthToken>,
    user_id: Option<String>,
    role: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(token: AuthToken, user_id: Option<String>, role: Option<String>) -> Self {
        Self {
            token: Some(token),
            user_id: user_id.filter(|id| !id.trim().is_empty()),
            role: role.filter(|role| !role.trim().is_empty()),
        }
    }

    /// Bearer token, if the user is signed in.
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Forgets every stored credential.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
