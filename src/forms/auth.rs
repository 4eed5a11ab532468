use serde::Deserialize;
use validator::Validate;

use crate::domain::session::Credentials;
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Sign-in form.
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Validates the form and converts it into credentials for the auth service.
    pub fn to_credentials(&self) -> Result<Credentials, FormError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        self.validate()?;
        Ok(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}
