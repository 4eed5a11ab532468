//! Form definitions backing the dashboard operations.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod entry;
pub mod import;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data or uploaded files.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("the workbook has no sheets")]
    NoSheets,

    #[error("Please fill in both fields.")]
    MissingCredentials,
}

impl FormError {
    /// Short message suitable for a notice.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Validation(errors) => {
                let fields = errors.field_errors();
                let mut names: Vec<_> = fields.keys().collect();
                names.sort();
                let Some(name) = names.first() else {
                    return self.to_string();
                };
                let codes = fields
                    .get(*name)
                    .map(|errors| errors.iter().map(|e| e.code.as_ref()).collect::<Vec<_>>())
                    .unwrap_or_default();
                if codes.contains(&"email") {
                    "Please enter a valid email address.".to_string()
                } else if **name == "remarks" {
                    TypeConstraintError::RemarksTooLong.to_string()
                } else {
                    format!("{} is required!", field_label(name))
                }
            }
            other => other.to_string(),
        }
    }
}

/// `customer_name` -> `Customer name`.
fn field_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;
    use crate::forms::auth::LoginForm;
    use crate::forms::entry::AddEntryForm;

    #[test]
    fn missing_field_names_the_first_field() {
        let form = AddEntryForm {
            customer_name: "Asha".to_string(),
            ..AddEntryForm::default()
        };
        let err = FormError::from(form.validate().unwrap_err());
        assert_eq!(err.user_message(), "Address is required!");
    }

    #[test]
    fn bad_email_has_its_own_message() {
        let form = LoginForm {
            email: "nope".to_string(),
            password: "x".to_string(),
        };
        let err = FormError::from(form.validate().unwrap_err());
        assert_eq!(err.user_message(), "Please enter a valid email address.");
    }

    #[test]
    fn labels_are_humanised() {
        assert_eq!(field_label("customer_name"), "Customer name");
        assert_eq!(field_label("city"), "City");
    }
}
