use thiserror::Error;

use crate::error::AppError;

/// A single failed validation rule, worded for the person filling the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("The {0} field is required.")]
    Required(&'static str),
    #[error("The {0} field must be a string.")]
    NotString(&'static str),
    #[error("The {field} field must not be greater than {max} characters.")]
    TooLong { field: &'static str, max: usize },
    #[error("The {0} field must be an image.")]
    NotImage(&'static str),
    #[error("The {field} field must be a file of type: {allowed}.")]
    WrongType {
        field: &'static str,
        allowed: &'static str,
    },
    #[error("The {field} field must not be greater than {max_kb} kilobytes.")]
    TooLarge { field: &'static str, max_kb: u64 },
}

/// Collapse failed rules into one validation error.
///
/// The message is the first failure, followed by a count of the rest.
pub fn validation_error(errors: &[FieldError]) -> Option<AppError> {
    let (first, rest) = errors.split_first()?;
    let message = match rest.len() {
        0 => first.to_string(),
        1 => format!("{first} (and 1 more error)"),
        n => format!("{first} (and {n} more errors)"),
    };
    Some(AppError::Validation(message))
}
