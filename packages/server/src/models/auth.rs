use serde_json::Value;

use super::shared::{FieldError, validation_error};
use crate::error::AppError;
use crate::extractors::form::FormPayload;

/// Validated login form.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn from_payload(payload: &FormPayload) -> Result<Self, AppError> {
        let email = payload.text("email");
        // Passwords are taken verbatim; surrounding spaces are significant.
        let password = match payload.fields.get("password") {
            Some(Value::String(raw)) if !raw.is_empty() => Some(raw.clone()),
            _ => None,
        };

        let mut errors = Vec::new();
        if email.is_none() {
            errors.push(FieldError::Required("email"));
        }
        if password.is_none() {
            errors.push(FieldError::Required("password"));
        }
        if let Some(err) = validation_error(&errors) {
            return Err(err);
        }

        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(AppError::Validation("The email field is required.".into())),
        }
    }
}
