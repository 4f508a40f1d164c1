use axum::body::Bytes;
use chrono::{DateTime, Utc};
use common::storage::FileStore;
use serde::Serialize;
use serde_json::Value;

use super::shared::{FieldError, validation_error};
use crate::entity::brand;
use crate::error::AppError;
use crate::extractors::form::{FormPayload, UploadedFile};
use crate::utils::image::ImageKind;

pub const NAME_MAX_CHARS: usize = 255;
pub const IMAGE_MAX_KB: u64 = 2048;
pub const IMAGE_TYPES: [&str; 4] = ["jpeg", "png", "jpg", "gif"];
const IMAGE_TYPES_LABEL: &str = "jpeg, png, jpg, gif";

/// An uploaded logo that passed validation.
#[derive(Debug, Clone)]
pub struct ValidImage {
    pub kind: ImageKind,
    pub bytes: Bytes,
}

/// Validated input of the store and update actions.
#[derive(Debug)]
pub struct BrandInput {
    pub name: String,
    pub image: Option<ValidImage>,
}

impl BrandInput {
    /// Apply the brand rules: `name` required string of at most 255 characters,
    /// `image` optional jpeg/png/gif no larger than 2048 KB.
    pub fn from_payload(payload: &FormPayload) -> Result<Self, AppError> {
        let mut errors = Vec::new();

        let name = match payload.fields.get("name") {
            None | Some(Value::Null) => {
                errors.push(FieldError::Required("name"));
                None
            }
            Some(Value::String(raw)) => {
                let name = raw.trim();
                if name.is_empty() {
                    errors.push(FieldError::Required("name"));
                    None
                } else if name.chars().count() > NAME_MAX_CHARS {
                    errors.push(FieldError::TooLong {
                        field: "name",
                        max: NAME_MAX_CHARS,
                    });
                    None
                } else {
                    Some(name.to_string())
                }
            }
            Some(_) => {
                errors.push(FieldError::NotString("name"));
                None
            }
        };

        let image = match payload.file("image") {
            Some(file) => validate_image(file, &mut errors),
            None => {
                // Anything but a file, null or a blank string is not an upload.
                let absent = match payload.fields.get("image") {
                    None | Some(Value::Null) => true,
                    Some(Value::String(s)) => s.trim().is_empty(),
                    Some(_) => false,
                };
                if !absent {
                    errors.push(FieldError::NotImage("image"));
                    errors.push(FieldError::WrongType {
                        field: "image",
                        allowed: IMAGE_TYPES_LABEL,
                    });
                }
                None
            }
        };

        match (name, validation_error(&errors)) {
            (_, Some(err)) => Err(err),
            (Some(name), None) => Ok(Self { name, image }),
            (None, None) => Err(AppError::Validation(
                FieldError::Required("name").to_string(),
            )),
        }
    }
}

fn validate_image(file: &UploadedFile, errors: &mut Vec<FieldError>) -> Option<ValidImage> {
    let before = errors.len();
    let kind = ImageKind::sniff(&file.bytes);

    match kind {
        None => {
            errors.push(FieldError::NotImage("image"));
            errors.push(FieldError::WrongType {
                field: "image",
                allowed: IMAGE_TYPES_LABEL,
            });
        }
        Some(kind) if !kind.matches_any(&IMAGE_TYPES) => {
            errors.push(FieldError::WrongType {
                field: "image",
                allowed: IMAGE_TYPES_LABEL,
            });
        }
        Some(_) => {}
    }

    if file.bytes.len() as u64 > IMAGE_MAX_KB * 1024 {
        errors.push(FieldError::TooLarge {
            field: "image",
            max_kb: IMAGE_MAX_KB,
        });
    }

    match kind {
        Some(kind) if errors.len() == before => Some(ValidImage {
            kind,
            bytes: file.bytes.clone(),
        }),
        _ => None,
    }
}

/// Relative storage path of a stored image value.
///
/// Rows written before paths were stored may hold the public URL instead;
/// the store's URL prefix is stripped from those.
pub fn image_relative_path<'a>(store: &dyn FileStore, stored: &'a str) -> &'a str {
    store.path_from_url(stored).unwrap_or(stored)
}

/// Brand as handed to the page components.
#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub id: i32,
    pub name: String,
    /// Public URL of the logo.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BrandResponse {
    pub fn from_model(model: brand::Model, store: &dyn FileStore) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image: model
                .image_path
                .as_deref()
                .map(|stored| store.url(image_relative_path(store, stored))),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
