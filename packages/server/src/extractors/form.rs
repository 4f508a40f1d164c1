use std::collections::HashMap;

use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header},
};
use serde_json::Value;

use crate::error::AppError;

const UNREADABLE_FORM: &str = "The submitted form could not be read.";

/// A file part of a multipart submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Browsers send an unnamed, empty part for a file input left blank.
    pub fn is_present(&self) -> bool {
        !self.bytes.is_empty() || self.file_name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// A form submission, whichever encoding the client chose.
///
/// Page clients post JSON when no file is attached and `multipart/form-data`
/// when one is; plain HTML forms post `application/x-www-form-urlencoded`.
/// Text values land in `fields`, file parts in `files`.
#[derive(Debug, Default)]
pub struct FormPayload {
    pub fields: HashMap<String, Value>,
    pub files: HashMap<String, UploadedFile>,
}

impl FormPayload {
    /// The uploaded file under `name`, ignoring blank file inputs.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).filter(|f| f.is_present())
    }

    /// A text field with surrounding whitespace removed; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| unreadable(&e.body_text()))?;
            return read_multipart(multipart).await;
        }

        if content_type.starts_with("application/json") {
            let Json(fields) = Json::<HashMap<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| unreadable(&e.body_text()))?;
            return Ok(Self {
                fields,
                files: HashMap::new(),
            });
        }

        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| unreadable(&e.body_text()))?;
        Ok(Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
            files: HashMap::new(),
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormPayload, AppError> {
    let mut payload = FormPayload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match field.file_name().map(str::to_owned) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                payload.files.insert(
                    name,
                    UploadedFile {
                        file_name: Some(file_name),
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let text = field.text().await.map_err(multipart_error)?;
                payload.fields.insert(name, Value::String(text));
            }
        }
    }

    Ok(payload)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation("The uploaded request is too large.".into())
    } else {
        unreadable(&err.body_text())
    }
}

/// The client only learns that the body was unusable; the reason goes to the log.
fn unreadable(detail: &str) -> AppError {
    tracing::warn!(%detail, "Rejected unreadable form body");
    AppError::Validation(UNREADABLE_FORM.into())
}
