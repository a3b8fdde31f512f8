//! Replayable request bodies and per-request options
//!
//! A request may be sent twice (first attempt + replay after refresh), so bodies
//! are kept as plain data and turned into a reqwest body on every send.

use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::Serialize;

use super::errors::ApiError;

/// Request body held in replayable form
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartPayload),
}

impl RequestBody {
    /// Serialize `value` into a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::Validation(format!("Failed to serialize body: {e}")))
    }

    pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(match self {
            Self::Empty => builder,
            Self::Json(value) => builder.json(value),
            Self::Multipart(payload) => builder.multipart(payload.to_form()?),
        })
    }
}

/// A file part of a multipart form
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart form kept as owned parts
#[derive(Debug, Clone, Default)]
pub struct MultipartPayload {
    text: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a text field, replacing any earlier value for the same name.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.text.retain(|(existing, _)| *existing != name);
        self.text.push((name, value.into()));
        self
    }

    /// Set a file field, replacing any earlier file for the same name.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.retain(|existing| existing.field != part.field);
        self.files.push(part);
        self
    }

    pub fn text_fields(&self) -> &[(String, String)] {
        &self.text
    }

    pub fn file_parts(&self) -> &[FilePart] {
        &self.files
    }

    fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in &self.text {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| {
                    ApiError::Validation(format!("Invalid MIME type '{}': {e}", file.mime_type))
                })?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// Send without a bearer credential and skip refresh handling (login).
    pub skip_auth: bool,
}

impl RequestOptions {
    /// Options for endpoints that must not carry a credential.
    pub fn public() -> Self {
        Self { skip_auth: true, ..Self::default() }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }
}
