//! Movie catalog types

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{DEFAULT_MOVIES_PER_PAGE, MIN_PUBLISHED_YEAR_LEN};
use crate::errors::{CinelogError, Result};

/// A movie record as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(deserialize_with = "string_or_number")]
    pub published_year: String,
    /// Path relative to the API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl Movie {
    /// Absolute poster location, resolved as `{base}/{posterUrl}`.
    pub fn poster_location(&self, base_url: &str) -> Option<String> {
        self.poster_url.as_deref().filter(|p| !p.is_empty()).map(|poster| {
            format!("{}/{}", base_url.trim_end_matches('/'), poster.trim_start_matches('/'))
        })
    }
}

/// One page of the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub total: u64,
}

/// Page/limit query for the list endpoint. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page: page.max(1), limit: limit.max(1) }
    }

    pub fn first() -> Self {
        Self::new(1, DEFAULT_MOVIES_PER_PAGE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Poster image attached to a create/update request.
#[derive(Clone, PartialEq, Eq)]
pub struct PosterUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PosterUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), mime_type: mime_type.into(), bytes }
    }
}

impl fmt::Debug for PosterUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Fields submitted by the create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
    pub published_year: String,
    pub poster: Option<PosterUpload>,
}

impl MovieDraft {
    pub fn new(title: impl Into<String>, published_year: impl Into<String>) -> Self {
        Self { title: title.into(), published_year: published_year.into(), poster: None }
    }

    #[must_use]
    pub fn with_poster(mut self, poster: PosterUpload) -> Self {
        self.poster = Some(poster);
        self
    }

    /// Minimal checks needed before building a request.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CinelogError::InvalidInput("Title is required".into()));
        }
        if self.published_year.trim().len() < MIN_PUBLISHED_YEAR_LEN {
            return Err(CinelogError::InvalidInput("Published year is required".into()));
        }
        Ok(())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
