//! HTTP implementation of the `MovieCatalog` port

use std::sync::Arc;

use async_trait::async_trait;
use cinelog_core::MovieCatalog;
use cinelog_domain::constants::{MOVIES_ADD_ENDPOINT, MOVIES_ENDPOINT, MOVIES_UPDATE_ENDPOINT};
use cinelog_domain::{CinelogError, Movie, MovieDraft, MoviePage, PageRequest, Result};
use reqwest::{Method, Response};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::body::{FilePart, MultipartPayload, RequestBody, RequestOptions};
use super::client::{decode_json, AuthClient};
use super::errors::ApiError;

/// Create/update responses come back either bare or wrapped in `movie`.
#[derive(Deserialize)]
#[serde(untagged)]
enum MovieEnvelope {
    Wrapped { movie: Movie },
    Bare(Movie),
}

/// Catalog call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieOperation {
    List,
    Create,
    Update,
}

/// User-facing label for a failed catalog call.
pub fn movie_failure_label(operation: MovieOperation, err: &CinelogError) -> &'static str {
    if matches!(err, CinelogError::Network(_)) {
        return "Some error occurred";
    }
    match (operation, err.status()) {
        (_, Some(400)) => "Bad Request",
        (MovieOperation::List, Some(404)) => "Movies not found",
        (MovieOperation::Update, Some(404)) => "Movie not found",
        (MovieOperation::Create, Some(409)) => "Movie already exists",
        _ => "Internal Server Error",
    }
}

/// Movie catalog backed by the remote API
pub struct ApiMovieCatalog {
    client: Arc<AuthClient>,
}

impl ApiMovieCatalog {
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }

    async fn submit(&self, method: Method, path: &str, draft: MovieDraft) -> Result<Movie> {
        draft.validate()?;
        let response = self
            .client
            .request(method, path, RequestBody::Multipart(form_for(&draft)), RequestOptions::default())
            .await?;
        Ok(movie_from_response(response, draft).await)
    }
}

#[async_trait]
impl MovieCatalog for ApiMovieCatalog {
    #[instrument(skip(self))]
    async fn list(&self, request: PageRequest) -> Result<MoviePage> {
        let options =
            RequestOptions::default().query("page", request.page).query("limit", request.limit);
        let response =
            self.client.request(Method::GET, MOVIES_ENDPOINT, RequestBody::Empty, options).await?;
        let page: MoviePage = decode_json(response).await?;
        debug!(returned = page.movies.len(), total = page.total, "fetched movie page");
        Ok(page)
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create(&self, draft: MovieDraft) -> Result<Movie> {
        self.submit(Method::POST, MOVIES_ADD_ENDPOINT, draft).await
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn update(&self, id: &str, draft: MovieDraft) -> Result<Movie> {
        if id.trim().is_empty() {
            return Err(ApiError::Validation("Movie id is required".into()).into());
        }
        let mut url = self.client.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::Config(format!("Base URL {} cannot carry a path", self.client.base_url()))
            })?
            .pop_if_empty()
            .extend(MOVIES_UPDATE_ENDPOINT.split('/').filter(|s| !s.is_empty()))
            .push(id);
        let mut movie = self.submit(Method::PUT, url.as_str(), draft).await?;
        movie.id.get_or_insert_with(|| id.to_string());
        Ok(movie)
    }
}

fn form_for(draft: &MovieDraft) -> MultipartPayload {
    let mut form = MultipartPayload::new()
        .text("title", draft.title.trim())
        .text("publishedYear", draft.published_year.trim());
    if let Some(poster) = &draft.poster {
        form = form.file(FilePart {
            field: "poster".into(),
            file_name: poster.file_name.clone(),
            mime_type: poster.mime_type.clone(),
            bytes: poster.bytes.clone(),
        });
    }
    form
}

/// Decode the saved movie, falling back to the submitted fields when the API
/// answers with an empty or unrelated body.
async fn movie_from_response(response: Response, draft: MovieDraft) -> Movie {
    let parsed = match response.text().await {
        Ok(text) if !text.trim().is_empty() => serde_json::from_str::<MovieEnvelope>(&text).ok(),
        _ => None,
    };

    match parsed {
        Some(MovieEnvelope::Wrapped { movie } | MovieEnvelope::Bare(movie)) => movie,
        None => {
            debug!("saved movie not echoed back; using submitted fields");
            Movie {
                id: None,
                title: draft.title.trim().to_string(),
                published_year: draft.published_year.trim().to_string(),
                poster_url: None,
            }
        }
    }
}
