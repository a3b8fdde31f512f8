//! Port interface for the remote movie catalog

use async_trait::async_trait;
use cinelog_domain::{Movie, MovieDraft, MoviePage, PageRequest, Result};

/// Trait for listing and editing the signed-in user's movies
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch one page of movies
    async fn list(&self, request: PageRequest) -> Result<MoviePage>;

    /// Create a movie, uploading the poster when present
    async fn create(&self, draft: MovieDraft) -> Result<Movie>;

    /// Replace the fields of an existing movie
    async fn update(&self, id: &str, draft: MovieDraft) -> Result<Movie>;
}
