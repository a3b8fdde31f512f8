use std::fmt;
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, bail, Context};
use cinelog_core::{Pagination, RouteDecision};
use cinelog_domain::constants::HOME_PATH;
use cinelog_domain::{CinelogError, Movie, MovieDraft, PosterUpload};
use cinelog_infra::{movie_failure_label, MovieOperation};

use crate::context::AppContext;
use crate::utils::logging::{error_label, log_command_execution};

/// One rendered page of the movie list
#[derive(Debug, Clone)]
pub struct MovieListing {
    pub movies: Vec<Movie>,
    pub pagination: Pagination,
    pub base_url: String,
}

impl fmt::Display for MovieListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.movies.is_empty() {
            return writeln!(f, "Your movie list is empty");
        }

        for movie in &self.movies {
            write!(f, "{:<10} {} ({})", movie.id.as_deref().unwrap_or("-"), movie.title, movie.published_year)?;
            if let Some(poster) = movie.poster_location(&self.base_url) {
                write!(f, "  {poster}")?;
            }
            writeln!(f)?;
        }

        let p = &self.pagination;
        write!(f, "Page {} of {}", p.current, p.total_pages())?;
        if p.has_previous() {
            write!(f, "  prev: {}", p.previous_page())?;
        }
        if p.has_next() {
            write!(f, "  next: {}", p.next_page())?;
        }
        writeln!(f)
    }
}

fn require_session(ctx: &AppContext) -> anyhow::Result<()> {
    match ctx.gate.decide(HOME_PATH, &ctx.credentials()) {
        RouteDecision::Continue => Ok(()),
        RouteDecision::Redirect(to) => bail!("Sign in required (redirect to {to})"),
    }
}

fn describe(operation: MovieOperation, err: CinelogError) -> anyhow::Error {
    match err {
        CinelogError::Auth(_) => anyhow!("Session expired; sign in again"),
        CinelogError::InvalidInput(message) => anyhow!(message),
        other => {
            tracing::debug!(error = %other, "catalog call failed");
            anyhow!(movie_failure_label(operation, &other))
        }
    }
}

/// Fetch page `page` of the movie list.
///
/// # Errors
/// Fails when no session exists or the API call fails.
pub async fn list_movies(ctx: &AppContext, page: u32) -> anyhow::Result<MovieListing> {
    require_session(ctx)?;

    let per_page = ctx.config.session.movies_per_page;
    let started = Instant::now();
    let result = ctx.catalog.list(Pagination::new(page, per_page, 0).request()).await;
    log_command_execution("movies::list", started.elapsed(), result.is_ok());

    let page_data = result.map_err(|err| {
        tracing::warn!(error_type = error_label(&err), "movie list failed");
        describe(MovieOperation::List, err)
    })?;

    Ok(MovieListing {
        pagination: Pagination::new(page, per_page, page_data.total),
        movies: page_data.movies,
        base_url: ctx.config.api.base_url.clone(),
    })
}

/// Create a movie.
///
/// # Errors
/// Fails when no session exists, the draft is invalid, the poster cannot be
/// read or the API call fails.
pub async fn add_movie(
    ctx: &AppContext,
    title: &str,
    published_year: &str,
    poster: Option<&Path>,
) -> anyhow::Result<Movie> {
    require_session(ctx)?;
    let draft = draft_with_poster(MovieOperation::Create, title, published_year, poster).await?;

    let started = Instant::now();
    let result = ctx.catalog.create(draft).await;
    log_command_execution("movies::create", started.elapsed(), result.is_ok());
    result.map_err(|err| describe(MovieOperation::Create, err))
}

/// Update an existing movie.
///
/// # Errors
/// Same as [`add_movie`].
pub async fn edit_movie(
    ctx: &AppContext,
    id: &str,
    title: &str,
    published_year: &str,
    poster: Option<&Path>,
) -> anyhow::Result<Movie> {
    require_session(ctx)?;
    let draft = draft_with_poster(MovieOperation::Update, title, published_year, poster).await?;

    let started = Instant::now();
    let result = ctx.catalog.update(id, draft).await;
    log_command_execution("movies::update", started.elapsed(), result.is_ok());
    result.map_err(|err| describe(MovieOperation::Update, err))
}

async fn draft_with_poster(
    operation: MovieOperation,
    title: &str,
    published_year: &str,
    poster: Option<&Path>,
) -> anyhow::Result<MovieDraft> {
    let draft = MovieDraft::new(title, published_year);
    draft.validate().map_err(|err| describe(operation, err))?;
    Ok(match poster {
        Some(path) => draft.with_poster(poster_from_path(path).await?),
        None => draft,
    })
}

/// Read an image file into a poster upload.
///
/// # Errors
/// Fails if the file cannot be read or is not a supported image type.
pub async fn poster_from_path(path: &Path) -> anyhow::Result<PosterUpload> {
    let mime_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => bail!("Unsupported poster type: {}", path.display()),
    };

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read poster {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("poster")
        .to_string();

    Ok(PosterUpload::new(file_name, mime_type, bytes))
}
