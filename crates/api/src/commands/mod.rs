//! Commands exposed by the `cinelog` binary
//!
//! Each command checks the route gate for the page it stands in for, then
//! calls into the infra services.

pub mod auth;
pub mod movies;
pub mod routing;

pub use auth::{sign_in, sign_out, SignInReport};
pub use movies::{add_movie, edit_movie, list_movies, poster_from_path, MovieListing};
pub use routing::check_route;
