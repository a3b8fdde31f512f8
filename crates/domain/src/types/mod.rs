//! Domain types and models

pub mod auth;
pub mod cookie;
pub mod movie;

pub use auth::{Credentials, LoginRequest, LoginResponse, RefreshRequest, TokenPair, UserSummary};
pub use cookie::{CookieOptions, SameSite};
pub use movie::{Movie, MovieDraft, MoviePage, PageRequest, PosterUpload};
