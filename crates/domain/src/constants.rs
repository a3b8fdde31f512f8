//! Application constants
//!
//! Centralized location for cookie names, routes and expiry policy shared by
//! the client, the auth flow and the route gate.

// Cookie names
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const REMEMBERED_EMAIL_KEY: &str = "rememberedEmail";

// Routes
pub const SIGN_IN_PATH: &str = "/sign-in";
pub const HOME_PATH: &str = "/movies";

// API endpoints (relative to the configured base URL)
pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh-token";
pub const MOVIES_ENDPOINT: &str = "/movies";
pub const MOVIES_ADD_ENDPOINT: &str = "/movies/add";
pub const MOVIES_UPDATE_ENDPOINT: &str = "/movies/update";

// Cookie lifetimes in days
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 1;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
pub const REMEMBER_ME_TTL_DAYS: i64 = 30;

// Client defaults
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_MOVIES_PER_PAGE: u32 = 8;

// Draft validation
pub const MIN_PUBLISHED_YEAR_LEN: usize = 4;
