//! Fixed client settings for talking to the GitHub API.

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type requested on every call.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.machine-man-preview+json";

/// User-Agent identifying this integration.
pub const USER_AGENT: &str = "ghreq";
