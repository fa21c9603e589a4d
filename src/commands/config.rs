use log::debug;

use crate::{
    http::{RetryPolicy, defaults::DEFAULT_API_URL},
    runtime::Runtime,
};

/// Settings for building an API client.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub retry: RetryPolicy,
}

impl Config {
    /// Builds a configuration from explicit options and the environment.
    ///
    /// `GITHUB_TOKEN` is used for authentication when set.
    pub fn new<R: Runtime>(runtime: &R, api_url: Option<String>, retries: Option<usize>) -> Self {
        let api_url = api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let token = runtime
            .env_var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        if let Some(token) = &token {
            debug!("Using GITHUB_TOKEN for authentication: {}", mask_token(token));
        }

        let retry = match retries {
            Some(attempts) => RetryPolicy::default().with_max_attempts(attempts),
            None => RetryPolicy::default(),
        };

        Self {
            api_url,
            token,
            retry,
        }
    }
}

/// Keeps the first 8 and last 4 characters of long tokens.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
