//! Service factory for building the API client from configuration.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::http::{
    HttpClient,
    defaults::{DEFAULT_ACCEPT, USER_AGENT},
};

use super::config::Config;

/// Build a reqwest client with the fixed API headers and an optional token.
///
/// Proxy settings from the environment are ignored.
pub fn build_reqwest_client(token: Option<&str>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

    if let Some(token) = token {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("GITHUB_TOKEN contains characters not allowed in a header")?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("HTTP client configured with authentication");
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .no_proxy()
        .build()
        .context("Failed to build HTTP client")?;

    Ok(client)
}

/// Build an HTTP client with retries and error classification from configuration
pub fn build_http_client(config: &Config) -> Result<HttpClient> {
    let client = build_reqwest_client(config.token.as_deref())?;
    Ok(HttpClient::new(client, config.retry, config.api_url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RetryPolicy;
    use mockito::{Matcher, Server};

    fn config(url: &str, token: Option<&str>) -> Config {
        Config {
            api_url: url.to_string(),
            token: token.map(|t| t.to_string()),
            retry: RetryPolicy::no_retry(),
        }
    }

    #[tokio::test]
    async fn test_build_http_client_sends_default_headers() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .match_header(
                "Accept",
                Matcher::Exact("application/vnd.github.machine-man-preview+json".to_string()),
            )
            .match_header("User-Agent", Matcher::Exact("ghreq".to_string()))
            .match_header("Authorization", Matcher::Missing)
            .create_async()
            .await;

        let http_client = build_http_client(&config(&server.url(), None)).unwrap();
        let _ = http_client.get("/").await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_build_http_client_with_token() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .match_header(
                "Authorization",
                Matcher::Exact("Bearer test_token".to_string()),
            )
            .create_async()
            .await;

        let http_client = build_http_client(&config(&server.url(), Some("test_token"))).unwrap();
        let _ = http_client.get("/").await;

        mock.assert_async().await;
    }

    #[test]
    fn test_build_http_client_rejects_invalid_token() {
        let result = build_http_client(&config("https://api.github.com", Some("bad\ntoken")));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_http_client_uses_configured_url() {
        let http_client = build_http_client(&config("https://github.example.com/api/v3", None))
            .unwrap();
        assert_eq!(http_client.api_url(), "https://github.example.com/api/v3");
    }
}
