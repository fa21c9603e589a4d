//! HTTP client with injected retries and typed client errors.

use std::sync::Arc;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{RequestError, classify};
use super::retry::RetryPolicy;
use super::transport::{ReqwestTransport, RetryingTransport, Transport};

/// HTTP client for a REST API rooted at `api_url`.
///
/// Every request goes through the transport chain fixed at construction time
/// and every response through [`classify`].
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    transport: Arc<dyn Transport>,
    api_url: String,
}

impl HttpClient {
    /// Creates a client whose requests are retried according to `policy`.
    pub fn new(client: Client, policy: RetryPolicy, api_url: impl Into<String>) -> Self {
        let transport = RetryingTransport::new(ReqwestTransport::new(client.clone()), policy);
        Self::with_transport(client, Arc::new(transport), api_url)
    }

    /// Creates a client that sends through the given transport.
    ///
    /// `client` is only used to build requests.
    pub fn with_transport(
        client: Client,
        transport: Arc<dyn Transport>,
        api_url: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            transport,
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Resolves `path` against the API URL. Absolute URLs are kept as they are.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Starts a request to `path`. Send it with [`send`](Self::send).
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Sends a request and classifies its outcome.
    #[tracing::instrument(skip(self, builder))]
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, RequestError> {
        let request = builder.build().map_err(RequestError::Transport)?;
        let method = request.method().clone();

        debug!("{} {}...", method, request.url());

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(RequestError::Transport)?;

        classify(method, response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response, RequestError> {
        self.send(self.request(Method::GET, path)).await
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let response = self.get(path).await?;
        decode_json(response).await
    }

    /// Sends `body` as JSON and deserializes the JSON response.
    #[tracing::instrument(skip(self, body))]
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path).json(body)).await?;
        decode_json(response).await
    }
}

/// Reads the whole body, then parses it.
///
/// A body that cannot be read is a transport failure; only a body that was
/// read but does not parse is a decode failure.
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    let body = response.bytes().await.map_err(RequestError::Transport)?;
    serde_json::from_slice(&body).map_err(RequestError::Decode)
}
