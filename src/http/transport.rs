//! Request transports and the retrying decorator.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Request, Response};

use super::retry::RetryPolicy;

/// Performs one request attempt.
///
/// Implementations can be stacked; every layer keeps the same signature so
/// callers are unaffected by what sits underneath.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error>;
}

/// Sends requests with a plain `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        self.client.execute(request).await
    }
}

/// Wraps another transport and repeats failed attempts according to a
/// [`RetryPolicy`].
///
/// Any response that comes back, whatever its status, is returned as is.
/// When the attempts run out the last transport error is returned unchanged.
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    #[tracing::instrument(skip(self, request))]
    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        let max_attempts = self.policy.max_attempts();
        let method = request.method().clone();
        let mut request = request;
        let mut attempt = 1;

        loop {
            let next = if attempt < max_attempts {
                let copy = request.try_clone();
                if copy.is_none() {
                    debug!("Request body cannot be replayed, sending once");
                }
                copy
            } else {
                None
            };

            let err = match self.inner.execute(request).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let next = match next {
                Some(next) if self.policy.should_retry(&method, &err) => next,
                _ => return Err(err),
            };

            warn!(
                "Attempt {}/{} failed ({}), retrying in {}ms...",
                attempt,
                max_attempts,
                err,
                self.policy.delay().as_millis()
            );
            tokio::time::sleep(self.policy.delay()).await;

            request = next;
            attempt += 1;
        }
    }
}
