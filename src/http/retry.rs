//! Retry policy for low-level request attempts.

use std::time::Duration;

use reqwest::Method;

/// Default number of attempts made for a single request.
pub const MAX_RETRIES: usize = 3;

/// Default delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// How many times a request attempt is made and how long to wait in between.
///
/// The policy is handed to the client once at construction time and shared by
/// every request it makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least one attempt.
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that makes a single attempt.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Returns a copy of this policy with a different attempt count.
    pub fn with_max_attempts(self, max_attempts: usize) -> Self {
        Self::new(max_attempts, self.delay)
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Decides whether a failed attempt may be made again.
    ///
    /// Connect failures never reached the server and are always retryable.
    /// Timeouts may have reached it, so only idempotent methods are retried.
    /// Anything carrying an HTTP status is never retried here.
    pub fn should_retry(&self, method: &Method, error: &reqwest::Error) -> bool {
        if error.status().is_some() {
            return false;
        }
        if error.is_connect() {
            return true;
        }
        error.is_timeout() && is_idempotent(method)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, Duration::from_millis(RETRY_DELAY_MS))
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS | Method::TRACE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), MAX_RETRIES);
        assert_eq!(policy.delay(), Duration::from_millis(RETRY_DELAY_MS));
    }

    #[test]
    fn test_max_attempts_is_clamped() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_no_retry() {
        assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
    }

    #[test]
    fn test_with_max_attempts_keeps_delay() {
        let policy = RetryPolicy::new(2, Duration::from_millis(5)).with_max_attempts(7);
        assert_eq!(policy.max_attempts(), 7);
        assert_eq!(policy.delay(), Duration::from_millis(5));
    }

    #[test]
    fn test_is_idempotent() {
        assert!(is_idempotent(&Method::GET));
        assert!(is_idempotent(&Method::PUT));
        assert!(is_idempotent(&Method::DELETE));
        assert!(!is_idempotent(&Method::POST));
        assert!(!is_idempotent(&Method::PATCH));
    }

    #[tokio::test]
    async fn test_should_retry_connect_error() {
        let err = reqwest::Client::new()
            .get(closed_port_url())
            .send()
            .await
            .unwrap_err();

        let policy = RetryPolicy::default();
        assert!(err.is_connect());
        assert!(policy.should_retry(&Method::GET, &err));
        // Nothing was sent, so even POST is safe to repeat.
        assert!(policy.should_retry(&Method::POST, &err));
    }

    #[tokio::test]
    async fn test_should_not_retry_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("GET", "/").with_status(503).create_async().await;

        let response = reqwest::Client::new().get(server.url()).send().await.unwrap();
        let err = response.error_for_status().unwrap_err();

        assert!(!RetryPolicy::default().should_retry(&Method::GET, &err));
    }

    #[tokio::test]
    async fn test_should_not_retry_builder_error() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();

        assert!(!RetryPolicy::default().should_retry(&Method::GET, &err));
    }
}
