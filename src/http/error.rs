//! Classification of failed exchanges into typed errors.

use std::fmt;

use log::debug;
use reqwest::{Method, Response, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// Specific kinds of client-side errors callers may want to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// HTTP 404
    NotFound,
    /// Any other 4xx status
    ClientError,
}

impl ClientErrorKind {
    /// Looks up the kind for a 4xx status, falling back to the generic kind.
    pub fn for_status(status: StatusCode) -> Self {
        STATUS_CODE_TO_KIND
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, kind)| *kind)
            .unwrap_or(ClientErrorKind::ClientError)
    }
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErrorKind::NotFound => write!(f, "Not found"),
            ClientErrorKind::ClientError => write!(f, "Client error"),
        }
    }
}

/// Statuses that get their own [`ClientErrorKind`].
pub static STATUS_CODE_TO_KIND: &[(StatusCode, ClientErrorKind)] =
    &[(StatusCode::NOT_FOUND, ClientErrorKind::NotFound)];

/// A 4xx response turned into an inspectable error.
///
/// The body is captured when the error is built; [`message`](Self::message)
/// and [`details`](Self::details) parse that snapshot.
#[derive(Debug, Error)]
#[error("{kind}: HTTP {status} for {method} {url}")]
pub struct ClientSideError {
    kind: ClientErrorKind,
    status: StatusCode,
    method: Method,
    url: Url,
    body: Vec<u8>,
    #[source]
    source: reqwest::Error,
}

#[derive(Deserialize)]
struct MessageField {
    message: String,
}

/// A GitHub client-error document.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub message: String,
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

/// One entry of the `errors` array of a GitHub client-error document.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FieldError {
    pub resource: Option<String>,
    pub field: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl ClientSideError {
    /// The server's `message` field.
    ///
    /// Fails when the body is not JSON or has no string `message`.
    pub fn message(&self) -> Result<String, serde_json::Error> {
        serde_json::from_slice::<MessageField>(&self.body).map(|field| field.message)
    }

    /// The whole error document, including `documentation_url` and `errors`.
    pub fn details(&self) -> Result<ErrorDetails, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> ClientErrorKind {
        self.kind
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ClientErrorKind::NotFound
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Everything a request through [`HttpClient`](super::HttpClient) can fail with.
#[derive(Debug, Error)]
pub enum RequestError {
    /// No response was obtained: connect failure, timeout, invalid request
    /// or an interrupted body.
    #[error(transparent)]
    Transport(reqwest::Error),

    /// A non-4xx error status, left as reqwest reported it.
    #[error(transparent)]
    Status(reqwest::Error),

    /// A 4xx status.
    #[error(transparent)]
    ClientSide(#[from] ClientSideError),

    /// A successful response whose body did not match the expected type.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl RequestError {
    /// The HTTP status behind this error, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::ClientSide(e) => Some(e.status_code()),
            RequestError::Status(e) => e.status().map(|s| s.as_u16()),
            RequestError::Transport(_) | RequestError::Decode(_) => None,
        }
    }

    pub fn client_error(&self) -> Option<&ClientSideError> {
        match self {
            RequestError::ClientSide(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.client_error().is_some_and(ClientSideError::is_not_found)
    }
}

/// Turns an error response into a [`RequestError`] and passes others through.
///
/// 4xx responses have their body read and become [`RequestError::ClientSide`].
/// Other error statuses become [`RequestError::Status`] carrying the original
/// reqwest error.
#[tracing::instrument(skip(response), fields(status = %response.status()))]
pub async fn classify(method: Method, response: Response) -> Result<Response, RequestError> {
    let status = response.status();
    let source = match response.error_for_status_ref().err() {
        None => return Ok(response),
        Some(source) => source,
    };

    if !status.is_client_error() {
        debug!("HTTP {} left unclassified", status);
        return Err(RequestError::Status(source));
    }

    let kind = ClientErrorKind::for_status(status);
    let url = response.url().clone();
    let body = response
        .bytes()
        .await
        .map_err(RequestError::Transport)?
        .to_vec();

    debug!("HTTP {} for {} {} classified as {:?}", status, method, url, kind);

    Err(RequestError::ClientSide(ClientSideError {
        kind,
        status,
        method,
        url,
        body,
        source,
    }))
}
