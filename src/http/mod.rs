//! HTTP client module with retry injection and client error classification.

mod client;
pub mod defaults;
mod error;
mod retry;
mod transport;

pub use client::HttpClient;
pub use error::{
    ClientErrorKind, ClientSideError, ErrorDetails, FieldError, RequestError, STATUS_CODE_TO_KIND,
    classify,
};
pub use retry::{MAX_RETRIES, RETRY_DELAY_MS, RetryPolicy};
pub use transport::{ReqwestTransport, RetryingTransport, Transport};
