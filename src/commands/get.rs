use std::io::Write;

use anyhow::{Context, Result};

use crate::http::{HttpClient, RequestError};

/// Fetch `path` and write the pretty-printed JSON body to `out`.
#[tracing::instrument(skip(client, out))]
pub async fn run<W: Write>(client: &HttpClient, path: &str, out: &mut W) -> Result<()> {
    let value = client
        .get_json::<serde_json::Value>(path)
        .await
        .map_err(describe)?;

    let pretty = serde_json::to_string_pretty(&value).context("Failed to format response")?;
    writeln!(out, "{}", pretty).context("Failed to write response")?;
    Ok(())
}

/// Puts the server's message in front of client errors.
fn describe(err: RequestError) -> anyhow::Error {
    match err {
        RequestError::ClientSide(e) => {
            let message = e
                .message()
                .unwrap_or_else(|_| String::from_utf8_lossy(e.body()).into_owned());
            let summary = format!("{} (HTTP {}): {}", e.kind(), e.status_code(), message);
            anyhow::Error::new(e).context(summary)
        }
        other => anyhow::Error::new(other).context("Request failed"),
    }
}
