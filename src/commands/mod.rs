use anyhow::Result;

use crate::runtime::Runtime;

pub mod config;
mod get;
pub mod services;

use config::Config;
use services::build_http_client;

/// Fetch an API path and print its JSON body to stdout.
#[tracing::instrument(skip(runtime, api_url, retries))]
pub async fn get<R: Runtime>(
    runtime: R,
    path: &str,
    api_url: Option<String>,
    retries: Option<usize>,
) -> Result<()> {
    let config = Config::new(&runtime, api_url, retries);
    let client = build_http_client(&config)?;
    get::run(&client, path, &mut std::io::stdout()).await
}
