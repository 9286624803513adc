// src/fetch/mod.rs

use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{PipelineError, Result};

/// Shared HTTP client. Every request also carries its own timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .build()
        .map_err(|e| PipelineError::FetchFailure {
            url: String::new(),
            reason: format!("building HTTP client: {}", e),
        })
}

/// Substitute `metric` into a `{metric}` URL template.
pub fn source_url(template: &str, metric: &str) -> Result<Url> {
    let raw = template.replace("{metric}", metric);
    Url::parse(&raw).map_err(|e| PipelineError::FetchFailure {
        url: raw.clone(),
        reason: format!("invalid URL: {}", e),
    })
}

/// GET `url` and return the whole body. No retries: a failed fetch fails
/// the request that asked for it.
#[instrument(level = "info", skip(client), fields(url = %url))]
pub async fn fetch_csv(client: &Client, url: &Url, timeout: Duration) -> Result<Vec<u8>> {
    let start = Instant::now();
    let classify = |e: reqwest::Error| classify_error(url, timeout, e);

    let resp = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(classify)?;

    let status = resp.status();
    if !status.is_success() {
        warn!(%status, "non-success status");
        return Err(PipelineError::FetchFailure {
            url: url.to_string(),
            reason: format!("HTTP status {}", status),
        });
    }

    let body = resp.bytes().await.map_err(classify)?;
    debug!(bytes = body.len(), elapsed = ?start.elapsed(), "fetched");
    Ok(body.to_vec())
}

fn classify_error(url: &Url, timeout: Duration, e: reqwest::Error) -> PipelineError {
    if e.is_timeout() {
        PipelineError::FetchTimeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        PipelineError::FetchFailure {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}
