// src/core/net.rs

// Blocking HTTPS GET. The only place the pipeline waits on the network;
// retries and scheduling belong to whoever runs us.

use std::time::Duration;

use tracing::debug;

use crate::config::SourceOptions;
use crate::error::ScrapeError;

pub fn http_get(src: &SourceOptions) -> Result<String, ScrapeError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(&src.user_agent)
        .timeout(Duration::from_secs(src.timeout_secs))
        .build()?;

    let resp = client.get(&src.url).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::Fetch(format!("HTTP {} for {}", status, src.url)));
    }
    let body = resp.text()?;
    debug!("GET {} -> {} ({} bytes)", src.url, status, body.len());
    Ok(body)
}
