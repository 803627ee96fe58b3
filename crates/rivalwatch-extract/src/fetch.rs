//! Static page fetch over plain HTTP

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::ExtractError;

/// Build the shared HTTP client; redirects are followed by default
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, ExtractError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| ExtractError::Request(e.to_string()))
}

/// GET `url` and return the body of a 2xx response
pub(crate) async fn fetch_html(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<String, ExtractError> {
    debug!("Fetching: {}", url);

    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            ExtractError::Timeout(timeout.as_secs())
        } else {
            ExtractError::Request(e.to_string())
        }
    };

    let response = client.get(url).send().await.map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        debug!("HTTP {} for {}", status, url);
        return Err(ExtractError::HttpStatus(status.as_u16()));
    }

    response.text().await.map_err(classify)
}
