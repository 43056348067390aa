use std::time::Duration;

use url::Url;

/// Result of fetching a URL
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub body: Vec<u8>,
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub content_type: String,
}

/// Error during fetch
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("client error: {0}")]
    Client(String),
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("failed to read body: {0}")]
    Body(String),
}

fn client(timeout: Duration) -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("brand-showroom/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

fn request_error(e: reqwest::Error, timeout: Duration) -> FetchError {
    if e.is_timeout() {
        FetchError::TimedOut(timeout)
    } else {
        FetchError::Request(e.to_string())
    }
}

/// Fetch a URL and return its body (blocking). Non-2xx is an error.
pub fn fetch_bytes(url: &Url, timeout: Duration) -> Result<FetchResult, FetchError> {
    let response = client(timeout)?
        .get(url.as_str())
        .send()
        .map_err(|e| request_error(e, timeout))?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        return Err(FetchError::Status(status));
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let final_url = response.url().to_string();

    let body = response
        .bytes()
        .map_err(|e| FetchError::Body(e.to_string()))?
        .to_vec();

    Ok(FetchResult {
        body,
        url: final_url,
        status,
        content_type,
    })
}

/// Presence check: `HEAD` the URL and succeed on any 2xx.
pub fn head(url: &Url, timeout: Duration) -> Result<u16, FetchError> {
    let response = client(timeout)?
        .head(url.as_str())
        .send()
        .map_err(|e| request_error(e, timeout))?;
    let status = response.status().as_u16();
    if response.status().is_success() {
        Ok(status)
    } else {
        Err(FetchError::Status(status))
    }
}
