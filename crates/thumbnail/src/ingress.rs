//! Turning each ingress shape into a buffered payload.
//!
//! Shared by the HTTP handlers and the `process` command so both surfaces
//! reject the same inputs with the same messages.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures_util::StreamExt;
use std::time::Duration;
use thumbnail_core::config::LimitsConfig;
use thumbnail_core::PipelineError;

use crate::error::ApiError;

/// Build the client used for remote image fetches.
pub fn http_client(limits: &LimitsConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(limits.fetch_timeout_ms))
        .user_agent(concat!("thumbnail/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Decode a JSON string body holding standard base64.
///
/// Whitespace inside the string (line-wrapped base64) is ignored.
pub fn decode_base64_body(body: &[u8]) -> Result<Vec<u8>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MissingBody);
    }
    let encoded: String = serde_json::from_slice(body)?;
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(BASE64.decode(compact)?)
}

/// Fetch a remote image, refusing bodies larger than `max_bytes`.
///
/// A failure while the body is streaming is a stream read failure, the same
/// kind the pipeline reports for an unreadable upload.
pub async fn fetch_reference(
    client: &reqwest::Client,
    url: &str,
    max_bytes: usize,
) -> Result<Vec<u8>, ApiError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ApiError::MissingUrl);
    }

    let fetch_error = |e: reqwest::Error| ApiError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(fetch_error)?
        .error_for_status()
        .map_err(fetch_error)?;

    if let Some(size) = response.content_length() {
        if size > max_bytes as u64 {
            return Err(ApiError::TooLarge { limit: max_bytes });
        }
    }

    let mut data = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| PipelineError::StreamRead(std::io::Error::other(e)))?;
        if data.len() + chunk.len() > max_bytes {
            return Err(ApiError::TooLarge { limit: max_bytes });
        }
        data.extend_from_slice(&chunk);
    }

    tracing::debug!(url, bytes = data.len(), "Fetched remote image");
    Ok(data)
}
