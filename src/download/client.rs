//! HTTP client wrapper for metadata and range requests.
//!
//! This module provides the `HttpClient` struct used by the chunked
//! downloader. It is created once per run and cloned into chunk tasks so all
//! requests share one connection pool.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, HeaderMap, RANGE};
use tracing::{debug, instrument, warn};
use url::Url;

use super::chunk::ChunkRange;
use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::{DownloadError, EngineError};
use crate::headers::download_headers;

/// HTTP client for media downloads.
///
/// Every request carries the browser headers with caching disabled. Response
/// decompression is off so range offsets address the stored bytes.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default timeouts (30s connect, 5min per request).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ClientBuild`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_timeouts(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            Duration::from_secs(READ_TIMEOUT_SECS),
        )
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ClientBuild`] if the TLS backend cannot be initialized.
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, EngineError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .gzip(false)
            .default_headers(download_headers())
            .build()
            .map_err(EngineError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Asks the server for the resource size.
    ///
    /// Sends a GET and reads only the response headers. A missing or
    /// unparseable `Content-Length` is reported as 0.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails, or
    /// the server answers with a non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn content_length(&self, url: &str) -> Result<u64, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let total = parse_content_length(response.headers()).unwrap_or_else(|| {
            warn!("server did not report a content length; treating resource as empty");
            0
        });
        debug!(total, "resolved content length");
        // Body is dropped unread.
        Ok(total)
    }

    /// Fetches one byte range and returns its body.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` on transport failure, non-success status, or a
    /// body whose length differs from the requested range.
    #[instrument(level = "debug", skip(self), fields(url = %url, range = %range))]
    pub async fn fetch_range(&self, url: &str, range: ChunkRange) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .header(RANGE, range.header_value())
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::chunk_status(url, status.as_u16(), range));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let received = body.len() as u64;
        if received != range.len() {
            return Err(DownloadError::chunk_length(url, range, received));
        }

        Ok(Vec::from(body))
    }
}

/// Reads `Content-Length` as a byte count.
pub(crate) fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_content_length_present() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("5242880"));
        assert_eq!(parse_content_length(&headers), Some(5_242_880));
    }

    #[test]
    fn test_parse_content_length_missing() {
        assert_eq!(parse_content_length(&HeaderMap::new()), None);
    }

    #[test]
    fn test_parse_content_length_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(parse_content_length(&headers), None);
    }

    #[tokio::test]
    async fn test_content_length_reads_header() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/v.mp4", mock_server.uri());
        assert_eq!(client.content_length(&url).await.unwrap(), 4096);
    }

    #[tokio::test]
    async fn test_content_length_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.mp4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/gone.mp4", mock_server.uri());
        let result = client.content_length(&url).await;
        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus {
                status: 404,
                range: None,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_content_length_invalid_url() {
        let client = HttpClient::new().unwrap();
        let result = client.content_length("not-a-valid-url").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_fetch_range_sends_range_and_no_cache_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v.mp4"))
            .and(header("range", "bytes=10-19"))
            .and(header("cache-control", "no-cache"))
            .and(header("pragma", "no-cache"))
            .respond_with(ResponseTemplate::new(206).set_body_bytes(b"0123456789".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/v.mp4", mock_server.uri());
        let body = client
            .fetch_range(&url, ChunkRange::new(10, 19))
            .await
            .unwrap();
        assert_eq!(body, b"0123456789");
    }

    #[tokio::test]
    async fn test_fetch_range_rejects_short_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v.mp4"))
            .respond_with(ResponseTemplate::new(206).set_body_bytes(b"0123".to_vec()))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/v.mp4", mock_server.uri());
        let result = client.fetch_range(&url, ChunkRange::new(0, 9)).await;
        assert!(matches!(
            result,
            Err(DownloadError::ChunkLength {
                expected_bytes: 10,
                actual_bytes: 4,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_fetch_range_error_status_carries_range() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v.mp4"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/v.mp4", mock_server.uri());
        let range = ChunkRange::new(0, 9);
        let result = client.fetch_range(&url, range).await;
        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 500, range: Some(r), .. }) if r == range
        ));
    }
}
