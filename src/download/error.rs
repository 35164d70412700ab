//! Error types for the download module.
//!
//! Every variant carries the URL or path it concerns so a failed chunk can be
//! traced back to its request.

use std::path::PathBuf;

use thiserror::Error;

use super::chunk::ChunkRange;
use super::constants::{MAX_CHUNK_COUNT, MAX_CONCURRENCY, MIN_CONCURRENCY};

/// Errors that can occur while downloading a file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response for the metadata or a chunk request.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The chunk being fetched, if any.
        range: Option<ChunkRange>,
    },

    /// File system error while preallocating or writing the output file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// A range response body did not match the requested range length.
    #[error("chunk {range} of {url} returned {actual_bytes} bytes, expected {expected_bytes}")]
    ChunkLength {
        /// The URL being downloaded.
        url: String,
        /// The requested range.
        range: ChunkRange,
        /// Length of the requested range.
        expected_bytes: u64,
        /// Length of the body actually received.
        actual_bytes: u64,
    },

    /// The reported size needs more range requests than one job may hold.
    #[error(
        "{url} reports {total_length} bytes, more than {MAX_CHUNK_COUNT} chunks of {chunk_size} bytes"
    )]
    TooLarge {
        /// The URL being downloaded.
        url: String,
        /// Size reported by the server.
        total_length: u64,
        /// Bytes per range request.
        chunk_size: u64,
    },

    /// A chunk task panicked or was cancelled unexpectedly.
    #[error("chunk task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl DownloadError {
    /// Creates a network error from a reqwest error, classifying timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error for the metadata request.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            range: None,
        }
    }

    /// Creates an HTTP status error for a chunk request.
    pub fn chunk_status(url: impl Into<String>, status: u16, range: ChunkRange) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            range: Some(range),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a size limit error.
    pub fn too_large(url: impl Into<String>, total_length: u64, chunk_size: u64) -> Self {
        Self::TooLarge {
            url: url.into(),
            total_length,
            chunk_size,
        }
    }

    /// Creates a chunk length mismatch error.
    pub fn chunk_length(url: impl Into<String>, range: ChunkRange, actual_bytes: u64) -> Self {
        Self::ChunkLength {
            url: url.into(),
            range,
            expected_bytes: range.len(),
            actual_bytes,
        }
    }
}

/// Errors raised while configuring the chunked downloader.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Chunk size of zero bytes.
    #[error("invalid chunk size {value}: must be at least 1 byte")]
    InvalidChunkSize {
        /// The invalid value that was provided.
        value: u64,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
