//! Chunked parallel download of a single media file.
//!
//! # Features
//!
//! - Size discovery from the `Content-Length` of a header-only GET
//! - Output file preallocated to its final size
//! - 1 MiB `Range` requests fetched by a bounded pool of Tokio tasks
//! - Each chunk written at its own offset; no locking on the file
//! - Byte-level progress through a shared [`ProgressCounter`]
//! - Fail-fast: one failed chunk cancels the rest and removes the file
//!
//! # Example
//!
//! ```no_run
//! use vider_dl::download::{ChunkedDownloader, DownloadConfig, ProgressCounter};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = ChunkedDownloader::new(DownloadConfig::default())?;
//! let progress = ProgressCounter::new();
//! let job = downloader
//!     .download_to_path("https://example.com/v.mp4", Path::new("./v.mp4"), &progress)
//!     .await?;
//! println!("wrote {} bytes in {} chunks", job.total_length, job.ranges.len());
//! # Ok(())
//! # }
//! ```

mod chunk;
mod client;
mod constants;
mod engine;
mod error;
mod filename;
mod job;
mod progress;

pub use chunk::{ChunkRange, partition};
pub use client::HttpClient;
pub use constants::{
    CHUNK_SIZE, CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, DEFAULT_CONCURRENCY_ARG,
    MAX_CHUNK_COUNT, MAX_CONCURRENCY, MIN_CONCURRENCY, READ_TIMEOUT_SECS,
};
pub use engine::{ChunkedDownloader, DownloadConfig};
pub use error::{DownloadError, EngineError};
pub use filename::{default_filename, resolve_output_path, sanitize_title};
pub use job::{DownloadJob, DownloadReport, DownloadTarget};
pub use progress::ProgressCounter;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
