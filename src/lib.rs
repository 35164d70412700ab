//! vider-dl core library
//!
//! Resolves a vider video entry into a direct media URL and downloads it
//! with concurrent HTTP range requests.
//!
//! # Architecture
//!
//! - [`resolver`] - Embed page scraping and the interactive captcha loop
//! - [`download`] - Chunked parallel downloader, progress counter, filenames
//! - [`headers`] - Browser-like request headers shared by both

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod headers;
pub mod resolver;

// Re-export commonly used types
pub use download::{
    CHUNK_SIZE, ChunkRange, ChunkedDownloader, DEFAULT_CONCURRENCY, DownloadConfig, DownloadError,
    DownloadJob, DownloadReport, DownloadTarget, EngineError, ProgressCounter, default_filename,
    partition, resolve_output_path, sanitize_title,
};
pub use resolver::{
    ChallengeSolver, ResolveError, Resolver, TerminalChallengeSolver, ViderResolver,
};
