//! Download target, job and completion report types.

use std::fmt;
use std::path::PathBuf;

use super::chunk::{ChunkRange, partition};
use super::constants::MAX_CHUNK_COUNT;
use super::error::DownloadError;
use super::progress::ProgressCounter;

/// A resolved video: its title and direct media URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Human-readable title, used for the default filename.
    pub title: String,
    /// Direct URL of the media file.
    pub url: String,
}

impl DownloadTarget {
    /// Creates a new download target.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Everything needed to fetch one file in chunks.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Media URL.
    pub url: String,
    /// Destination file.
    pub output_path: PathBuf,
    /// Resource size reported by the server.
    pub total_length: u64,
    /// Maximum bytes per range request.
    pub chunk_size: u64,
    /// Ranges partitioning `[0, total_length)`, in offset order.
    pub ranges: Vec<ChunkRange>,
    /// Bytes written so far.
    pub progress: ProgressCounter,
}

impl DownloadJob {
    /// Builds a job and its chunk ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::TooLarge`] when `total_length` would need more
    /// than [`MAX_CHUNK_COUNT`] ranges. Nothing is allocated in that case.
    pub fn new(
        url: impl Into<String>,
        output_path: impl Into<PathBuf>,
        total_length: u64,
        chunk_size: u64,
        progress: ProgressCounter,
    ) -> Result<Self, DownloadError> {
        let url = url.into();
        if total_length.div_ceil(chunk_size.max(1)) > MAX_CHUNK_COUNT {
            return Err(DownloadError::too_large(url, total_length, chunk_size));
        }
        Ok(Self {
            url,
            output_path: output_path.into(),
            total_length,
            chunk_size,
            ranges: partition(total_length, chunk_size),
            progress,
        })
    }
}

/// Summary of a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Title of the downloaded video.
    pub title: String,
    /// Where the file was written.
    pub path: PathBuf,
    /// Bytes written to disk.
    pub bytes_written: u64,
    /// Number of range requests issued.
    pub chunk_count: usize,
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Downloaded {} to {}", self.title, self.path.display())
    }
}
