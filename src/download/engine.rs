//! Chunked parallel downloader.
//!
//! The downloader asks the server for the resource size, preallocates the
//! output file, splits it into fixed-size byte ranges and fetches them with a
//! bounded pool of Tokio tasks. Each task writes its chunk at the chunk's
//! offset and then bumps the shared [`ProgressCounter`].
//!
//! # Failure model
//!
//! - The first failing chunk aborts the remaining workers
//! - The call returns only after every worker has stopped
//! - A failed download leaves no partial file behind
//!
//! # Example
//!
//! ```no_run
//! use vider_dl::download::{ChunkedDownloader, DownloadConfig, DownloadTarget, ProgressCounter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = ChunkedDownloader::new(DownloadConfig::default())?;
//! let target = DownloadTarget::new("Some video", "https://stream.vider.info/video/123/v.mp4");
//! let progress = ProgressCounter::new();
//! let report = downloader.download(&target, None, None, &progress).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::chunk::ChunkRange;
use super::client::HttpClient;
use super::constants::{
    CHUNK_SIZE, CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY,
    READ_TIMEOUT_SECS,
};
use super::error::{DownloadError, EngineError};
use super::filename::{default_filename, resolve_output_path};
use super::job::{DownloadJob, DownloadReport, DownloadTarget};
use super::progress::ProgressCounter;

/// Tuning knobs for [`ChunkedDownloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Bytes per range request.
    pub chunk_size: u64,
    /// Maximum range requests in flight (1-100).
    pub concurrency: usize,
    /// TCP connect timeout for every request.
    pub connect_timeout: Duration,
    /// Whole-request timeout, covering one chunk body.
    pub read_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl DownloadConfig {
    /// Checks the values against the allowed ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] or
    /// [`EngineError::InvalidChunkSize`] for out-of-range values.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(EngineError::InvalidConcurrency {
                value: self.concurrency,
            });
        }
        if self.chunk_size == 0 {
            return Err(EngineError::InvalidChunkSize {
                value: self.chunk_size,
            });
        }
        Ok(())
    }
}

/// Downloads a single file with concurrent range requests.
#[derive(Debug, Clone)]
pub struct ChunkedDownloader {
    client: HttpClient,
    config: DownloadConfig,
}

impl ChunkedDownloader {
    /// Creates a downloader with its own HTTP client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is out of range or the
    /// HTTP client cannot be built.
    pub fn new(config: DownloadConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let client = HttpClient::with_timeouts(config.connect_timeout, config.read_timeout)?;
        Self::with_client(client, config)
    }

    /// Creates a downloader around an existing client.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is out of range.
    pub fn with_client(client: HttpClient, config: DownloadConfig) -> Result<Self, EngineError> {
        config.validate()?;
        debug!(
            chunk_size = config.chunk_size,
            concurrency = config.concurrency,
            "creating chunked downloader"
        );
        Ok(Self { client, config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Downloads `target` into `output_dir` (default: cwd).
    ///
    /// The filename is `output_filename` when given, otherwise the sanitized
    /// title with an `.mp4` extension.
    ///
    /// # Errors
    ///
    /// Returns the first [`DownloadError`] hit by the metadata request, the
    /// preallocation, or any chunk. The output file is removed on failure.
    #[instrument(skip(self, target, progress), fields(title = %target.title))]
    pub async fn download(
        &self,
        target: &DownloadTarget,
        output_dir: Option<&Path>,
        output_filename: Option<&str>,
        progress: &ProgressCounter,
    ) -> Result<DownloadReport, DownloadError> {
        let file_name = output_filename
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| default_filename(&target.title), str::to_string);
        let output_path = resolve_output_path(output_dir, &file_name);

        let job = self
            .download_to_path(&target.url, &output_path, progress)
            .await?;

        Ok(DownloadReport {
            title: target.title.clone(),
            path: job.output_path,
            bytes_written: job.progress.written(),
            chunk_count: job.ranges.len(),
        })
    }

    /// Downloads `url` to an explicit path and returns the finished job.
    ///
    /// # Errors
    ///
    /// See [`download`](Self::download).
    #[instrument(skip(self, progress), fields(url = %url, path = %output_path.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        output_path: &Path,
        progress: &ProgressCounter,
    ) -> Result<DownloadJob, DownloadError> {
        let total_length = self.client.content_length(url).await?;
        progress.set_total(total_length);

        let job = DownloadJob::new(
            url,
            output_path,
            total_length,
            self.config.chunk_size,
            progress.clone(),
        )?;

        preallocate(&job.output_path, job.total_length).await?;

        info!(
            total_length,
            chunks = job.ranges.len(),
            concurrency = self.config.concurrency,
            "starting chunked download"
        );

        if let Err(error) = self.run_chunks(&job).await {
            remove_partial_file(&job.output_path).await;
            return Err(error);
        }

        info!(bytes = job.progress.written(), "download complete");
        Ok(job)
    }

    /// Runs the worker pool until every range is written or one fails.
    async fn run_chunks(&self, job: &DownloadJob) -> Result<(), DownloadError> {
        if job.ranges.is_empty() {
            return Ok(());
        }

        let ranges: Arc<[ChunkRange]> = Arc::from(job.ranges.as_slice());
        let next = Arc::new(AtomicUsize::new(0));
        let url: Arc<str> = Arc::from(job.url.as_str());
        let path: Arc<Path> = Arc::from(job.output_path.as_path());
        let workers = self.config.concurrency.min(ranges.len());

        let mut tasks = JoinSet::new();
        for _ in 0..workers {
            tasks.spawn(chunk_worker(
                self.client.clone(),
                Arc::clone(&url),
                Arc::clone(&path),
                Arc::clone(&ranges),
                Arc::clone(&next),
                job.progress.clone(),
            ));
        }

        debug!(workers, "waiting for chunk workers");

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(DownloadError::from).and_then(|result| result);
            if let Err(error) = outcome {
                warn!(error = %error, "chunk failed; cancelling remaining chunks");
                // Aborts and awaits the remaining workers.
                tasks.shutdown().await;
                return Err(error);
            }
        }

        Ok(())
    }
}

/// Pulls ranges off the shared queue until it is empty.
async fn chunk_worker(
    client: HttpClient,
    url: Arc<str>,
    path: Arc<Path>,
    ranges: Arc<[ChunkRange]>,
    next: Arc<AtomicUsize>,
    progress: ProgressCounter,
) -> Result<(), DownloadError> {
    loop {
        let index = next.fetch_add(1, Ordering::SeqCst);
        let Some(&range) = ranges.get(index) else {
            return Ok(());
        };
        fetch_chunk(&client, &url, &path, range, &progress).await?;
    }
}

/// Fetches one range and writes it at its offset in the output file.
#[instrument(level = "debug", skip(client, url, path, progress), fields(range = %range))]
async fn fetch_chunk(
    client: &HttpClient,
    url: &str,
    path: &Path,
    range: ChunkRange,
    progress: &ProgressCounter,
) -> Result<(), DownloadError> {
    let body = client.fetch_range(url, range).await?;

    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    file.seek(std::io::SeekFrom::Start(range.start))
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    file.write_all(&body)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    file.flush().await.map_err(|e| DownloadError::io(path, e))?;

    progress.add_written(range.len());
    debug!(bytes = range.len(), "chunk written");
    Ok(())
}

/// Creates the output file at exactly `total_length` bytes.
///
/// A file that cannot be sized is removed again before the error is returned.
async fn preallocate(path: &Path, total_length: u64) -> Result<(), DownloadError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DownloadError::io(parent, e))?;
    }

    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    if let Err(e) = file.set_len(total_length).await {
        drop(file);
        remove_partial_file(path).await;
        return Err(DownloadError::io(path, e));
    }
    debug!(path = %path.display(), total_length, "preallocated output file");
    Ok(())
}

async fn remove_partial_file(path: &Path) {
    debug!(path = %path.display(), "removing partial file after error");
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to remove partial file");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::download::MAX_CHUNK_COUNT;

    #[test]
    fn test_config_default_values() {
        let config = DownloadConfig::default();
        assert_eq!(config.chunk_size, 1024 * 1024);
        assert_eq!(config.concurrency, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_concurrency() {
        let config = DownloadConfig {
            concurrency: 0,
            ..DownloadConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConcurrency { value: 0 })
        ));
    }

    #[test]
    fn test_config_rejects_concurrency_over_max() {
        let config = DownloadConfig {
            concurrency: 101,
            ..DownloadConfig::default()
        };
        assert!(matches!(
            ChunkedDownloader::new(config),
            Err(EngineError::InvalidConcurrency { value: 101 })
        ));
    }

    #[test]
    fn test_config_rejects_zero_chunk_size() {
        let config = DownloadConfig {
            chunk_size: 0,
            ..DownloadConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidChunkSize { value: 0 })
        ));
    }

    #[test]
    fn test_downloader_keeps_config() {
        let config = DownloadConfig {
            concurrency: 4,
            ..DownloadConfig::default()
        };
        let downloader = ChunkedDownloader::new(config.clone()).unwrap();
        assert_eq!(downloader.config(), &config);
    }

    #[tokio::test]
    async fn test_preallocate_sets_exact_length() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.bin");

        preallocate(&path, 12_345).await.unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 12_345);
    }

    #[tokio::test]
    async fn test_preallocate_truncates_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, vec![1u8; 100]).unwrap();

        preallocate(&path, 10).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0u8; 10]);
    }

    #[tokio::test]
    async fn test_preallocate_failure_leaves_no_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("huge.bin");

        let result = preallocate(&path, u64::MAX).await;

        assert!(matches!(result, Err(DownloadError::Io { .. })), "got {result:?}");
        assert!(!path.exists(), "unsized file must be removed");
    }

    #[tokio::test]
    async fn test_download_rejects_oversized_length_before_touching_disk() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let over_cap = usize::try_from(MAX_CHUNK_COUNT).unwrap() + 1;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; over_cap]))
            .mount(&server)
            .await;

        let downloader = ChunkedDownloader::new(DownloadConfig {
            chunk_size: 1,
            ..DownloadConfig::default()
        })
        .unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.bin");

        let result = downloader
            .download_to_path(&server.uri(), &path, &ProgressCounter::new())
            .await;

        assert!(matches!(result, Err(DownloadError::TooLarge { .. })), "got {result:?}");
        assert!(!path.exists());
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1, "no range request may be sent");
    }

    #[tokio::test]
    async fn test_remove_partial_file_missing_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        remove_partial_file(&dir.path().join("absent.bin")).await;
    }
}
