//! Constants for the download module (chunking, concurrency, timeouts).

/// Size of a single range request (1 MiB).
pub const CHUNK_SIZE: u64 = 1024 * 1024;

/// Default number of chunk requests in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default concurrency as accepted by the CLI parser.
pub const DEFAULT_CONCURRENCY_ARG: u8 = 10;

/// Most ranges a single job may hold (4 TiB at the default chunk size).
pub const MAX_CHUNK_COUNT: u64 = 1 << 22;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default per-request timeout (5 minutes, one chunk body must arrive within it).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// File extension appended to sanitized titles.
pub const DEFAULT_EXTENSION: &str = ".mp4";
