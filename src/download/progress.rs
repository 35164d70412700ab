//! Shared byte counter observed by progress displays.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct Counters {
    written: AtomicU64,
    total: AtomicU64,
}

/// Progress of a single download, shared between chunk tasks and a display.
///
/// Cloning yields another handle to the same counters. `written` only grows,
/// and only after a chunk's bytes have been flushed to the output file, so it
/// reflects what is on disk rather than what was received.
#[derive(Debug, Clone, Default)]
pub struct ProgressCounter {
    inner: Arc<Counters>,
}

impl ProgressCounter {
    /// Creates a counter with nothing written and an unknown total.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written to the output file so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.inner.written.load(Ordering::SeqCst)
    }

    /// Expected size of the download; 0 until the length is known.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.inner.total.load(Ordering::SeqCst)
    }

    /// True once every expected byte has been written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.written() == self.total()
    }

    pub(crate) fn set_total(&self, total: u64) {
        self.inner.total.store(total, Ordering::SeqCst);
    }

    pub(crate) fn add_written(&self, bytes: u64) {
        self.inner.written.fetch_add(bytes, Ordering::SeqCst);
    }
}
