//! Progress UI (byte progress bar) for a download run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use vider_dl::ProgressCounter;

const POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Spawns the progress bar when requested.
/// Returns (handle, stop) so the caller can signal stop and await the handle.
/// When `use_bar` is false, returns (None, stop) with stop already true.
pub(crate) fn spawn_progress_ui(
    use_bar: bool,
    title: String,
    progress: ProgressCounter,
) -> (Option<tokio::task::JoinHandle<()>>, Arc<AtomicBool>) {
    if !use_bar {
        return (None, Arc::new(AtomicBool::new(true)));
    }
    let stop = Arc::new(AtomicBool::new(false));
    let handle = spawn_bar_inner(title, progress, Arc::clone(&stop));
    (Some(handle), stop)
}

/// Signals the progress task to stop and waits for it.
///
/// Returns false if the task panicked or was cancelled; the failure is logged
/// at debug level and otherwise ignored.
pub(crate) async fn stop_progress_ui(
    handle: Option<tokio::task::JoinHandle<()>>,
    stop: &AtomicBool,
) -> bool {
    stop.store(true, Ordering::SeqCst);
    let Some(handle) = handle else {
        return true;
    };
    match handle.await {
        Ok(()) => true,
        Err(error) => {
            debug!(error = %error, "progress display task ended abnormally");
            false
        }
    }
}

fn spawn_bar_inner(
    title: String,
    progress: ProgressCounter,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
        );
        bar.set_message(title);

        while !stop.load(Ordering::SeqCst) {
            sync_bar(&bar, &progress);
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        sync_bar(&bar, &progress);
        if progress.is_complete() {
            bar.finish();
        } else {
            bar.abandon();
        }
    })
}

fn sync_bar(bar: &ProgressBar, progress: &ProgressCounter) {
    let total = progress.total();
    if bar.length() != Some(total) {
        bar.set_length(total);
    }
    bar.set_position(progress.written());
}
