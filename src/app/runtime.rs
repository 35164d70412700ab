use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};
use vider_dl::{
    CHUNK_SIZE, ChunkedDownloader, DownloadConfig, DownloadReport, ProgressCounter, Resolver,
    TerminalChallengeSolver, ViderResolver,
};

use crate::app::{progress_manager, terminal};
use crate::cli::Args;

/// Resolves the entry in `args` and downloads it.
pub(crate) async fn run_download(args: Args) -> Result<DownloadReport> {
    let no_color = terminal::is_no_color_requested(&args);
    terminal::init_tracing(
        terminal::resolve_default_log_level(args.quiet, args.verbose),
        no_color,
    );

    debug!(?args, "CLI arguments parsed");
    info!(video_url = %args.video_url, "Selected URL");
    if let Some(name) = &args.output_filename {
        info!(filename = %name, "Selected filename");
    }
    if let Some(dir) = &args.output_dir {
        info!(dir = %dir.display(), "Selected directory");
    }

    let resolver = ViderResolver::with_base_urls(&args.site_url, &args.stream_url)?
        .with_captcha_path(&args.captcha_path)
        .with_solver(Arc::new(TerminalChallengeSolver::new()));
    let target = resolver.resolve(&args.video_url).await?;
    info!(resolver = resolver.name(), title = %target.title, "Resolved video");

    let config = DownloadConfig {
        chunk_size: CHUNK_SIZE,
        concurrency: usize::from(args.concurrency),
        connect_timeout: Duration::from_secs(args.connect_timeout),
        read_timeout: Duration::from_secs(args.read_timeout),
    };
    let downloader = ChunkedDownloader::new(config)?;

    let progress = ProgressCounter::new();
    let use_bar = terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );
    let (bar_handle, stop) =
        progress_manager::spawn_progress_ui(use_bar, target.title.clone(), progress.clone());

    let result = downloader
        .download(
            &target,
            args.output_dir.as_deref(),
            args.output_filename.as_deref(),
            &progress,
        )
        .await;

    progress_manager::stop_progress_ui(bar_handle, &stop).await;

    Ok(result?)
}
