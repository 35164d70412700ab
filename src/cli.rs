//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use vider_dl::download::{CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY_ARG, READ_TIMEOUT_SECS};
use vider_dl::resolver::CAPTCHA_IMAGE_PATH;

/// Download a video from vider.
///
/// The entry URL looks like `https://vider.info/vid/+fabc123`. The video is
/// fetched with parallel range requests and saved as `<title>.mp4` unless a
/// filename is given.
#[derive(Parser, Debug)]
#[command(name = "vider-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Video entry URL (the id follows the '+')
    pub video_url: String,

    /// Directory to save the video in (default: current directory)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Filename to save the video as (default: sanitized title + .mp4)
    #[arg(short = 'f', long)]
    pub output_filename: Option<String>,

    /// Maximum concurrent range requests (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY_ARG, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Connect timeout in seconds for each request
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout: u64,

    /// Per-request timeout in seconds, covering one chunk body
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub read_timeout: u64,

    /// Base URL of the site serving embed pages
    #[arg(long, default_value = "https://vider.pl")]
    pub site_url: String,

    /// Base URL of the stream host
    #[arg(long, default_value = "https://stream.vider.info")]
    pub stream_url: String,

    /// Where to save the captcha image when challenged
    #[arg(long, default_value = CAPTCHA_IMAGE_PATH)]
    pub captcha_path: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}
