//! Filename sanitization and output path resolution for downloads.

use std::path::{Path, PathBuf};

use super::constants::DEFAULT_EXTENSION;

/// Converts an arbitrary video title into a filesystem-safe file stem.
///
/// Every run of characters outside `[A-Za-z0-9 _]` collapses into a single
/// `-`, then surrounding whitespace is trimmed. Applying it twice yields the
/// same result as applying it once.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_run = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, ' ' | '_') {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out.trim().to_string()
}

/// Default output filename for a title: `<sanitized title>.mp4`.
#[must_use]
pub fn default_filename(title: &str) -> String {
    format!("{}{DEFAULT_EXTENSION}", sanitize_title(title))
}

/// Joins the output directory and filename.
///
/// A missing or empty directory means the current working directory. No
/// filesystem access beyond reading the cwd.
#[must_use]
pub fn resolve_output_path(dir: Option<&Path>, file_name: &str) -> PathBuf {
    let base = dir
        .filter(|d| !d.as_os_str().is_empty())
        .map_or_else(
            || std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            Path::to_path_buf,
        );
    base.join(file_name)
}
