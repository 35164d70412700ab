//! Error types for resolver operations.
//!
//! Messages follow a What/Why/Fix layout: the first line says what failed,
//! the `Suggestion:` line tells the operator what to try next.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving a video entry.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The entry URL does not contain a video id.
    #[error(
        "invalid video entry '{input}': {reason}\n  Suggestion: Pass the full entry URL, e.g. https://vider.info/vid/+fabc123"
    )]
    InvalidEntry {
        /// The entry as given.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Transport-level failure talking to the site.
    #[error("network error fetching {url}: {message}\n  Suggestion: Check network and try again")]
    Network {
        /// The URL being fetched.
        url: String,
        /// The underlying error, rendered.
        message: String,
    },

    /// The site answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Http {
        /// The URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The page has no title element.
    #[error(
        "video 'title' not found on {url}\n  Suggestion: The video may have been removed or the page layout changed"
    )]
    MissingTitle {
        /// The page that was inspected.
        url: String,
    },

    /// The page has no video player carrying a file id.
    #[error(
        "video 'id' not found on {url}\n  Suggestion: The video may have been removed or the page layout changed"
    )]
    MissingMediaId {
        /// The page that was inspected.
        url: String,
    },

    /// A captcha form is present but its image could not be located.
    #[error("captcha requested on {url} but no captcha image was found")]
    ChallengeImageMissing {
        /// The page that was inspected.
        url: String,
    },

    /// The captcha image could not be saved.
    #[error("failed to save captcha image to {path}: {message}")]
    ChallengeIo {
        /// Where the image was being written.
        path: PathBuf,
        /// The underlying IO error, rendered.
        message: String,
    },

    /// No answer could be obtained from the challenge solver.
    #[error("failed to read captcha answer: {message}")]
    ChallengeInput {
        /// Why no answer was produced.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build resolver HTTP client: {message}")]
    ClientBuild {
        /// The underlying error, rendered.
        message: String,
    },
}

impl ResolveError {
    /// Creates an `InvalidEntry` error.
    #[must_use]
    pub fn invalid_entry(input: &str, reason: &str) -> Self {
        Self::InvalidEntry {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Network` error from a reqwest error.
    #[must_use]
    pub fn network(url: &str, source: &reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            message: source.to_string(),
        }
    }

    /// Creates an `Http` status error.
    #[must_use]
    pub fn http(url: &str, status: u16) -> Self {
        Self::Http {
            url: url.to_string(),
            status,
        }
    }

    /// Creates a `MissingTitle` error.
    #[must_use]
    pub fn missing_title(url: &str) -> Self {
        Self::MissingTitle {
            url: url.to_string(),
        }
    }

    /// Creates a `MissingMediaId` error.
    #[must_use]
    pub fn missing_media_id(url: &str) -> Self {
        Self::MissingMediaId {
            url: url.to_string(),
        }
    }

    /// Creates a `ChallengeImageMissing` error.
    #[must_use]
    pub fn challenge_image_missing(url: &str) -> Self {
        Self::ChallengeImageMissing {
            url: url.to_string(),
        }
    }

    /// Creates a `ChallengeIo` error.
    #[must_use]
    pub fn challenge_io(path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        Self::ChallengeIo {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a `ChallengeInput` error.
    #[must_use]
    pub fn challenge_input(message: impl Into<String>) -> Self {
        Self::ChallengeInput {
            message: message.into(),
        }
    }
}
