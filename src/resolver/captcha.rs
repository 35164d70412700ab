//! CAPTCHA challenge detection and operator prompting.
//!
//! The embed page sometimes answers with a challenge form instead of the
//! player. The form is recognised by its text input; the image sits next to
//! it and must be shown to a human, who types the answer back.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::ResolveError;
use super::markup::collect_tags;

/// Default location the challenge image is saved to.
pub const CAPTCHA_IMAGE_PATH: &str = "captcha_image.png";

const CAPTCHA_INPUT_NAME: &str = "captcha";
const CAPTCHA_PLACEHOLDER: &str = "Wpisz kod z obrazka...";
const CAPTCHA_IMAGE_MARKER: &str = "/streaming/ca-pt";

/// What a page says about a pending challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChallengeScan {
    /// No challenge form on the page.
    Absent,
    /// Challenge form found; `image_src` is the image path if present.
    Present { image_src: Option<String> },
}

/// Looks for the challenge form and its image in `html`.
pub(crate) fn scan_for_challenge(html: &str) -> ChallengeScan {
    let tags = collect_tags(html);

    let has_form = tags.iter().any(|tag| {
        tag.name == "input"
            && tag.has_attr("name", CAPTCHA_INPUT_NAME)
            && tag.has_attr("placeholder", CAPTCHA_PLACEHOLDER)
    });
    if !has_form {
        return ChallengeScan::Absent;
    }

    let image_src = tags
        .iter()
        .filter(|tag| tag.name == "img")
        .filter_map(|tag| tag.attr("src"))
        .find(|src| src.contains(CAPTCHA_IMAGE_MARKER))
        .map(str::to_string);

    ChallengeScan::Present { image_src }
}

/// Produces an answer for a saved challenge image.
///
/// Implemented by the terminal prompt in the binary and by canned solvers in
/// tests.
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Returns the text shown in the image at `image_path`.
    async fn solve(&self, image_path: &Path) -> Result<String, ResolveError>;
}

/// Asks the operator on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalChallengeSolver;

impl TerminalChallengeSolver {
    /// Creates a terminal solver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChallengeSolver for TerminalChallengeSolver {
    async fn solve(&self, image_path: &Path) -> Result<String, ResolveError> {
        let banner = format!(
            "{rule}\nYou've been blocked, please solve the captcha.\nThe captcha is located in the {path} file.\n{rule}",
            rule = "-".repeat(40),
            path = image_path.display(),
        );

        let answer = tokio::task::spawn_blocking(move || -> std::io::Result<Option<String>> {
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{banner}")?;
            write!(stderr, "Captcha text: ")?;
            stderr.flush()?;

            let mut line = String::new();
            let read = std::io::stdin().read_line(&mut line)?;
            Ok((read > 0).then(|| line.trim().to_string()))
        })
        .await
        .map_err(|e| ResolveError::challenge_input(e.to_string()))?
        .map_err(|e| ResolveError::challenge_input(e.to_string()))?;

        match answer {
            Some(text) => {
                debug!(chars = text.len(), "captcha answer read");
                Ok(text)
            }
            None => Err(ResolveError::challenge_input(
                "standard input closed before an answer was given",
            )),
        }
    }
}
