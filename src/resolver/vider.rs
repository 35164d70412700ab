//! Resolver for vider entry URLs.
//!
//! An entry such as `https://vider.info/vid/+fabc123` carries the video id
//! after the `+`. The embed page for that id holds the title and the file id
//! of the stream; the stream itself lives on a separate host.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::download::DownloadTarget;

use super::captcha::{
    CAPTCHA_IMAGE_PATH, ChallengeScan, ChallengeSolver, TerminalChallengeSolver,
    scan_for_challenge,
};
use super::http_client::default_resolver_http_client;
use super::markup::{collect_tags, decode_entities};
use super::{ResolveError, Resolver};

const DEFAULT_SITE_URL: &str = "https://vider.pl";
const DEFAULT_STREAM_URL: &str = "https://stream.vider.info";

/// Turns vider entry URLs into a title and a stream URL.
pub struct ViderResolver {
    client: Client,
    site_url: String,
    stream_url: String,
    captcha_path: PathBuf,
    solver: Arc<dyn ChallengeSolver>,
}

impl std::fmt::Debug for ViderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViderResolver")
            .field("site_url", &self.site_url)
            .field("stream_url", &self.stream_url)
            .field("captcha_path", &self.captcha_path)
            .finish_non_exhaustive()
    }
}

impl ViderResolver {
    /// Creates a resolver for the public hosts, prompting on the terminal
    /// when challenged.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if client construction fails.
    pub fn new() -> Result<Self, ResolveError> {
        Self::with_base_urls(DEFAULT_SITE_URL, DEFAULT_STREAM_URL)
    }

    /// Creates a resolver with custom hosts (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if client construction fails.
    pub fn with_base_urls(
        site_url: impl Into<String>,
        stream_url: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            client: default_resolver_http_client()?,
            site_url: trim_base(site_url.into()),
            stream_url: trim_base(stream_url.into()),
            captcha_path: PathBuf::from(CAPTCHA_IMAGE_PATH),
            solver: Arc::new(TerminalChallengeSolver::new()),
        })
    }

    /// Saves challenge images to `path` instead of `captcha_image.png`.
    #[must_use]
    pub fn with_captcha_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.captcha_path = path.into();
        self
    }

    /// Replaces the challenge solver.
    #[must_use]
    pub fn with_solver(mut self, solver: Arc<dyn ChallengeSolver>) -> Self {
        self.solver = solver;
        self
    }

    /// Where challenge images are written.
    #[must_use]
    pub fn captcha_path(&self) -> &Path {
        &self.captcha_path
    }

    /// Embed page URL for a video id.
    #[must_use]
    pub fn embed_url(&self, video_id: &str) -> String {
        format!("{}/embed/video/{video_id}", self.site_url)
    }

    /// Stream URL for a file id.
    #[must_use]
    pub fn media_url(&self, file_id: &str) -> String {
        format!("{}/video/{file_id}/v.mp4", self.stream_url)
    }

    /// Checks `html` for a challenge and, if there is one, saves its image.
    ///
    /// Returns `true` when a challenge was found and its image written to
    /// [`captcha_path`](Self::captcha_path).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ChallengeImageMissing`] when the form has no
    /// image, or a network/IO error from fetching or saving the image.
    pub async fn lookup_for_captcha(&self, html: &str) -> Result<bool, ResolveError> {
        let ChallengeScan::Present { image_src } = scan_for_challenge(html) else {
            return Ok(false);
        };
        let Some(src) = image_src else {
            return Err(ResolveError::challenge_image_missing(&self.site_url));
        };

        let image_url = self.absolutize(&src);
        warn!(image_url = %image_url, "captcha challenge presented");
        self.download_captcha(&image_url).await?;
        Ok(true)
    }

    async fn download_captcha(&self, image_url: &str) -> Result<(), ResolveError> {
        let response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| ResolveError::network(image_url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::http(image_url, status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResolveError::network(image_url, &e))?;

        tokio::fs::write(&self.captcha_path, &bytes)
            .await
            .map_err(|e| ResolveError::challenge_io(&self.captcha_path, &e))?;
        debug!(
            path = %self.captcha_path.display(),
            bytes = bytes.len(),
            "captcha image saved"
        );
        Ok(())
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::network(url, &e))?;
        read_page(url, response).await
    }

    async fn submit_answer(&self, url: &str, answer: &str) -> Result<String, ResolveError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("captcha", answer)
            .finish();
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| ResolveError::network(url, &e))?;
        read_page(url, response).await
    }

    fn absolutize(&self, src: &str) -> String {
        Url::parse(&self.site_url)
            .and_then(|base| base.join(src))
            .map_or_else(|_| format!("{}{src}", self.site_url), String::from)
    }
}

#[async_trait]
impl Resolver for ViderResolver {
    fn name(&self) -> &str {
        "vider"
    }

    #[instrument(skip(self), fields(resolver = "vider", entry = %entry))]
    async fn resolve(&self, entry: &str) -> Result<DownloadTarget, ResolveError> {
        let video_id = video_id_from_entry(entry)?;
        let embed_url = self.embed_url(video_id);
        info!(video_id, embed_url = %embed_url, "fetching embed page");

        let mut html = self.fetch_page(&embed_url).await?;
        while self.lookup_for_captcha(&html).await? {
            let answer = self.solver.solve(&self.captcha_path).await?;
            html = self.submit_answer(&embed_url, &answer).await?;
        }

        let title = extract_title(&html).ok_or_else(|| ResolveError::missing_title(&embed_url))?;
        let file_id =
            extract_media_id(&html).ok_or_else(|| ResolveError::missing_media_id(&embed_url))?;
        let media_url = self.media_url(&file_id);

        info!(title = %title, media_url = %media_url, "resolved video");
        Ok(DownloadTarget::new(title, media_url))
    }
}

async fn read_page(url: &str, response: reqwest::Response) -> Result<String, ResolveError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::http(url, status.as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| ResolveError::network(url, &e))
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Extracts the video id: the text between the first and second `+`.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidEntry`] when there is no `+` or the id is
/// empty.
pub fn video_id_from_entry(entry: &str) -> Result<&str, ResolveError> {
    let Some(id) = entry.split('+').nth(1) else {
        return Err(ResolveError::invalid_entry(entry, "missing '+' before video id"));
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(ResolveError::invalid_entry(entry, "empty video id"));
    }
    Ok(id)
}

/// `content` of the first element named `title`, unescaped.
fn extract_title(html: &str) -> Option<String> {
    collect_tags(html)
        .into_iter()
        .find(|tag| tag.has_attr("name", "title"))
        .and_then(|tag| tag.attr("content").map(decode_entities))
        .filter(|title| !title.is_empty())
}

/// `data-file-id` of the player element.
fn extract_media_id(html: &str) -> Option<String> {
    collect_tags(html)
        .into_iter()
        .find(|tag| tag.has_attr("id", "video_player"))
        .and_then(|tag| tag.attr("data-file-id").map(|id| id.trim().to_string()))
        .filter(|id| !id.is_empty())
}
