//! Turns a video entry URL into a [`DownloadTarget`].
//!
//! # Architecture
//!
//! - [`Resolver`] - Async trait implemented by site resolvers
//! - [`ViderResolver`] - Embed page scraping for vider entries
//! - [`ChallengeSolver`] - Answers a CAPTCHA image; [`TerminalChallengeSolver`]
//!   asks the operator
//!
//! # Example
//!
//! ```no_run
//! use vider_dl::resolver::{Resolver, ViderResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ViderResolver::new()?;
//! let target = resolver.resolve("https://vider.info/vid/+fabc123").await?;
//! println!("{} -> {}", target.title, target.url);
//! # Ok(())
//! # }
//! ```

mod captcha;
mod error;
mod http_client;
mod markup;
mod vider;

pub use captcha::{CAPTCHA_IMAGE_PATH, ChallengeSolver, TerminalChallengeSolver};
pub use error::ResolveError;
pub use http_client::build_resolver_http_client;
pub use vider::{ViderResolver, video_id_from_entry};

use async_trait::async_trait;

use crate::download::DownloadTarget;

/// Trait that site resolvers implement.
///
/// # Object Safety
///
/// Uses `async_trait` so the binary can hold a `Box<dyn Resolver>`.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the resolver's name (e.g., "vider").
    fn name(&self) -> &str;

    /// Resolves `entry` to a title and a direct media URL.
    async fn resolve(&self, entry: &str) -> Result<DownloadTarget, ResolveError>;
}
