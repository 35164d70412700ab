//! HTTP client construction for the page resolver.
//!
//! The resolver session needs a cookie store: the captcha answer is bound to
//! the session cookie the site hands out with the first embed page.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::headers::browser_headers;

use super::ResolveError;

/// Default connect timeout for page requests.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout for page requests.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Builds the resolver HTTP client.
///
/// # Errors
///
/// Returns [`ResolveError::ClientBuild`] when client construction fails.
pub fn build_resolver_http_client(
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Client, ResolveError> {
    debug!(?connect_timeout, ?read_timeout, "building resolver HTTP client");
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(read_timeout)
        .cookie_store(true)
        .gzip(true)
        .default_headers(browser_headers())
        .build()
        .map_err(|error| ResolveError::ClientBuild {
            message: error.to_string(),
        })
}

/// Builds the resolver HTTP client with default timeouts.
///
/// # Errors
///
/// Returns [`ResolveError::ClientBuild`] when client construction fails.
pub fn default_resolver_http_client() -> Result<Client, ResolveError> {
    build_resolver_http_client(
        Duration::from_secs(CONNECT_TIMEOUT_SECS),
        Duration::from_secs(READ_TIMEOUT_SECS),
    )
}
