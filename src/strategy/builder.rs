//! Builder pattern implementation for creating fetch strategies.
//!
//! ```rust
//! use privy::credential::AuthScheme;
//! use privy::location::Variant;
//! use privy::strategy::FetchStrategyBuilder;
//!
//! let pending = FetchStrategyBuilder::new(Variant::ReleaseAsset)
//!     .token_env("GITHUB_OAUTH_CREDENTIALS")
//!     .auth_scheme(AuthScheme::Bearer)
//!     .hidden()
//!     .build(
//!         "https://github.com/acme/widget/releases/download/v1.0/widget.tar.gz",
//!         "widget",
//!         "1.0",
//!     )?;
//! assert_eq!(pending.location().repo(), "widget");
//! # Ok::<(), privy::Error>(())
//! ```

use super::config::FetchConfig;
use super::strategy::PendingStrategy;
use crate::credential::{AuthScheme, TokenPlacement};
use crate::error::Result;
use crate::location::{SourceLocation, Variant};
use crate::progress::ProgressBarOpts;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::time::Duration;

/// A builder used to create a [`PendingStrategy`].
#[derive(Debug, Clone)]
pub struct FetchStrategyBuilder {
    variant: Variant,
    config: FetchConfig,
}

impl FetchStrategyBuilder {
    /// Creates a builder for `variant` with the default options.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            config: FetchConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the environment variable the token is read from.
    pub fn token_env(mut self, var: impl Into<String>) -> Self {
        self.config.token_env = var.into();
        self
    }

    /// Sets the base URL of the hosting API.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Sets the base URL used for repository-tree downloads.
    pub fn content_url(mut self, url: impl Into<String>) -> Self {
        self.config.content_url = url.into();
        self
    }

    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.config.auth_scheme = scheme;
        self
    }

    pub fn token_placement(mut self, placement: TokenPlacement) -> Self {
        self.config.token_placement = placement;
        self
    }

    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Sets the transfer progress bar options.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden(self) -> Self {
        self.progress(ProgressBarOpts::hidden())
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// Calling `.headers()` several times merges every map into one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Parses `url` and binds it to `name` and `version`.
    ///
    /// Nothing is read from the environment and no request is sent; call
    /// [`PendingStrategy::validate`] for that.
    pub fn build(self, url: &str, name: &str, version: &str) -> Result<PendingStrategy> {
        let location = SourceLocation::parse(url, self.variant)?;
        Ok(PendingStrategy::new(url, name, version, location, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use reqwest::header::USER_AGENT;

    #[test]
    fn test_build_is_pure() {
        let pending = FetchStrategyBuilder::new(Variant::ReleaseArchive)
            .token_env("PRIVY_BUILDER_UNSET_VARIABLE")
            .build("https://github.com/acme/widget/archive/v1.0.zip", "widget", "1.0")
            .unwrap();
        assert_eq!(pending.name(), "widget");
        assert_eq!(pending.version(), "1.0");
        assert_eq!(pending.location().tag(), Some("v1.0"));
    }

    #[test]
    fn test_build_rejects_wrong_grammar() {
        let err = FetchStrategyBuilder::new(Variant::ReleaseAsset)
            .build("https://github.com/acme/widget", "widget", "1.0")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrlPattern { .. }));
    }

    #[test]
    fn test_headers_merge() {
        let builder = FetchStrategyBuilder::new(Variant::RepositoryTree)
            .header(USER_AGENT, HeaderValue::from_static("pipeline/1"))
            .headers(HeaderMap::from_iter([(
                reqwest::header::FROM,
                HeaderValue::from_static("ci@example.com"),
            )]));
        let headers = builder.config.headers.unwrap();
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_setters() {
        let builder = FetchStrategyBuilder::new(Variant::RepositoryTree)
            .api_url("http://127.0.0.1:9")
            .content_url("http://127.0.0.1:9/raw")
            .auth_scheme(AuthScheme::Bearer)
            .token_placement(TokenPlacement::Url)
            .timeout(Duration::from_secs(3))
            .hidden();
        assert_eq!(builder.config.api_url, "http://127.0.0.1:9");
        assert_eq!(builder.config.content_url, "http://127.0.0.1:9/raw");
        assert_eq!(builder.config.auth_scheme, AuthScheme::Bearer);
        assert_eq!(builder.config.token_placement, TokenPlacement::Url);
        assert_eq!(builder.config.timeout, Some(Duration::from_secs(3)));
        assert!(!builder.config.progress.is_enabled());
    }
}
