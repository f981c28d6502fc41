//! Configuration shared by every fetch strategy.
//!
//! All values have defaults matching the public GitHub service, so a
//! pipeline only overrides what its deployment does differently, most
//! often the name of the token variable.
//!
//! ```rust
//! use privy::strategy::FetchConfig;
//!
//! let config = FetchConfig {
//!     token_env: "GITHUB_OAUTH_CREDENTIALS".into(),
//!     ..FetchConfig::default()
//! };
//! assert_eq!(config.api_url, "https://api.github.com");
//! ```

use crate::credential::{AuthScheme, TokenPlacement, DEFAULT_TOKEN_ENV};
use crate::github::DEFAULT_API_URL;
use crate::http::HttpClientConfig;
use crate::progress::ProgressBarOpts;

use reqwest::header::HeaderMap;
use std::time::Duration;

/// Base URL for raw repository content.
pub const DEFAULT_CONTENT_URL: &str = "https://raw.githubusercontent.com";

/// Configuration structure for fetch strategies.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Environment variable holding the access token.
    pub token_env: String,
    /// Base URL of the hosting API.
    pub api_url: String,
    /// Base URL used for repository-tree downloads.
    pub content_url: String,
    /// `Authorization` header convention.
    pub auth_scheme: AuthScheme,
    /// Where the token goes on repository-tree downloads.
    pub token_placement: TokenPlacement,
    /// Custom HTTP headers added to every request.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Per-request timeout handed to the transport.
    pub timeout: Option<Duration>,
    /// Transfer progress bar options.
    pub progress: ProgressBarOpts,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            content_url: DEFAULT_CONTENT_URL.to_string(),
            auth_scheme: AuthScheme::default(),
            token_placement: TokenPlacement::default(),
            headers: None,
            proxy: None,
            timeout: None,
            progress: ProgressBarOpts::default(),
        }
    }
}

impl FetchConfig {
    /// HTTP client settings derived from this configuration.
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            proxy: self.proxy.clone(),
            headers: self.headers.clone(),
            timeout: self.timeout,
        }
    }
}
