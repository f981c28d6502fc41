//! Privy fetches source artifacts from private, token-gated GitHub
//! repositories and writes them to a local path.
//!
//! Three addressing schemes are supported, see [`location::Variant`]:
//! a repository tree path, a release archive (`/archive/<tag>.tar.gz`) and
//! a release asset (`/releases/download/<tag>/<file>`).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use privy::{FetchStrategyBuilder, Variant};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), privy::Error> {
//! let strategy = FetchStrategyBuilder::new(Variant::ReleaseArchive)
//!     .token_env("HOMEBREW_GITHUB_API_TOKEN")
//!     .build("https://github.com/acme/widget/archive/v1.0.tar.gz", "widget", "1.0")?
//!     .validate()
//!     .await?;
//! strategy.fetch(Path::new("widget-1.0.tar.gz")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`location`] - Source URL grammars and the parsed [`SourceLocation`]
//! - [`credential`] - Token lookup and `Authorization` header conventions
//! - [`github`] - Repository access check and release metadata
//! - [`asset`] - Release asset selection by file name
//! - [`strategy`] - Strategy lifecycle, request building and the fetch itself
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client functionality
//! - [`progress`] - Transfer progress bar options

pub mod asset;
pub mod credential;
pub mod error;
pub mod github;
pub mod http;
pub mod location;
pub mod progress;
pub mod strategy;

pub use asset::{resolve_asset, AssetReference};
pub use credential::{AuthScheme, Credential, TokenPlacement};
pub use error::{Error, Result};
pub use github::{GitHubClient, Release, ReleaseAsset, Repository};
pub use http::{create_http_client, HttpClientConfig};
pub use location::{SourceLocation, Target, Variant};
pub use progress::ProgressBarOpts;
pub use strategy::{FetchConfig, FetchRequest, FetchStrategy, FetchStrategyBuilder, PendingStrategy};
