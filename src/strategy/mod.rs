//! Fetch strategies: the operation the install pipeline invokes.
//!
//! A strategy binds one source URL, a logical name and a version. It is
//! built in two steps (parse, then validate) and then fetches the artifact
//! to a caller-supplied path.
//!
//! # Examples
//!
//! ```rust,no_run
//! use privy::location::Variant;
//! use privy::strategy::FetchStrategyBuilder;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), privy::Error> {
//! let strategy = FetchStrategyBuilder::new(Variant::ReleaseAsset)
//!     .build(
//!         "https://github.com/acme/widget/releases/download/v1.0/widget.tar.gz",
//!         "widget",
//!         "1.0",
//!     )?
//!     .validate()
//!     .await?;
//!
//! strategy.fetch(Path::new("widget-1.0.tar.gz")).await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod strategy;

pub use builder::FetchStrategyBuilder;
pub use config::{FetchConfig, DEFAULT_CONTENT_URL};
pub use strategy::{FetchRequest, FetchStrategy, PendingStrategy};
