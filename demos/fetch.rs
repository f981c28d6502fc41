//! Fetch a single artifact from a private repository.
//!
//! ```text
//! HOMEBREW_GITHUB_API_TOKEN=... RUST_LOG=privy=debug \
//!     cargo run --example fetch -- release-asset \
//!     https://github.com/acme/widget/releases/download/v1.0/widget.tar.gz widget.tar.gz
//! ```

use color_eyre::{eyre::eyre, Result};
use privy::{FetchStrategyBuilder, Variant};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (variant, url, dest) = match (args.next(), args.next(), args.next()) {
        (Some(v), Some(u), Some(d)) => (v.parse::<Variant>()?, u, PathBuf::from(d)),
        _ => return Err(eyre!("usage: fetch <variant> <url> <destination>")),
    };

    let name = dest
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact")
        .to_string();

    let strategy = FetchStrategyBuilder::new(variant)
        .build(&url, &name, "0")?
        .validate()
        .await?;
    let written = strategy.fetch(&dest).await?;

    println!("Fetched {} bytes into {}", written, dest.display());
    Ok(())
}
