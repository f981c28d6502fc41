//! Hosting API access.
//!
//! This module talks to the GitHub REST API to:
//! - confirm a token can see a repository
//! - read release metadata for a tag
//! - build asset download endpoints

pub mod client;
pub mod types;

pub use client::{GitHubClient, ACCEPT_BINARY, ACCEPT_JSON, DEFAULT_API_URL};
pub use types::{Release, ReleaseAsset, Repository};
