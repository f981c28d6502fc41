//! Picking a release asset by name.

use crate::error::{Error, Result};
use crate::github::Release;

/// The asset chosen for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub id: u64,
    pub name: String,
}

/// Returns the first asset of `release` named exactly `filename`.
///
/// Assets are scanned in the order the API listed them, so duplicate names
/// always resolve to the same id.
pub fn resolve_asset(release: &Release, filename: &str) -> Result<AssetReference> {
    release
        .assets
        .iter()
        .find(|asset| asset.name == filename)
        .map(|asset| AssetReference {
            id: asset.id,
            name: asset.name.clone(),
        })
        .ok_or_else(|| Error::AssetNotFound {
            filename: filename.to_string(),
        })
}
