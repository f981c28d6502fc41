//! GitHub API type definitions

use serde::{Deserialize, Serialize};

/// Repository metadata, as returned by the access check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Release metadata for a single tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tarball_url: Option<String>,
    #[serde(default)]
    pub zipball_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A binary attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_with_only_required_fields() {
        let release: Release = serde_json::from_value(serde_json::json!({
            "tag_name": "v1.0",
            "assets": [{ "id": 7, "name": "widget.tar.gz" }]
        }))
        .unwrap();
        assert_eq!(release.tag_name, "v1.0");
        assert!(release.tarball_url.is_none());
        assert_eq!(release.assets[0].id, 7);
        assert!(release.assets[0].size.is_none());
    }

    #[test]
    fn test_release_without_assets() {
        let release: Release = serde_json::from_value(serde_json::json!({
            "tag_name": "v1.0",
            "tarball_url": "https://api.github.com/repos/acme/widget/tarball/v1.0"
        }))
        .unwrap();
        assert!(release.assets.is_empty());
    }
}
