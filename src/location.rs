//! Source URL recognition.
//!
//! A source URL is read with the grammar of one of three addressing schemes
//! and turned into a [`SourceLocation`]. Matching is purely syntactic: no
//! network access happens here.
//!
//! # Examples
//!
//! ```rust
//! use privy::location::{SourceLocation, Variant};
//!
//! let location = SourceLocation::parse(
//!     "https://github.com/acme/widget/releases/download/v1.0/widget.tar.gz",
//!     Variant::ReleaseAsset,
//! )?;
//! assert_eq!(location.owner(), "acme");
//! assert_eq!(location.repo(), "widget");
//! assert_eq!(location.tag(), Some("v1.0"));
//! assert_eq!(location.asset_filename().as_deref(), Some("widget.tar.gz"));
//! # Ok::<(), privy::Error>(())
//! ```

use crate::error::{Error, Result};

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TREE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://[^/]+/([^/?#\s]+)/([^/?#\s]+)(/\S*)?$")
        .expect("tree pattern is valid")
});

static ARCHIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://[^/]+/([^/?#\s]+)/([^/?#\s]+)/archive/([^/]+?)(\.tar\.gz|\.zip)$")
        .expect("archive pattern is valid")
});

static ASSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://[^/]+/([^/?#\s]+)/([^/?#\s]+)/releases/download/([^/]+)/([^/]+)$")
        .expect("asset pattern is valid")
});

/// The addressing scheme a source URL is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `https://<host>/<owner>/<repo>[/<path>]`
    RepositoryTree,
    /// `https://<host>/<owner>/<repo>/archive/<tag>(.tar.gz|.zip)`
    ReleaseArchive,
    /// `https://<host>/<owner>/<repo>/releases/download/<tag>/<filename>`
    ReleaseAsset,
}

impl Variant {
    /// All variants, in declaration order.
    pub const ALL: [Variant; 3] = [
        Variant::RepositoryTree,
        Variant::ReleaseArchive,
        Variant::ReleaseAsset,
    ];

    /// Name used in configuration and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::RepositoryTree => "repository-tree",
            Variant::ReleaseArchive => "release-archive",
            Variant::ReleaseAsset => "release-asset",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::UnknownVariant(s.to_string()))
    }
}

/// File extension of a release archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveExtension {
    TarGz,
    Zip,
}

impl ArchiveExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveExtension::TarGz => ".tar.gz",
            ArchiveExtension::Zip => ".zip",
        }
    }

    fn from_match(s: &str) -> Self {
        if s == ".zip" {
            ArchiveExtension::Zip
        } else {
            ArchiveExtension::TarGz
        }
    }
}

/// Variant-specific part of a [`SourceLocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Optional trailing path, kept verbatim with its leading `/`.
    Tree { path: Option<String> },
    /// Release tag plus the archive extension from the URL.
    Archive {
        tag: String,
        extension: ArchiveExtension,
    },
    /// Release tag plus the asset file name.
    Asset { tag: String, filename: String },
}

/// Where an artifact lives on the hosting service.
///
/// Built once by [`SourceLocation::parse`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    owner: String,
    repo: String,
    target: Target,
}

impl SourceLocation {
    /// Reads `url` with the grammar of `variant`.
    pub fn parse(url: &str, variant: Variant) -> Result<Self> {
        let invalid = || Error::InvalidUrlPattern {
            url: url.to_string(),
            variant,
        };

        let pattern = match variant {
            Variant::RepositoryTree => &*TREE_PATTERN,
            Variant::ReleaseArchive => &*ARCHIVE_PATTERN,
            Variant::ReleaseAsset => &*ASSET_PATTERN,
        };
        let caps = pattern.captures(url).ok_or_else(invalid)?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

        let owner = group(1).ok_or_else(invalid)?;
        let repo = group(2).ok_or_else(invalid)?;

        let target = match variant {
            Variant::RepositoryTree => Target::Tree { path: group(3) },
            Variant::ReleaseArchive => Target::Archive {
                tag: group(3).ok_or_else(invalid)?,
                extension: ArchiveExtension::from_match(&group(4).ok_or_else(invalid)?),
            },
            Variant::ReleaseAsset => Target::Asset {
                tag: group(3).ok_or_else(invalid)?,
                filename: group(4).ok_or_else(invalid)?,
            },
        };

        Ok(Self {
            owner,
            repo,
            target,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The variant this location was parsed with.
    pub fn variant(&self) -> Variant {
        match self.target {
            Target::Tree { .. } => Variant::RepositoryTree,
            Target::Archive { .. } => Variant::ReleaseArchive,
            Target::Asset { .. } => Variant::ReleaseAsset,
        }
    }

    /// Release tag, for the two release variants.
    pub fn tag(&self) -> Option<&str> {
        match &self.target {
            Target::Tree { .. } => None,
            Target::Archive { tag, .. } | Target::Asset { tag, .. } => Some(tag),
        }
    }

    /// Trailing repository path, for the tree variant.
    pub fn path(&self) -> Option<&str> {
        match &self.target {
            Target::Tree { path } => path.as_deref(),
            _ => None,
        }
    }

    /// Name of the file to look up in the release metadata.
    ///
    /// For archives this is `tag + extension`.
    pub fn asset_filename(&self) -> Option<String> {
        match &self.target {
            Target::Tree { .. } => None,
            Target::Archive { tag, extension } => Some(format!("{}{}", tag, extension.as_str())),
            Target::Asset { filename, .. } => Some(filename.clone()),
        }
    }
}
