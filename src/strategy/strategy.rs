//! Strategy lifecycle and the retrieval itself.
//!
//! A strategy goes through two explicit steps before it can fetch:
//!
//! 1. [`FetchStrategyBuilder::build`](super::FetchStrategyBuilder::build)
//!    parses the URL into a [`PendingStrategy`] without any I/O.
//! 2. [`PendingStrategy::validate`] reads the token and checks it against the
//!    hosting API, yielding a [`FetchStrategy`].
//!
//! [`FetchStrategy::fetch`] can then be called any number of times. Each call
//! builds a fresh [`FetchRequest`]; the release asset id is looked up once and
//! kept for the lifetime of the strategy.

use super::config::FetchConfig;
use crate::asset::{resolve_asset, AssetReference};
use crate::credential::{Credential, TokenPlacement};
use crate::error::{Error, Result};
use crate::github::{GitHubClient, ACCEPT_BINARY, ACCEPT_JSON};
use crate::http::create_http_client;
use crate::location::{ArchiveExtension, SourceLocation, Target, Variant};

use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Response, Url};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

/// A parsed strategy whose credential has not been checked yet.
#[derive(Debug, Clone)]
pub struct PendingStrategy {
    url: String,
    name: String,
    version: String,
    location: SourceLocation,
    config: FetchConfig,
}

impl PendingStrategy {
    pub(crate) fn new(
        url: &str,
        name: &str,
        version: &str,
        location: SourceLocation,
        config: FetchConfig,
    ) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            location,
            config,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Reads the token from the configured variable, then validates it.
    ///
    /// A missing token fails before any request is sent.
    pub async fn validate(self) -> Result<FetchStrategy> {
        let credential = Credential::from_env(&self.config.token_env)?;
        self.validate_with(credential).await
    }

    /// Checks that `credential` can see the repository.
    ///
    /// This issues exactly one request against the repository metadata
    /// endpoint.
    pub async fn validate_with(self, credential: Credential) -> Result<FetchStrategy> {
        let http = create_http_client(self.config.http_client_config())?;
        let github = GitHubClient::new(
            http,
            &self.config.api_url,
            credential,
            self.config.auth_scheme,
        );

        let repository = github
            .check_repository_access(self.location.owner(), self.location.repo())
            .await?;
        info!(
            "Token from {} can read {} (private: {})",
            github.credential().source(),
            repository.full_name,
            repository.private
        );

        Ok(FetchStrategy {
            url: self.url,
            name: self.name,
            version: self.version,
            location: self.location,
            config: self.config,
            github,
            asset: OnceCell::new(),
        })
    }
}

/// A validated strategy, ready to fetch.
///
/// One instance is meant to serve one fetch at a time.
pub struct FetchStrategy {
    url: String,
    name: String,
    version: String,
    location: SourceLocation,
    config: FetchConfig,
    github: GitHubClient,
    asset: OnceCell<AssetReference>,
}

impl fmt::Debug for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchStrategy")
            .field("url", &self.url)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("location", &self.location)
            .field("github", &self.github)
            .field("asset", &self.asset.get())
            .finish()
    }
}

impl FetchStrategy {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn variant(&self) -> Variant {
        self.location.variant()
    }

    /// The release asset to download.
    ///
    /// The release metadata is read on the first call only; later calls
    /// return the stored reference.
    pub async fn asset_reference(&self) -> Result<&AssetReference> {
        let (tag, filename) = match (self.location.tag(), self.location.asset_filename()) {
            (Some(tag), Some(filename)) => (tag, filename),
            _ => {
                return Err(Error::Internal(format!(
                    "{} sources have no release asset",
                    self.variant()
                )))
            }
        };

        self.asset
            .get_or_try_init(|| async {
                let release = self
                    .github
                    .release_by_tag(self.location.owner(), self.location.repo(), tag)
                    .await?;
                let asset = resolve_asset(&release, &filename)?;
                debug!("Resolved {} to asset id {}", asset.name, asset.id);
                Ok::<_, Error>(asset)
            })
            .await
    }

    /// Builds the authenticated request for this strategy's variant.
    pub async fn build_request(&self) -> Result<FetchRequest> {
        let owner = self.location.owner();
        let repo = self.location.repo();
        let mut headers = HeaderMap::new();

        let url = match self.location.target() {
            Target::Tree { path } => {
                let mut url = parse_url(&format!(
                    "{}/{}/{}{}",
                    self.config.content_url.trim_end_matches('/'),
                    owner,
                    repo,
                    path.as_deref().unwrap_or_default()
                ))?;
                match self.config.token_placement {
                    TokenPlacement::Header => {
                        headers.insert(AUTHORIZATION, self.github.authorization()?);
                    }
                    TokenPlacement::Url => self.github.credential().embed_in(&mut url)?,
                }
                url
            }
            Target::Archive { tag, extension } => {
                let release = self.github.release_by_tag(owner, repo, tag).await?;
                let archive_url = match extension {
                    ArchiveExtension::TarGz => release.tarball_url,
                    ArchiveExtension::Zip => release.zipball_url,
                };
                let archive_url = archive_url.ok_or_else(|| Error::AssetNotFound {
                    filename: format!("{}{}", tag, extension.as_str()),
                })?;
                headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
                headers.insert(AUTHORIZATION, self.github.authorization()?);
                parse_url(&archive_url)?
            }
            Target::Asset { .. } => {
                let asset = self.asset_reference().await?;
                headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_BINARY));
                headers.insert(AUTHORIZATION, self.github.authorization()?);
                self.github.asset_url(owner, repo, asset.id)?
            }
        };

        Ok(FetchRequest {
            method: Method::GET,
            url,
            headers,
        })
    }

    /// Downloads the artifact to `destination` and returns the number of
    /// bytes written.
    ///
    /// The body goes to a sibling `.part` file first and is renamed onto
    /// `destination` once complete, so a failed fetch leaves `destination`
    /// untouched.
    pub async fn fetch(&self, destination: &Path) -> Result<u64> {
        let FetchRequest {
            method,
            url,
            headers,
        } = self.build_request().await?;

        info!(
            "Fetching {} {} ({})",
            self.name,
            self.version,
            self.variant()
        );
        debug!("Requesting {}", redact(&url));
        let res = self
            .github
            .http()
            .request(method, url)
            .headers(headers)
            .send()
            .await?
            .error_for_status()?;

        let written = self.write_body(res, destination).await?;
        info!("Wrote {} bytes to {:?}", written, destination);
        Ok(written)
    }

    async fn write_body(&self, res: Response, destination: &Path) -> Result<u64> {
        let partial = partial_path(destination)?;
        let dir = destination.parent().filter(|d| !d.as_os_str().is_empty());
        let created = match dir {
            Some(dir) => create_missing_dirs(dir).await?,
            None => None,
        };

        let result = match self.stream_to(res, &partial).await {
            Ok(written) => fs::rename(&partial, destination)
                .await
                .map(|_| written)
                .map_err(Error::from),
            Err(e) => Err(e),
        };

        if result.is_err() {
            discard_partial(&partial).await;
            if let (Some(dir), Some(created)) = (dir, created) {
                remove_created_dirs(dir, &created).await;
            }
        }
        result
    }

    async fn stream_to(&self, res: Response, partial: &Path) -> Result<u64> {
        let pb = self.config.progress.to_progress_bar(res.content_length());
        let mut file = fs::File::create(partial).await?;
        let mut written: u64 = 0;

        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let mut chunk = item?;
            written += chunk.len() as u64;
            pb.inc(chunk.len() as u64);
            file.write_all_buf(&mut chunk).await?;
        }
        file.flush().await?;

        self.config.progress.finish(&pb);
        Ok(written)
    }
}

/// A fully resolved retrieval request.
#[derive(Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl FetchRequest {
    /// The URL with any embedded token masked.
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("method", &self.method)
            .field("url", &self.redacted_url())
            .field("headers", &self.headers)
            .finish()
    }
}

fn redact(url: &Url) -> String {
    let mut url = url.clone();
    if !url.username().is_empty() {
        let _ = url.set_username("***");
    }
    let _ = url.set_password(None);
    url.to_string()
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw)
        .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", raw, e)))
}

/// Creates `dir` and returns the topmost directory that did not exist yet.
async fn create_missing_dirs(dir: &Path) -> Result<Option<PathBuf>> {
    let mut created = None;
    let mut current = Some(dir);
    while let Some(path) = current.filter(|p| !p.as_os_str().is_empty()) {
        if fs::try_exists(path).await? {
            break;
        }
        created = Some(path.to_path_buf());
        current = path.parent();
    }

    if created.is_some() {
        debug!("Creating destination directory {:?}", dir);
        fs::create_dir_all(dir).await?;
    }
    Ok(created)
}

async fn discard_partial(partial: &Path) {
    debug!("Removing incomplete file {:?}", partial);
    match fs::remove_file(partial).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove incomplete file {:?}: {}", partial, e),
    }
}

/// Removes the empty directories between `dir` and `created`, both included.
async fn remove_created_dirs(dir: &Path, created: &Path) {
    for path in dir.ancestors() {
        if let Err(e) = fs::remove_dir(path).await {
            warn!("Could not remove directory {:?}: {}", path, e);
            return;
        }
        if path == created {
            return;
        }
    }
}

fn partial_path(destination: &Path) -> Result<PathBuf> {
    let mut name = destination
        .file_name()
        .ok_or_else(|| {
            Error::Internal(format!("{:?} does not name a file", destination))
        })?
        .to_os_string();
    name.push(".part");
    Ok(destination.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path_is_sibling() {
        let partial = partial_path(Path::new("/tmp/out/widget.tar.gz")).unwrap();
        assert_eq!(partial, PathBuf::from("/tmp/out/widget.tar.gz.part"));
    }

    #[test]
    fn test_partial_path_requires_file_name() {
        assert!(partial_path(Path::new("/")).is_err());
    }

    #[tokio::test]
    async fn test_created_dirs_are_removed_up_to_first_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("a").join("b");

        let created = create_missing_dirs(&dir).await.unwrap();
        assert_eq!(created.as_deref(), Some(temp_dir.path().join("a").as_path()));
        assert!(dir.is_dir());

        remove_created_dirs(&dir, &temp_dir.path().join("a")).await;
        assert!(!temp_dir.path().join("a").exists());
        assert!(temp_dir.path().is_dir());
    }

    #[tokio::test]
    async fn test_existing_dir_is_not_reported_as_created() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert_eq!(create_missing_dirs(temp_dir.path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_discarding_a_missing_partial_is_quiet() {
        let temp_dir = tempfile::tempdir().unwrap();
        discard_partial(&temp_dir.path().join("never.part")).await;
    }

    #[test]
    fn test_redact_hides_user_info() {
        let url = Url::parse("https://s3cr3t@raw.githubusercontent.com/acme/widget/main/x").unwrap();
        let redacted = redact(&url);
        assert!(!redacted.contains("s3cr3t"));
        assert!(redacted.contains("raw.githubusercontent.com/acme/widget/main/x"));
    }

    #[test]
    fn test_request_debug_hides_token() {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_static("token s3cr3t");
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        let request = FetchRequest {
            method: Method::GET,
            url: Url::parse("https://s3cr3t@example.com/a").unwrap(),
            headers,
        };
        assert!(!format!("{:?}", request).contains("s3cr3t"));
    }
}
