//! GitHub API client implementation

use crate::credential::{AuthScheme, Credential};
use crate::error::{Error, Result};
use crate::github::types::{Release, Repository};

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

/// Base URL of the public GitHub API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Accept header selecting the JSON representation.
pub const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

/// Accept header selecting the raw binary payload of an asset.
///
/// Without it the asset endpoint answers with the asset's JSON metadata.
pub const ACCEPT_BINARY: &str = "application/octet-stream";

/// Authenticated GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    http: ClientWithMiddleware,
    api_url: String,
    credential: Credential,
    scheme: AuthScheme,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("credential", &self.credential)
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(
        http: ClientWithMiddleware,
        api_url: &str,
        credential: Credential,
        scheme: AuthScheme,
    ) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            credential,
            scheme,
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &ClientWithMiddleware {
        &self.http
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Builds the `Authorization` header for this client's scheme.
    pub fn authorization(&self) -> Result<HeaderValue> {
        self.credential.header_value(self.scheme)
    }

    /// Confirms the token can see `owner/repo`.
    ///
    /// A 404 is reported as [`Error::AccessDenied`]. Any other failure is
    /// returned as the transport error it is.
    pub async fn check_repository_access(&self, owner: &str, repo: &str) -> Result<Repository> {
        let url = self.endpoint(&format!("repos/{}/{}", owner, repo))?;
        debug!("Checking access to {}/{}", owner, repo);

        let res = self.get_json(url)?.send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(Error::AccessDenied {
                repository: format!("{}/{}", owner, repo),
                token_env: self.credential.source().to_string(),
            });
        }

        Ok(res.error_for_status()?.json().await?)
    }

    /// Get the release published under `tag`.
    pub async fn release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release> {
        let url = self.endpoint(&format!("repos/{}/{}/releases/tags/{}", owner, repo, tag))?;
        debug!("Fetching release metadata for {}/{}@{}", owner, repo, tag);
        self.api_get(url).await
    }

    /// Download endpoint of the asset `id`.
    pub fn asset_url(&self, owner: &str, repo: &str, id: u64) -> Result<Url> {
        self.endpoint(&format!("repos/{}/{}/releases/assets/{}", owner, repo, id))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.api_url, path);
        Url::parse(&raw)
            .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", raw, e)))
    }

    fn get_json(&self, url: Url) -> Result<RequestBuilder> {
        Ok(self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(ACCEPT_JSON))
            .header(AUTHORIZATION, self.authorization()?))
    }

    async fn api_get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let res = self.get_json(url)?.send().await?;
        Ok(res.error_for_status()?.json().await?)
    }
}
