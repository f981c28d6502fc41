//! Access token handling.
//!
//! The token is read once from a single environment variable and then only
//! ever turned into an `Authorization` header or URL user-info. It is never
//! logged: both the [`Credential`] `Debug` output and the header values it
//! produces are redacted.

use crate::error::{Error, Result};

use reqwest::header::HeaderValue;
use reqwest::Url;
use std::env;
use std::fmt;

/// Environment variable read when none is configured.
pub const DEFAULT_TOKEN_ENV: &str = "HOMEBREW_GITHUB_API_TOKEN";

/// Convention used for the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: token <token>`
    #[default]
    Token,
    /// `Authorization: Bearer <token>`
    Bearer,
}

/// Where the token goes on raw repository content requests.
///
/// API calls always carry the token as a header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenPlacement {
    #[default]
    Header,
    /// Embedded as the user-info part of the URL.
    Url,
}

/// An access token plus the variable it was read from.
#[derive(Clone)]
pub struct Credential {
    token: String,
    source: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

impl Credential {
    /// Creates a credential from a token the caller already holds.
    pub fn new(token: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            source: source.into(),
        }
    }

    /// Reads the token from the environment variable `var`.
    ///
    /// An unset, empty or blank variable is reported as
    /// [`Error::MissingCredential`].
    pub fn from_env(var: &str) -> Result<Self> {
        match env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim(), var)),
            _ => Err(Error::MissingCredential {
                var: var.to_string(),
            }),
        }
    }

    /// Name of the environment variable the token came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Builds the `Authorization` header value for `scheme`.
    pub fn header_value(&self, scheme: AuthScheme) -> Result<HeaderValue> {
        let raw = match scheme {
            AuthScheme::Token => format!("token {}", self.token),
            AuthScheme::Bearer => format!("Bearer {}", self.token),
        };
        let mut value = HeaderValue::from_str(&raw).map_err(|_| {
            Error::Internal(format!(
                "The token in {} is not a valid header value",
                self.source
            ))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Embeds the token as the user-info part of `url`.
    pub fn embed_in(&self, url: &mut Url) -> Result<()> {
        url.set_username(&self.token)
            .map_err(|_| Error::InvalidUrl(format!("Cannot embed a token in \"{}\"", url)))
    }
}
