//! Error handling for the privy library.
//!
//! Every failure point of a fetch has its own variant. Transport failures
//! coming from reqwest or the middleware stack are wrapped as-is so callers
//! can still inspect the original status code or I/O cause.

use crate::location::Variant;
use std::io;
use thiserror::Error;

/// Errors that can happen when using privy.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A configured endpoint (API or content base) is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration text names no known variant.
    #[error("Unknown variant \"{0}\"")]
    UnknownVariant(String),

    /// The source URL does not match the grammar of its declared variant.
    #[error("Invalid url pattern for {variant}: {url}")]
    InvalidUrlPattern {
        /// The offending URL.
        url: String,
        /// The variant whose grammar was applied.
        variant: Variant,
    },

    /// The token environment variable is unset or empty.
    #[error("Environment variable {var} is required.")]
    MissingCredential {
        /// Name of the expected environment variable.
        var: String,
    },

    /// The hosting API reported the repository as not found for this token.
    #[error(
        "{token_env} can not access the repository: {repository}\n\
         This token may not have permission to access the repository or the url may be incorrect."
    )]
    AccessDenied {
        /// `owner/repo` of the repository that was checked.
        repository: String,
        /// Environment variable the token came from.
        token_env: String,
    },

    /// The release exists but carries nothing under the expected name.
    #[error("Asset file not found: {filename}")]
    AssetNotFound {
        /// The filename that was looked up.
        filename: String,
    },

    /// I/O Error while writing the destination file.
    #[error("I/O error: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    ///
    /// Network failures, non-success HTTP statuses and JSON decoding
    /// failures all land here unmodified.
    #[error("Reqwest error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised while going through the middleware stack.
    #[error("Middleware error: {source}")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Returns `true` for the unclassified transport errors that are passed
    /// through without remapping.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Reqwest { .. } | Error::Middleware { .. })
    }

    /// HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::Reqwest { source } => source.status(),
            Error::Middleware { source } => source.status(),
            _ => None,
        }
    }
}

/// Result type alias for operations that can fail with a privy error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_message_names_repository() {
        let err = Error::AccessDenied {
            repository: "acme/widget".into(),
            token_env: "HOMEBREW_GITHUB_API_TOKEN".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("acme/widget"));
        assert!(msg.contains("HOMEBREW_GITHUB_API_TOKEN"));
        assert!(msg.contains("permission"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_io_error_is_not_transport() {
        let err = Error::from(io::Error::other("disk full"));
        assert!(!err.is_transport());
        assert!(err.status().is_none());
    }
}
