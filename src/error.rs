// src/error.rs
// =============================================================================
// Every way a stub run can go wrong, as one typed enum.
//
// The traversal is best-effort: most of these errors are reported for the
// single file or special directory they belong to and the run carries on.
// Only UnknownItemKind stops everything, because it means the remote API
// handed us something outside the contents contract.
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from the attributes
// - #[source]: keeps the underlying error for the error chain
// =============================================================================

use std::path::PathBuf;

/// Errors raised while listing, resolving or materializing template files.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200 OK.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The body was not a contents item or a list of them.
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// A directory or file could not be created or written.
    #[error("filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No release/version file is known for the project language.
    #[error("{category} file for project language '{language}' hasn't been implemented yet")]
    UnsupportedLanguage {
        category: &'static str,
        language: String,
    },

    /// The contents API returned an item type other than "file" or "dir".
    #[error("unknown item type '{kind}' found at {path}")]
    UnknownItemKind { kind: String, path: String },

    /// A computed contents URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The GitHub token cannot be sent as an HTTP header.
    #[error("GitHub token contains characters that are not allowed in a header")]
    InvalidToken,
}

impl StubError {
    /// True when the error must abort the whole traversal rather than
    /// just the item that produced it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StubError::UnknownItemKind { .. })
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StubError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
