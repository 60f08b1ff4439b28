// src/github/contents.rs
// =============================================================================
// Reads the GitHub "contents" API.
//
// GET /repos/{owner}/{repo}/contents/{path} returns:
// - a JSON array of items when {path} is a directory
// - a single JSON object when {path} is a file
//
// Both shapes are normalised to a Vec here, so callers never care which one
// they got. A single object is treated exactly like a one-element array.
//
// Two entry points:
// - list_contents(): the Content Lister, used to walk directories
// - resolve_download_url(): the File Resolver, used by the special
//   directories, which know where a file lives but not its raw URL yet
// =============================================================================

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::client::GitHubClient;
use crate::error::StubError;
use crate::options::ContentsEndpoint;

/// The kind of a tree entry, as reported in the item's `type` field.
///
/// Anything other than "file" or "dir" (symlinks, submodules, ...) is kept
/// as `Other` so the traversal can refuse it with the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ItemKind {
    File,
    Directory,
    Other(String),
}

impl From<String> for ItemKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "file" => ItemKind::File,
            "dir" => ItemKind::Directory,
            _ => ItemKind::Other(kind),
        }
    }
}

/// One entry of a contents listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Base name, e.g. "ci.yml"
    pub name: String,
    /// Path from the repository root, e.g. "sub/bar.txt"
    pub path: String,
    /// Raw file URL. GitHub sends null for directories.
    #[serde(default)]
    pub download_url: Option<String>,
}

// The File Resolver only needs this one field
#[derive(Debug, Deserialize)]
struct FileMetadata {
    #[serde(default)]
    download_url: Option<String>,
}

// Lists one directory of the template repository
//
// Parameters:
//   client: the shared GitHub client (borrowed)
//   endpoint: the repository's contents API root
//   sub_path: directory relative to the repository root ("" for the root)
//
// Returns: the directory's items, in the order GitHub lists them
//
// Example:
//   sub_path = "workflow-files/go"
//   -> GET {endpoint}/workflow-files/go -> [ci.yml, release.yml]
pub async fn list_contents(
    client: &GitHubClient,
    endpoint: &ContentsEndpoint,
    sub_path: &str,
) -> Result<Vec<RepositoryItem>, StubError> {
    let url = endpoint.url(sub_path)?;
    list_url(client, &url).await
}

/// Lists an already-built contents URL.
pub async fn list_url(client: &GitHubClient, url: &Url) -> Result<Vec<RepositoryItem>, StubError> {
    debug!(%url, "listing contents");
    let body = client.get_bytes(url).await?;
    decode_one_or_many(url.as_str(), &body)
}

/// Fetches a file's metadata and returns its raw download URL.
pub async fn resolve_download_url(client: &GitHubClient, url: &Url) -> Result<Url, StubError> {
    debug!(%url, "resolving download url");
    let body = client.get_bytes(url).await?;
    let items: Vec<FileMetadata> = decode_one_or_many(url.as_str(), &body)?;

    let download_url = items
        .into_iter()
        .next()
        .and_then(|item| item.download_url)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| StubError::Decode {
            url: url.to_string(),
            reason: "response has no download_url".to_string(),
        })?;

    Url::parse(&download_url).map_err(|source| StubError::InvalidUrl {
        url: download_url,
        source,
    })
}

/// Parses `body` as an array of `T`, falling back to a single `T`.
pub fn decode_one_or_many<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<Vec<T>, StubError> {
    if let Ok(items) = serde_json::from_slice::<Vec<T>>(body) {
        return Ok(items);
    }

    serde_json::from_slice::<T>(body)
        .map(|item| vec![item])
        .map_err(|e| StubError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
