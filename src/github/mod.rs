// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to the GitHub API.
//
// Currently implements:
// - An HTTP client that attaches the token to every request
// - Listing repository contents (directory or single file)
// - Resolving a file's raw download URL
//
// Rust concepts:
// - Modules: Organizing related functionality
// - Public API: What other parts of the app can use
// =============================================================================

mod client;
mod contents;

pub use client::GitHubClient;
pub use contents::{list_contents, list_url, resolve_download_url, ItemKind, RepositoryItem};
