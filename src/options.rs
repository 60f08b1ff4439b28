// src/options.rs
// =============================================================================
// The settings for one stub run, plus the contents endpoint they point at.
//
// ResolutionOptions is built once from the command line and never changes
// afterwards. Everything else borrows it (or shares it behind an Arc when a
// spawned task needs it).
//
// ContentsEndpoint knows how to turn "license-files/mit/LICENSE" into a full
// GitHub contents URL, including the ?ref=<branch> query when a non-default
// branch was requested.
// =============================================================================

use std::path::PathBuf;

use url::{ParseError, Url};

use crate::error::StubError;

/// Branch the template repository serves when no `ref` is given.
pub const DEFAULT_BRANCH: &str = "master";

/// Everything the traversal needs to know about the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOptions {
    pub branch_name: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub github_token: Option<String>,
    pub output_directory: PathBuf,
    pub project_language: String,
    pub license_type: String,
    pub include_makefile: bool,
    pub include_version_file: bool,
    pub overwrite_files: bool,
}

/// Base URL of a repository's contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentsEndpoint {
    base: String,
    reference: Option<String>,
}

impl ContentsEndpoint {
    /// Builds `{api_url}/repos/{owner}/{repo}/contents` for the run's repo.
    pub fn for_repository(api_url: &str, options: &ResolutionOptions) -> Self {
        let base = format!(
            "{}/repos/{}/{}/contents",
            api_url.trim_end_matches('/'),
            options.repo_owner,
            options.repo_name
        );

        // The default branch is what the API serves anyway
        let reference = if options.branch_name == DEFAULT_BRANCH || options.branch_name.is_empty()
        {
            None
        } else {
            Some(options.branch_name.clone())
        };

        Self::new(base, reference)
    }

    pub fn new(base: impl Into<String>, reference: Option<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            reference,
        }
    }

    /// Returns the contents URL for `sub_path`.
    ///
    /// Parameters:
    ///   sub_path: path from the repository root, e.g. "license-files/mit/LICENSE"
    ///             ("" for the root itself)
    ///
    /// Returns: the full URL, with the branch query attached when needed
    ///
    /// Each `/`-separated piece of the sub-path becomes one percent-encoded
    /// path segment, so a `#` or `?` in a directory name or language stays
    /// part of the path.
    pub fn url(&self, sub_path: &str) -> Result<Url, StubError> {
        let mut url = Url::parse(&self.base).map_err(|source| StubError::InvalidUrl {
            url: self.base.clone(),
            source,
        })?;

        // Only fails for "mailto:"-style URLs that have no path to extend
        url.path_segments_mut()
            .map_err(|_| StubError::InvalidUrl {
                url: self.base.clone(),
                source: ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(sub_path.split('/').filter(|segment| !segment.is_empty()));

        // The branch query goes on last, after every path segment
        if let Some(reference) = &self.reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }

        Ok(url)
    }
}

#[cfg(test)]
pub(crate) fn test_options(output_directory: impl Into<PathBuf>) -> ResolutionOptions {
    ResolutionOptions {
        branch_name: DEFAULT_BRANCH.to_string(),
        repo_owner: "octo".to_string(),
        repo_name: "template".to_string(),
        github_token: None,
        output_directory: output_directory.into(),
        project_language: "go".to_string(),
        license_type: "mit".to_string(),
        include_makefile: false,
        include_version_file: false,
        overwrite_files: false,
    }
}
