// src/scaffold/special.rs
// =============================================================================
// The "special" directories of a template repository.
//
// These directories are never copied as-is. Each one holds variants of a
// single well-known file, and the run's options pick which variant lands in
// the project:
//
//   license-files/mit/LICENSE      -> LICENSE           (by license type)
//   ignore-files/go/.gitignore     -> .gitignore        (by language)
//   workflow-files/go/*.yml        -> .github/workflows (by language)
//   ...
//
// Working out *what* to fetch is pure (SpecialDir::plan) and is tested
// without a network. Fetching and saving happens in resolve().
// =============================================================================

use futures::future::join_all;
use tracing::{debug, info};

use super::save::{destination_for, save_file};
use super::traverse::Scaffolder;
use crate::error::StubError;
use crate::github::{list_url, resolve_download_url, ItemKind};
use crate::options::ResolutionOptions;

const GO_LANG: &str = "go";
const GORELEASER: &str = "goreleaser.yaml";
const VERSION_GO: &str = "version.go";
const YML: &str = ".yml";

/// Directory names that resolve to parameterized files instead of being
/// mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialDir {
    IgnoreFiles,
    LicenseFiles,
    MakeFiles,
    ReadmeFiles,
    TodoFiles,
    ReleaseFiles,
    VersionFiles,
    VscodeFiles,
    WorkflowFiles,
}

/// What a special directory turns into for a given set of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing to do; the reason is logged.
    Skip(&'static str),
    /// Resolve one file at `content_path` and save it to `destination`
    /// (relative to the output directory).
    Single {
        content_path: String,
        destination: String,
    },
    /// List `listing_path` and save every `.yml` file under
    /// `.github/workflows/`.
    Workflows { listing_path: String },
}

impl SpecialDir {
    pub const ALL: [SpecialDir; 9] = [
        SpecialDir::IgnoreFiles,
        SpecialDir::LicenseFiles,
        SpecialDir::MakeFiles,
        SpecialDir::ReadmeFiles,
        SpecialDir::TodoFiles,
        SpecialDir::ReleaseFiles,
        SpecialDir::VersionFiles,
        SpecialDir::VscodeFiles,
        SpecialDir::WorkflowFiles,
    ];

    /// Exact, case-sensitive match on the directory name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.dir_name() == name)
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            SpecialDir::IgnoreFiles => "ignore-files",
            SpecialDir::LicenseFiles => "license-files",
            SpecialDir::MakeFiles => "make-files",
            SpecialDir::ReadmeFiles => "readme-files",
            SpecialDir::TodoFiles => "todo-files",
            SpecialDir::ReleaseFiles => "release-files",
            SpecialDir::VersionFiles => "version-files",
            SpecialDir::VscodeFiles => "vscode-files",
            SpecialDir::WorkflowFiles => "workflow-files",
        }
    }

    /// Works out the content path and destination for these options.
    pub fn plan(self, options: &ResolutionOptions) -> Result<Plan, StubError> {
        let dir = self.dir_name();
        let language = options.project_language.as_str();
        let license = options.license_type.as_str();

        let single = |content_path: String, destination: &str| Plan::Single {
            content_path,
            destination: destination.to_string(),
        };

        let plan = match self {
            SpecialDir::IgnoreFiles => {
                single(format!("{}/{}/.gitignore", dir, language), ".gitignore")
            }
            SpecialDir::LicenseFiles => single(format!("{}/{}/LICENSE", dir, license), "LICENSE"),
            SpecialDir::MakeFiles => {
                if !options.include_makefile {
                    return Ok(Plan::Skip("makefile not requested"));
                }
                single(format!("{}/{}/Makefile", dir, language), "Makefile")
            }
            SpecialDir::ReadmeFiles => {
                single(format!("{}/{}/README.md", dir, license), "README.md")
            }
            SpecialDir::TodoFiles => single(format!("{}/{}/TODO", dir, language), "TODO"),
            SpecialDir::ReleaseFiles => match release_filename(language)? {
                None => Plan::Skip("no project language"),
                Some(file) => single(
                    format!("{}/{}/{}", dir, language, file),
                    &format!(".{}", file),
                ),
            },
            SpecialDir::VersionFiles => {
                if !options.include_version_file {
                    return Ok(Plan::Skip("version file not requested"));
                }
                match version_filename(language)? {
                    None => Plan::Skip("no project language"),
                    Some(file) => single(format!("{}/{}/{}", dir, language, file), file),
                }
            }
            SpecialDir::VscodeFiles => single(
                format!("{}/commands.json", dir),
                ".vscode/commands.json",
            ),
            SpecialDir::WorkflowFiles => Plan::Workflows {
                listing_path: format!("{}/{}", dir, language),
            },
        };

        Ok(plan)
    }

    /// Fetches and saves whatever this directory resolves to.
    ///
    /// Errors before a download starts (lookup, resolution, listing) are
    /// returned. Download failures are reported by the save itself.
    pub async fn resolve(self, scaffolder: &Scaffolder) -> Result<(), StubError> {
        let options = scaffolder.options();

        match self.plan(options)? {
            Plan::Skip(reason) => {
                info!(dir = self.dir_name(), reason, "skipping special directory");
                Ok(())
            }
            Plan::Single {
                content_path,
                destination,
            } => {
                let content_url = scaffolder.endpoint().url(&content_path)?;
                let download_url = resolve_download_url(scaffolder.client(), &content_url).await?;
                let destination = destination_for(&options.output_directory, &destination)?;

                debug!(dir = self.dir_name(), %download_url, "resolved special file");
                save_file(
                    scaffolder.client(),
                    &download_url,
                    &destination,
                    options.overwrite_files,
                    scaffolder.reporter(),
                )
                .await;
                Ok(())
            }
            Plan::Workflows { listing_path } => {
                let listing_url = scaffolder.endpoint().url(&listing_path)?;
                let entries = list_url(scaffolder.client(), &listing_url).await?;

                // Same rule as the main walk: an unrecognised kind aborts the run
                for entry in &entries {
                    if let ItemKind::Other(kind) = &entry.kind {
                        return Err(StubError::UnknownItemKind {
                            kind: kind.clone(),
                            path: entry.path.clone(),
                        });
                    }
                }

                // Subdirectories and non-.yml files are left out
                let saves = entries
                    .into_iter()
                    .filter(|entry| entry.kind == ItemKind::File && entry.name.ends_with(YML))
                    .map(|entry| async move {
                        let relative = format!(".github/workflows/{}", entry.name);
                        scaffolder.save_item(&relative, entry.download_url.as_deref()).await;
                    });

                join_all(saves).await;
                Ok(())
            }
        }
    }
}

/// Release manifest for a language, e.g. "goreleaser.yaml" for go.
///
/// An empty language means "no release file" and is not an error.
pub fn release_filename(language: &str) -> Result<Option<&'static str>, StubError> {
    lookup(language, "release", GORELEASER)
}

/// Version source file for a language, e.g. "version.go" for go.
pub fn version_filename(language: &str) -> Result<Option<&'static str>, StubError> {
    lookup(language, "version", VERSION_GO)
}

// Only go is mapped for now
fn lookup(
    language: &str,
    category: &'static str,
    go_file: &'static str,
) -> Result<Option<&'static str>, StubError> {
    if language.is_empty() {
        return Ok(None);
    }

    match language.to_lowercase().as_str() {
        GO_LANG => Ok(Some(go_file)),
        _ => Err(StubError::UnsupportedLanguage {
            category,
            language: language.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::test_options;

    fn single(content_path: &str, destination: &str) -> Plan {
        Plan::Single {
            content_path: content_path.to_string(),
            destination: destination.to_string(),
        }
    }

    #[test]
    fn test_from_name_is_exact() {
        for dir in SpecialDir::ALL {
            assert_eq!(SpecialDir::from_name(dir.dir_name()), Some(dir));
        }
        assert_eq!(SpecialDir::from_name("License-Files"), None);
        assert_eq!(SpecialDir::from_name("src"), None);
        assert_eq!(SpecialDir::from_name(""), None);
    }

    #[test]
    fn test_release_and_version_lookups() {
        assert_eq!(release_filename("").unwrap(), None);
        assert_eq!(version_filename("").unwrap(), None);

        for go in ["go", "GO", "Go"] {
            assert_eq!(release_filename(go).unwrap(), Some("goreleaser.yaml"));
            assert_eq!(version_filename(go).unwrap(), Some("version.go"));
        }

        let err = release_filename("python").unwrap_err();
        assert!(matches!(err, StubError::UnsupportedLanguage { .. }));
        assert!(err.to_string().contains("python"));

        let err = version_filename("typescript").unwrap_err();
        assert!(err.to_string().contains("typescript"));
    }

    #[test]
    fn test_plans_for_default_options() {
        let options = test_options("out");
        let plan = |dir: SpecialDir| dir.plan(&options).unwrap();

        assert_eq!(
            plan(SpecialDir::IgnoreFiles),
            single("ignore-files/go/.gitignore", ".gitignore")
        );
        assert_eq!(
            plan(SpecialDir::LicenseFiles),
            single("license-files/mit/LICENSE", "LICENSE")
        );
        assert_eq!(
            plan(SpecialDir::ReadmeFiles),
            single("readme-files/mit/README.md", "README.md")
        );
        assert_eq!(plan(SpecialDir::TodoFiles), single("todo-files/go/TODO", "TODO"));
        assert_eq!(
            plan(SpecialDir::ReleaseFiles),
            single("release-files/go/goreleaser.yaml", ".goreleaser.yaml")
        );
        assert_eq!(
            plan(SpecialDir::VscodeFiles),
            single("vscode-files/commands.json", ".vscode/commands.json")
        );
        assert_eq!(
            plan(SpecialDir::WorkflowFiles),
            Plan::Workflows {
                listing_path: "workflow-files/go".to_string()
            }
        );
    }

    #[test]
    fn test_optional_files_follow_flags() {
        let mut options = test_options("out");
        assert!(matches!(
            SpecialDir::MakeFiles.plan(&options).unwrap(),
            Plan::Skip(_)
        ));
        assert!(matches!(
            SpecialDir::VersionFiles.plan(&options).unwrap(),
            Plan::Skip(_)
        ));

        options.include_makefile = true;
        options.include_version_file = true;
        assert_eq!(
            SpecialDir::MakeFiles.plan(&options).unwrap(),
            single("make-files/go/Makefile", "Makefile")
        );
        assert_eq!(
            SpecialDir::VersionFiles.plan(&options).unwrap(),
            single("version-files/go/version.go", "version.go")
        );
    }

    #[test]
    fn test_unsupported_language_fails_release_plan() {
        let mut options = test_options("out");
        options.project_language = "rust".to_string();

        assert!(SpecialDir::ReleaseFiles.plan(&options).is_err());
        // Not requested, so the language is never looked up
        assert!(matches!(
            SpecialDir::VersionFiles.plan(&options).unwrap(),
            Plan::Skip(_)
        ));
        options.include_version_file = true;
        assert!(SpecialDir::VersionFiles.plan(&options).is_err());
    }

    #[test]
    fn test_empty_language_skips_release_and_version() {
        let mut options = test_options("out");
        options.project_language = String::new();
        options.include_version_file = true;

        assert!(matches!(
            SpecialDir::ReleaseFiles.plan(&options).unwrap(),
            Plan::Skip(_)
        ));
        assert!(matches!(
            SpecialDir::VersionFiles.plan(&options).unwrap(),
            Plan::Skip(_)
        ));
    }
}
