// src/scaffold/traverse.rs
// =============================================================================
// Walks the template repository and mirrors it into the output directory.
//
// For every item in a listing:
// - file      -> spawn a download task (unless it is one of the names the
//                special directories produce)
// - directory -> special directory? resolve it. Otherwise recurse.
// - anything else -> abort the whole run
//
// Directories are handled one at a time, in the order GitHub lists them.
// Files are downloaded concurrently, one tokio task each, and a level does
// not return until every task it spawned has finished. Since subdirectories
// are walked before that wait, the root call returns only once the whole
// tree is on disk.
//
// Failures are isolated per item: a broken special directory or a failed
// download is reported and the walk continues.
//
// Rust concepts:
// - JoinSet: a group of spawned tasks we can wait on together
// - BoxFuture: async recursion needs a boxed future of known size
// =============================================================================

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use super::save::{destination_for, save_file};
use super::special::SpecialDir;
use crate::error::StubError;
use crate::github::{list_contents, GitHubClient, ItemKind, RepositoryItem};
use crate::options::{ContentsEndpoint, ResolutionOptions};
use crate::report::Reporter;

// Always produced by a special directory, never copied directly
const GENERATED_FILES: [&str; 5] = ["README.md", "LICENSE", ".gitignore", ".gitkeep", "TODO"];

/// Everything one stub run needs, cheap to clone into download tasks.
#[derive(Clone)]
pub struct Scaffolder {
    client: GitHubClient,
    endpoint: ContentsEndpoint,
    options: Arc<ResolutionOptions>,
    reporter: Arc<dyn Reporter>,
}

impl Scaffolder {
    pub fn new(
        client: GitHubClient,
        endpoint: ContentsEndpoint,
        options: ResolutionOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            client,
            endpoint,
            options: Arc::new(options),
            reporter,
        }
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn endpoint(&self) -> &ContentsEndpoint {
        &self.endpoint
    }

    pub fn options(&self) -> &ResolutionOptions {
        &self.options
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    /// Walks the template from the repository root.
    pub async fn run(&self) -> Result<(), StubError> {
        self.traverse("").await
    }

    // Mirrors one directory of the template into the output directory
    //
    // Parameters:
    //   path: directory relative to the repository root ("" for the root)
    //
    // Returns: Ok once every file below `path` has been handled, or
    //   - the listing error, if `path` itself can't be listed
    //   - UnknownItemKind, from any depth, which aborts the run
    //
    // Any other failure inside the tree is reported and skipped.
    //
    // Example:
    //   path = "sub" lists sub/, spawns a download for sub/a.txt,
    //   recurses into sub/deeper, then waits for sub/a.txt
    pub fn traverse<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<(), StubError>> {
        async move {
            let items = list_contents(&self.client, &self.endpoint, path).await?;

            if items.is_empty() {
                info!(path, "no contents found");
                return Ok(());
            }

            let mut files = JoinSet::new();

            for item in items {
                match &item.kind {
                    ItemKind::File => {
                        if is_generated_file(&item.name) {
                            debug!(path = %item.path, "leaving file to its special directory");
                            continue;
                        }

                        let scaffolder = self.clone();
                        let relative = item.path.clone();
                        let download_url = item.download_url.clone();
                        files.spawn(async move {
                            scaffolder
                                .save_item(&relative, download_url.as_deref())
                                .await;
                        });
                    }
                    ItemKind::Directory => {
                        // One directory at a time, in listing order
                        if let Err(e) = self.handle_directory(&item).await {
                            if e.is_fatal() {
                                // Let the downloads already running finish
                                wait_for(files).await;
                                return Err(e);
                            }
                            warn!(path = %item.path, error = %e, "failed to handle directory");
                            self.reporter.item_failed(&item.path, &e);
                        }
                    }
                    ItemKind::Other(kind) => {
                        wait_for(files).await;
                        return Err(StubError::UnknownItemKind {
                            kind: kind.clone(),
                            path: item.path.clone(),
                        });
                    }
                }
            }

            wait_for(files).await;
            Ok(())
        }
        .boxed()
    }

    async fn handle_directory(&self, item: &RepositoryItem) -> Result<(), StubError> {
        match SpecialDir::from_name(&item.name) {
            Some(special) => {
                debug!(dir = special.dir_name(), "resolving special directory");
                special.resolve(self).await
            }
            None => self.traverse(&item.path).await,
        }
    }

    /// Saves one listed file to `relative` under the output directory.
    /// Problems are reported, never returned.
    pub(crate) async fn save_item(&self, relative: &str, download_url: Option<&str>) {
        let destination = match destination_for(&self.options.output_directory, relative) {
            Ok(destination) => destination,
            Err(e) => {
                self.reporter.item_failed(relative, &e);
                return;
            }
        };

        match parse_download_url(relative, download_url) {
            Ok(url) => {
                save_file(
                    &self.client,
                    &url,
                    &destination,
                    self.options.overwrite_files,
                    self.reporter.as_ref(),
                )
                .await;
            }
            Err(e) => self.reporter.failed(&destination, &e),
        }
    }
}

fn is_generated_file(name: &str) -> bool {
    GENERATED_FILES
        .iter()
        .any(|generated| generated.eq_ignore_ascii_case(name))
}

fn parse_download_url(relative: &str, download_url: Option<&str>) -> Result<Url, StubError> {
    let raw = download_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| StubError::Decode {
            url: relative.to_string(),
            reason: "file has no download_url".to_string(),
        })?;

    Url::parse(raw).map_err(|source| StubError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

async fn wait_for(mut files: JoinSet<()>) {
    while let Some(joined) = files.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "download task did not finish");
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why can't traverse() just be an `async fn`?
//    - An async fn compiles to a state machine that contains the futures it
//      awaits
//    - traverse awaits itself (through handle_directory), so that state
//      machine would have to contain itself: infinite size
//    - Boxing the future (.boxed()) puts it on the heap behind a pointer,
//      which has a known size
//
// 2. Why clone the Scaffolder for every file?
//    - tokio::spawn needs a 'static future: it may outlive the loop
//    - Everything inside is an Arc or a reqwest::Client (also an Arc inside),
//      so a clone is a few reference count bumps
//
// 3. Why does wait_for take the JoinSet by value?
//    - Once we've waited, the set is done; taking ownership makes it
//      impossible to spawn into it again by mistake
//    - Dropping a JoinSet aborts whatever is still running in it, so we
//      always drain it before returning
// -----------------------------------------------------------------------------
