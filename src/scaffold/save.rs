// src/scaffold/save.rs
// =============================================================================
// Downloads one file and writes it into the output directory.
//
// Steps for a single file:
// 1. If the destination exists and we may not overwrite, stop: Skipped
// 2. Create the parent directories
// 3. GET the raw download URL (must be 200 OK)
// 4. Create/truncate the destination and stream the body into it
//
// Every call reports `started` and then exactly one of skipped / saved /
// failed. A Failed outcome may leave a partially written file behind; the
// failure is reported so the user knows to look at it.
//
// Calls for different destinations are independent and run in parallel.
// Two calls for the same destination at once are never scheduled.
// =============================================================================

use std::path::{Component, Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::StubError;
use crate::github::GitHubClient;
use crate::report::Reporter;

/// What happened to one file.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    Skipped,
    Failed(StubError),
}

// Downloads one file to disk and reports what happened
//
// Parameters:
//   client: the shared GitHub client (borrowed)
//   download_url: raw URL of the file's bytes
//   destination: full local path, parents are created as needed
//   overwrite: replace a file that already exists at destination
//   reporter: told about the start and the outcome
//
// Returns: SaveOutcome (Saved, Skipped, or Failed with the reason)
//
// Errors never escape: a failed save is an outcome, not a Result, so one
// bad file can't stop the rest of the walk.
pub async fn save_file(
    client: &GitHubClient,
    download_url: &Url,
    destination: &Path,
    overwrite: bool,
    reporter: &dyn Reporter,
) -> SaveOutcome {
    reporter.started(destination);

    let outcome = match write_file(client, download_url, destination, overwrite).await {
        Ok(outcome) => outcome,
        Err(e) => SaveOutcome::Failed(e),
    };

    match &outcome {
        SaveOutcome::Saved => reporter.saved(destination),
        SaveOutcome::Skipped => reporter.skipped(destination),
        SaveOutcome::Failed(e) => reporter.failed(destination, e),
    }

    outcome
}

async fn write_file(
    client: &GitHubClient,
    download_url: &Url,
    destination: &Path,
    overwrite: bool,
) -> Result<SaveOutcome, StubError> {
    // Only look at the file, never open it, when deciding to skip
    if !overwrite && fs::metadata(destination).await.is_ok() {
        return Ok(SaveOutcome::Skipped);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StubError::filesystem(parent, e))?;
    }

    // No total deadline here; the body can be large
    let mut response = client.get(download_url).await?;

    let mut file = File::create(destination)
        .await
        .map_err(|e| StubError::filesystem(destination, e))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| StubError::Transport {
            url: download_url.to_string(),
            source,
        })?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| StubError::filesystem(destination, e))?;
    }

    // tokio hands writes to a blocking thread; flush waits for them
    file.flush()
        .await
        .map_err(|e| StubError::filesystem(destination, e))?;

    Ok(SaveOutcome::Saved)
}

/// Joins a repository path onto the output directory.
///
/// Rejects absolute paths and `..` so a template can't write outside the
/// output directory.
pub fn destination_for(output_directory: &Path, remote_path: &str) -> Result<PathBuf, StubError> {
    let mut destination = output_directory.to_path_buf();

    for component in Path::new(remote_path).components() {
        match component {
            Component::Normal(part) => destination.push(part),
            Component::CurDir => {}
            _ => {
                return Err(StubError::Decode {
                    url: remote_path.to_string(),
                    reason: "item path escapes the output directory".to_string(),
                })
            }
        }
    }

    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::testing::{Event, RecordingReporter};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, p: &str, body: &str) -> Url {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn test_saves_body_and_creates_parents() {
        let server = MockServer::start().await;
        let url = serve(&server, "/raw/bar.txt", "bar contents").await;
        let out = tempfile::tempdir().unwrap();
        let destination = out.path().join("deep/nested/bar.txt");
        let reporter = RecordingReporter::default();
        let client = GitHubClient::new(None).unwrap();

        let outcome = save_file(&client, &url, &destination, false, &reporter).await;

        assert!(matches!(outcome, SaveOutcome::Saved), "{:?}", outcome);
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "bar contents");
        assert_eq!(
            reporter.events(),
            vec![
                Event::Started(destination.clone()),
                Event::Saved(destination.clone())
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_file_is_skipped_without_download() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("new"))
            .expect(0)
            .mount(&server)
            .await;
        let url = Url::parse(&format!("{}/raw/a.txt", server.uri())).unwrap();

        let out = tempfile::tempdir().unwrap();
        let destination = out.path().join("a.txt");
        std::fs::write(&destination, "keep me").unwrap();
        let reporter = RecordingReporter::default();
        let client = GitHubClient::new(None).unwrap();

        let outcome = save_file(&client, &url, &destination, false, &reporter).await;

        assert!(matches!(outcome, SaveOutcome::Skipped));
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "keep me");
        assert_eq!(reporter.events()[1], Event::Skipped(destination.clone()));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_content_exactly() {
        let server = MockServer::start().await;
        let url = serve(&server, "/raw/a.txt", "new").await;
        let out = tempfile::tempdir().unwrap();
        let destination = out.path().join("a.txt");
        std::fs::write(&destination, "a much longer old content").unwrap();
        let client = GitHubClient::new(None).unwrap();

        let outcome = save_file(
            &client,
            &url,
            &destination,
            true,
            &RecordingReporter::default(),
        )
        .await;

        assert!(matches!(outcome, SaveOutcome::Saved));
        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_bad_status_fails_without_creating_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let url = Url::parse(&format!("{}/raw/gone.txt", server.uri())).unwrap();
        let out = tempfile::tempdir().unwrap();
        let destination = out.path().join("gone.txt");
        let reporter = RecordingReporter::default();
        let client = GitHubClient::new(None).unwrap();

        let outcome = save_file(&client, &url, &destination, false, &reporter).await;

        assert!(matches!(
            outcome,
            SaveOutcome::Failed(StubError::HttpStatus { status: 404, .. })
        ));
        assert!(!destination.exists());
        assert_eq!(reporter.events()[1], Event::Failed(destination.clone()));
    }

    #[tokio::test]
    async fn test_unwritable_parent_is_a_filesystem_error() {
        let server = MockServer::start().await;
        let url = serve(&server, "/raw/x.txt", "x").await;
        let out = tempfile::tempdir().unwrap();
        // A plain file where a directory needs to go
        std::fs::write(out.path().join("blocker"), "").unwrap();
        let destination = out.path().join("blocker/x.txt");
        let client = GitHubClient::new(None).unwrap();

        let outcome = save_file(
            &client,
            &url,
            &destination,
            false,
            &RecordingReporter::default(),
        )
        .await;

        assert!(matches!(
            outcome,
            SaveOutcome::Failed(StubError::Filesystem { .. })
        ));
    }

    #[test]
    fn test_destination_joins_repository_path() {
        let destination = destination_for(Path::new("out"), "sub/bar.txt").unwrap();
        assert_eq!(destination, Path::new("out").join("sub").join("bar.txt"));
    }

    #[test]
    fn test_destination_rejects_escaping_paths() {
        assert!(destination_for(Path::new("out"), "../evil").is_err());
        assert!(destination_for(Path::new("out"), "/etc/passwd").is_err());
        assert!(destination_for(Path::new("out"), "a/../../b").is_err());
    }
}
