// src/report.rs
// =============================================================================
// User-facing progress output.
//
// The scaffold code never prints directly. It calls a Reporter, which the
// binary sets to a TerminalReporter and the tests set to a recorder. Every
// materialized file ends in exactly one of skipped / saved / failed, always
// preceded by started.
//
// Rust concepts:
// - Trait objects: Arc<dyn Reporter> is shared by all download tasks
// - Atomics: counters updated from many tasks without a lock
// =============================================================================

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::StubError;

/// Observer for everything the user should see during a run.
///
/// Implementations are called from concurrently running download tasks.
pub trait Reporter: Send + Sync {
    /// A file is about to be materialized at `path`.
    fn started(&self, path: &Path);

    /// `path` already existed and overwriting is off.
    fn skipped(&self, path: &Path);

    /// `path` was written successfully.
    fn saved(&self, path: &Path);

    /// Materializing `path` failed.
    fn failed(&self, path: &Path, error: &StubError);

    /// A special directory or subdirectory could not be handled.
    fn item_failed(&self, item: &str, error: &StubError);

    /// The run was cut short by the operator.
    fn interrupted(&self);
}

/// Totals gathered by the TerminalReporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Prints one line per event to stdout and keeps count.
#[derive(Debug, Default)]
pub struct TerminalReporter {
    saved: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            saved: self.saved.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    pub fn print_summary(&self) {
        let summary = self.summary();
        println!();
        println!("📊 Summary:");
        println!("   ✅ Saved: {}", summary.saved);
        println!("   ⏭️  Skipped: {}", summary.skipped);
        println!("   ❌ Failed: {}", summary.failed);
    }
}

// "dir/file.txt" -> ("file.txt", "dir")
fn split(path: &Path) -> (String, String) {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = path
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    (file, dir)
}

impl Reporter for TerminalReporter {
    fn started(&self, path: &Path) {
        let (file, _) = split(path);
        println!("📥 Processing {}", file);
    }

    fn skipped(&self, path: &Path) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        let (file, _) = split(path);
        println!("⏭️  Skipped {} (already exists)", file);
    }

    fn saved(&self, path: &Path) {
        self.saved.fetch_add(1, Ordering::Relaxed);
        let (file, dir) = split(path);
        println!("✅ Processed {} saved in {}", file, dir);
    }

    fn failed(&self, path: &Path, error: &StubError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        println!("❌ Failed {}: {}", path.display(), error);
    }

    fn item_failed(&self, item: &str, error: &StubError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        println!("❌ Error handling {}: {}", item, error);
    }

    fn interrupted(&self) {
        println!();
        println!("⚠️  Interrupted by user");
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_reporter_counts_outcomes() {
        let reporter = TerminalReporter::new();
        let path = Path::new("out/a.txt");
        let err = StubError::HttpStatus {
            url: "https://example.com".to_string(),
            status: 500,
        };

        reporter.started(path);
        reporter.saved(path);
        reporter.skipped(path);
        reporter.skipped(path);
        reporter.failed(path, &err);
        reporter.item_failed("make-files", &err);

        let summary = reporter.summary();
        assert_eq!(
            summary,
            Summary {
                saved: 1,
                skipped: 2,
                failed: 2
            }
        );
        assert!(summary.has_failures());
    }

    #[test]
    fn test_split_file_and_dir() {
        let (file, dir) = split(Path::new("out/sub/b.txt"));
        assert_eq!(file, "b.txt");
        assert_eq!(dir, Path::new("out/sub").display().to_string());
    }
}
