// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage:
//   repo-stub stub ./my-project -p go -l mit --include-makefile
//
// The flags map one-to-one onto ResolutionOptions, which the rest of the
// program uses and never modifies.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::options::{ResolutionOptions, DEFAULT_BRANCH};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "repo-stub",
    version,
    about = "A CLI tool to download GitHub repository contents when creating a new project",
    long_about = "repo-stub copies a template GitHub repository into a new project directory, \
                  picking the LICENSE, README, .gitignore, workflows and friends that match \
                  your project language and license."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stub project with templated files based on options
    ///
    /// Example: repo-stub stub ./my-app --project-language go --license-type mit
    Stub(StubArgs),
}

/// Arguments for the `stub` subcommand
#[derive(Args, Debug)]
pub struct StubArgs {
    /// Directory the project is written to (created if missing)
    pub output_directory: PathBuf,

    /// Owner of the template repository
    #[arg(short = 'o', long, default_value = "ondrovic")]
    pub repo_owner: String,

    /// Name of the template repository
    #[arg(short = 'r', long, default_value = "vscode")]
    pub repo_name: String,

    /// Branch you wish to pull from
    #[arg(short = 'b', long, default_value = DEFAULT_BRANCH)]
    pub branch_name: String,

    /// GitHub API token
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// What language is your app in
    #[arg(short = 'p', long, default_value = "go")]
    pub project_language: String,

    /// What license are you using
    #[arg(short = 'l', long, default_value = "mit")]
    pub license_type: String,

    /// Include a Makefile
    #[arg(short = 'm', long)]
    pub include_makefile: bool,

    /// Include a version file
    #[arg(short = 'v', long)]
    pub include_version_file: bool,

    /// Overwrite existing files
    #[arg(short = 'w', long)]
    pub overwrite_files: bool,

    /// GitHub API root (change for GitHub Enterprise)
    #[arg(long, default_value = "https://api.github.com")]
    pub api_url: String,
}

impl StubArgs {
    /// Splits the arguments into the run options and the API root.
    pub fn into_options(self) -> (ResolutionOptions, String) {
        let options = ResolutionOptions {
            branch_name: self.branch_name,
            repo_owner: self.repo_owner,
            repo_name: self.repo_name,
            github_token: self.github_token,
            output_directory: self.output_directory,
            project_language: self.project_language,
            license_type: self.license_type,
            include_makefile: self.include_makefile,
            include_version_file: self.include_version_file,
            overwrite_files: self.overwrite_files,
        };
        (options, self.api_url)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `env = "GITHUB_TOKEN"` do?
//    - If --github-token isn't passed, clap reads the environment variable
//    - hide_env_values keeps the token out of --help output
//
// 2. Why Option<String> for the token but String for the rest?
//    - Every other flag has a default value, so it always has a value
//    - The token has no sensible default: None means "don't authenticate"
// -----------------------------------------------------------------------------
