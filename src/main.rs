// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (REPO_STUB_LOG controls the level, output goes to stderr)
// 2. Parse command-line arguments using clap
// 3. Walk the template repository into the output directory
// 4. Exit with a code that says how it went:
//      0   = every file saved or skipped
//      1   = finished, but some files or special directories failed
//      2   = the run could not complete (bad setup, root listing failed,
//            unknown item type in the tree)
//      130 = interrupted by the user
// =============================================================================

mod cli;
mod error;
mod github;
mod options;
mod report;
mod scaffold;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, StubArgs};
use github::GitHubClient;
use options::ContentsEndpoint;
use report::{Reporter, TerminalReporter};
use scaffold::Scaffolder;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("REPO_STUB_LOG"))
        .init();

    let cli = Cli::parse();
    let reporter = Arc::new(TerminalReporter::new());

    // Whichever finishes first wins; in-flight downloads are dropped on
    // interruption
    let exit_code = tokio::select! {
        result = run(cli, reporter.clone()) => match result {
            Ok(()) => {
                reporter.print_summary();
                if reporter.summary().has_failures() { 1 } else { 0 }
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                2
            }
        },
        _ = interrupt_signal() => {
            reporter.interrupted();
            130
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli, reporter: Arc<TerminalReporter>) -> Result<()> {
    match cli.command {
        Commands::Stub(args) => handle_stub(args, reporter).await,
    }
}

// Handles the 'stub' subcommand
async fn handle_stub(args: StubArgs, reporter: Arc<TerminalReporter>) -> Result<()> {
    let (options, api_url) = args.into_options();

    println!(
        "🔍 Stubbing {}/{} ({}) into {}",
        options.repo_owner,
        options.repo_name,
        options.branch_name,
        options.output_directory.display()
    );

    tokio::fs::create_dir_all(&options.output_directory)
        .await
        .with_context(|| {
            format!(
                "failed to create output directory '{}'",
                options.output_directory.display()
            )
        })?;

    let client = GitHubClient::new(options.github_token.as_deref())
        .context("failed to build HTTP client")?;
    let endpoint = ContentsEndpoint::for_repository(&api_url, &options);
    let repository = format!("{}/{}", options.repo_owner, options.repo_name);

    let scaffolder = Scaffolder::new(client, endpoint, options, reporter);
    scaffolder
        .run()
        .await
        .with_context(|| format!("failed to stub project from {}", repository))?;

    Ok(())
}

// Resolves on CTRL+C, or SIGTERM on unix. If a handler can't be installed
// that signal is simply never observed.
async fn interrupt_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received CTRL+C"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}
