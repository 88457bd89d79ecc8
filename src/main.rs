use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_changelog::changelog::FileChangelogStore;
use git_changelog::cli::{ReleaseArgs, ReleaseWorkflow};
use git_changelog::config;
use git_changelog::git::Git2Repository;
use git_changelog::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-changelog",
    about = "Update CHANGELOG.md and tag the next version based on commit prefixes"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, default_value = ".", help = "Path inside the repository to release")]
    repo: PathBuf,

    #[arg(long, help = "Preview the release without writing, committing or tagging")]
    dry_run: bool,

    #[arg(long, help = "Enable debug logging (RUST_LOG takes precedence)")]
    verbose: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    if args.version {
        println!("git-changelog {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let repo = match Git2Repository::discover(&args.repo) {
        Ok(repo) => repo,
        Err(e) if e.is_not_a_repository() => {
            ui::display_error("Not in a git repository");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            ui::display_error(&format!("Failed to open git repository: {}", e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let Some(workdir) = repo.workdir() else {
        ui::display_error("Cannot release from a bare repository");
        return Ok(ExitCode::FAILURE);
    };
    let store = FileChangelogStore::new(workdir.join(&config.changelog.path));

    let workflow = ReleaseWorkflow::new(&repo, &store, &config);
    let release_args = ReleaseArgs {
        dry_run: args.dry_run,
    };

    match workflow.run(&release_args, &chrono::Local::now()) {
        Ok(outcome) => {
            ui::report_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Log to stderr. RUST_LOG wins; otherwise warn, or debug with --verbose.
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}
