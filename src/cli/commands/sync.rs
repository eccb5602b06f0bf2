//! Sync command implementation
//!
//! Resolves command-line flags against the layered settings, validates the
//! local inputs, and hands a fully-built request to the synchronizer.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Args;

use crate::cli::Output;
use crate::config::Settings;
use crate::manifest::{FilterPolicy, Manifest};
use crate::sync::{self, SyncOutcome, SyncRequest};

#[derive(Args)]
pub struct SyncArgs {
    /// Name of the owner or organization
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Name of the repository
    #[arg(short, long)]
    pub repository: Option<String>,

    /// Personal access token
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the folder containing the files to copy
    #[arg(long, value_name = "DIR")]
    pub from_dir: PathBuf,

    /// Folder that will receive the files, relative to the repository root
    #[arg(long, value_name = "DIR")]
    pub to_dir: PathBuf,

    /// Manifest listing the glob patterns to synchronize
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Branch the sync branch is created from
    #[arg(short, long)]
    pub base_branch: Option<String>,

    /// Name of the sync branch
    #[arg(long)]
    pub branch: Option<String>,

    /// Title of the pull request
    #[arg(long)]
    pub pr_title: Option<String>,

    /// Whether manifest patterns select (include) or reject (exclude) files
    #[arg(long, value_enum, default_value_t = FilterPolicy::Include)]
    pub filter: FilterPolicy,

    /// Clean the destination folder before synchronizing
    #[arg(long)]
    pub clean_to_dir: bool,

    /// Restrict the cleanup to files matching the manifest (with --clean-to-dir)
    #[arg(long)]
    pub clean_by_manifest: bool,

    /// Simulate the synchronization without pushing or opening a pull request
    #[arg(short, long)]
    pub dry_run: bool,

    /// Add a `[skip ci]` prefix to the commit message
    #[arg(long)]
    pub skip_ci: bool,

    /// Append a random suffix to the sync branch name (parallel runs, tests)
    #[arg(long)]
    pub random_branch_name: bool,
}

/// Execute the sync command
pub async fn execute(
    args: SyncArgs,
    config: Option<&str>,
    format: &str,
    output: &Output,
) -> Result<()> {
    let settings = Settings::load(config)?;

    let owner = args
        .owner
        .or(settings.owner)
        .context("repository owner missing: pass --owner or set `owner` in repo-sync.toml")?;
    let repository = args.repository.or(settings.repository).context(
        "repository name missing: pass --repository or set `repository` in repo-sync.toml",
    )?;
    let token = args
        .token
        .context("access token missing: pass --token or set GITHUB_TOKEN")?;

    // Local inputs are validated before anything touches the network.
    ensure!(
        args.from_dir.is_dir(),
        "source directory '{}' does not exist",
        args.from_dir.display()
    );
    let manifest = Manifest::load(&args.manifest)?;

    if args.clean_by_manifest && !args.clean_to_dir {
        output.warning("--clean-by-manifest has no effect without --clean-to-dir");
    }
    if manifest.is_empty() && args.filter == FilterPolicy::Include {
        output.warning("manifest lists no patterns, nothing will be copied");
    }

    let request = SyncRequest {
        owner,
        repository,
        token,
        from_dir: args.from_dir,
        to_dir: args.to_dir,
        manifest,
        filter: args.filter,
        base_branch: args.base_branch.unwrap_or(settings.base_branch),
        branch: args.branch.unwrap_or(settings.branch),
        pull_request_title: args.pr_title.unwrap_or(settings.pull_request_title),
        bot_name: settings.bot.name,
        bot_email: settings.bot.email,
        clean_to_dir: args.clean_to_dir,
        clean_by_manifest: args.clean_by_manifest,
        dry_run: args.dry_run,
        skip_ci: args.skip_ci,
        random_branch_name: args.random_branch_name,
    };

    let outcome = sync::synchronize(&request, output).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        SyncOutcome::PullRequest { url } => output.success(&format!("Pull request: {url}")),
        SyncOutcome::DryRun { .. } => output.success("Dry run successful"),
        SyncOutcome::UpToDate => output.success("Nothing to synchronize"),
    }

    Ok(())
}
