//! Synchronization workflow
//!
//! Orchestrates a full sync: repository lookup, ephemeral clone, optional
//! destination cleanup, filtered copy, branch/commit, change detection,
//! force-push and pull-request creation or reuse.

pub mod clean;
pub mod copy;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::cli::Output;
use crate::git::GitRepo;
use crate::github::GithubClient;
use crate::manifest::{FilterPolicy, Manifest};

/// Commit message used for every sync commit.
pub const DEFAULT_COMMIT_MESSAGE: &str = "sync: add changes from local folder";

/// Everything one sync invocation needs. Built once, immutable thereafter.
pub struct SyncRequest {
    pub owner: String,
    pub repository: String,
    pub token: String,
    pub from_dir: PathBuf,
    pub to_dir: PathBuf,
    pub manifest: Manifest,
    pub filter: FilterPolicy,
    pub base_branch: String,
    pub branch: String,
    pub pull_request_title: String,
    pub bot_name: String,
    pub bot_email: String,
    pub clean_to_dir: bool,
    pub clean_by_manifest: bool,
    pub dry_run: bool,
    pub skip_ci: bool,
    pub random_branch_name: bool,
}

/// How a sync ended.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A pull request was created or reused
    PullRequest { url: String },
    /// Dry run: changes were detected and reported, nothing was pushed
    DryRun { summary: String },
    /// The sync produced no changes against the base branch
    UpToDate,
}

/// Run the synchronization workflow.
pub async fn synchronize(request: &SyncRequest, output: &Output) -> Result<SyncOutcome> {
    let branch = resolve_branch_name(&request.branch, request.random_branch_name);

    output.step(&format!(
        "Accessing repository '{}/{}'",
        request.owner, request.repository
    ));
    let github = GithubClient::new(&request.owner, &request.repository, &request.token)?;
    let repo_info = github.repository().await?;

    // The clone directory cleans itself up on every exit path.
    let temp_dir = tempfile::Builder::new()
        .prefix("repo-sync-")
        .tempdir()
        .context("failed to create temporary clone directory")?;
    let clone_path = temp_dir.path().join(&request.repository);

    output.step(&format!(
        "Cloning repository '{}/{}'",
        request.owner, request.repository
    ));
    let authenticated = authenticated_url(&repo_info.html_url, &request.token);
    let repo = GitRepo::clone(&authenticated, &clone_path)?;

    let destination = clone_path.join(&request.to_dir);
    std::fs::create_dir_all(&destination)
        .with_context(|| format!("failed to create destination {}", destination.display()))?;

    if request.clean_to_dir {
        output.step(&format!(
            "Cleaning content inside '{}'",
            request.to_dir.display()
        ));
        let manifest = request.clean_by_manifest.then_some(&request.manifest);
        clean::clean_destination(&destination, manifest)?;
    }

    output.step(&format!(
        "Copying files from '{}' to '{}'",
        request.from_dir.display(),
        request.to_dir.display()
    ));
    let copied = copy::copy_dir_filtered(
        &request.from_dir,
        &destination,
        &request.manifest,
        request.filter,
    )?;
    output.verbose(&format!("{copied} file(s) copied"));

    output.step(&format!(
        "Checking out branch '{branch}' from '{}'",
        request.base_branch
    ));
    repo.checkout_branch(&request.base_branch)?;
    repo.create_branch(&branch)?;

    output.step(&format!("Committing changes to branch '{branch}'"));
    repo.stage_all()?;
    let message = if request.skip_ci {
        format!("[skip ci] {DEFAULT_COMMIT_MESSAGE}")
    } else {
        DEFAULT_COMMIT_MESSAGE.to_string()
    };
    repo.commit(&message, &request.bot_name, &request.bot_email)?;

    let summary = repo.diff_summary(&request.base_branch, &branch)?;
    if summary.is_empty() {
        output.info("No files to sync, skipping pull request");
        return Ok(SyncOutcome::UpToDate);
    }

    let rendered = summary.to_string();
    output.info("Summary of modified files:");
    for line in rendered.lines() {
        output.indent(line);
    }

    if request.dry_run {
        return Ok(SyncOutcome::DryRun { summary: rendered });
    }

    // Skip the push when the remote branch already carries this exact tree.
    let local_tree = repo.local_tree_id(&branch)?;
    if repo.remote_tree_id(&branch) == Some(local_tree) {
        info!("remote branch '{branch}' already up to date, skipping push");
        output.verbose(&format!(
            "Remote branch '{branch}' already has this content, skipping push"
        ));
    } else {
        output.step(&format!("Force-pushing branch '{branch}'"));
        repo.push_force(&branch, &request.token)?;
    }

    output.step(&format!("Creating pull request from '{branch}'"));
    let url = match github
        .create_pull_request(&request.pull_request_title, &request.base_branch, &branch)
        .await?
    {
        Some(url) => url,
        None => {
            output.info("Pull request already exists, searching for it");
            github
                .find_open_pull_request(&branch)
                .await?
                .with_context(|| {
                    format!("no open pull request found for existing branch '{branch}'")
                })?
        }
    };

    Ok(SyncOutcome::PullRequest { url })
}

/// Fixed sync branch name, with a random suffix when uniqueness is needed
/// (parallel runs, tests).
fn resolve_branch_name(branch: &str, randomize: bool) -> String {
    if randomize {
        format!("{branch}-{}", Uuid::new_v4().simple())
    } else {
        branch.to_string()
    }
}

/// Token-authenticated HTTPS remote URL.
fn authenticated_url(html_url: &str, token: &str) -> String {
    let rest = html_url.strip_prefix("https://").unwrap_or(html_url);
    format!("https://{token}@{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_branch_name_fixed() {
        assert_eq!(
            resolve_branch_name("sync/file-sync", false),
            "sync/file-sync"
        );
    }

    #[test]
    fn test_resolve_branch_name_random_suffix() {
        let first = resolve_branch_name("sync/file-sync", true);
        let second = resolve_branch_name("sync/file-sync", true);

        assert!(first.starts_with("sync/file-sync-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_authenticated_url_embeds_token() {
        assert_eq!(
            authenticated_url("https://github.com/acme/widgets", "t0ken"),
            "https://t0ken@github.com/acme/widgets"
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = SyncOutcome::PullRequest {
            url: "https://github.com/acme/widgets/pull/7".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["result"], "pull_request");
        assert_eq!(json["url"], "https://github.com/acme/widgets/pull/7");

        let json = serde_json::to_value(SyncOutcome::UpToDate).unwrap();
        assert_eq!(json["result"], "up_to_date");
    }
}
