//! GitHub API layer for repo-sync
//!
//! Thin octocrab wrapper scoped to one repository: repository lookup,
//! pull-request creation, open-PR lookup by head branch, and PR closure
//! (the latter is only used by test teardown).

use anyhow::{Context, Result};
use octocrab::Octocrab;
use octocrab::params::State;
use tracing::debug;

/// Pull request body used for every sync PR.
pub const PULL_REQUEST_BODY: &str = "Please review and merge these changes.";

/// Repository metadata needed by the synchronizer.
pub struct RepoInfo {
    pub html_url: String,
}

/// Authenticated GitHub client scoped to `owner/repo`.
pub struct GithubClient {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GithubClient {
    /// Build a client authenticated with a personal access token.
    pub fn new(owner: &str, repo: &str, token: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("failed to create GitHub client")?;

        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Look up the repository. Failing here is fatal for a sync.
    pub async fn repository(&self) -> Result<RepoInfo> {
        let repository = self
            .client
            .repos(&self.owner, &self.repo)
            .get()
            .await
            .with_context(|| format!("failed to access repository '{}/{}'", self.owner, self.repo))?;

        let html_url = repository
            .html_url
            .map(|url| url.to_string())
            .unwrap_or_else(|| format!("https://github.com/{}/{}", self.owner, self.repo));

        Ok(RepoInfo { html_url })
    }

    /// Create a pull request from `head` into `base` and return its URL.
    ///
    /// Returns `Ok(None)` when GitHub rejects the request because an open
    /// pull request with this head branch already exists ("Validation
    /// Failed"); the caller resolves that by looking the existing one up.
    pub async fn create_pull_request(
        &self,
        title: &str,
        base: &str,
        head: &str,
    ) -> Result<Option<String>> {
        let created = self
            .client
            .pulls(&self.owner, &self.repo)
            .create(title, head, base)
            .body(PULL_REQUEST_BODY)
            .send()
            .await;

        match created {
            Ok(pull_request) => {
                let url = pull_request
                    .html_url
                    .map(|url| url.to_string())
                    .unwrap_or_default();
                debug!("created pull request {url}");
                Ok(Some(url))
            }
            Err(octocrab::Error::GitHub { source, .. })
                if source.message.contains("Validation Failed") =>
            {
                Ok(None)
            }
            Err(err) => {
                Err(anyhow::Error::new(err).context("failed to create pull request"))
            }
        }
    }

    /// Find the open pull request whose head is the given branch.
    pub async fn find_open_pull_request(&self, head: &str) -> Result<Option<String>> {
        let page = self
            .client
            .pulls(&self.owner, &self.repo)
            .list()
            .state(State::Open)
            .per_page(100)
            .send()
            .await
            .context("failed to list open pull requests")?;

        Ok(page
            .items
            .into_iter()
            .find(|pr| pr.head.ref_field == head)
            .and_then(|pr| pr.html_url.map(|url| url.to_string())))
    }

    /// Close a pull request. Used by test teardown, not by the sync flow.
    pub async fn close_pull_request(&self, number: u64) -> Result<()> {
        self.client
            .pulls(&self.owner, &self.repo)
            .update(number)
            .state(octocrab::params::pulls::State::Closed)
            .send()
            .await
            .with_context(|| format!("failed to close pull request #{number}"))?;

        Ok(())
    }
}
