//! Configuration management for repo-sync
//!
//! Settings are layered with figment: embedded defaults, then an optional
//! `repo-sync.toml` (or the file passed via `--config`), then `REPOSYNC_*`
//! environment variables. Command-line flags override all of these at the
//! call site.

use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_SYNC_BRANCH: &str = "sync/file-sync";
pub const DEFAULT_PULL_REQUEST_TITLE: &str = "sync: file sync performed by repo-sync";

/// Merged repo-sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Repository owner (user or organization)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Repository name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Branch the sync branch is created from
    pub base_branch: String,

    /// Name of the sync branch
    pub branch: String,

    /// Title used when opening the pull request
    pub pull_request_title: String,

    /// Identity used for the sync commit
    #[serde(default)]
    pub bot: BotIdentity,
}

/// Commit author identity for sync commits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotIdentity {
    pub name: String,
    pub email: String,
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self {
            name: "repo-sync[bot]".to_string(),
            email: "repo-sync[bot]@users.noreply.github.com".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            owner: None,
            repository: None,
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            branch: DEFAULT_SYNC_BRANCH.to_string(),
            pull_request_title: DEFAULT_PULL_REQUEST_TITLE.to_string(),
            bot: BotIdentity::default(),
        }
    }
}

impl Settings {
    /// Load settings, optionally from an explicit configuration file.
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(path) = custom_config {
            figment = figment.merge(Toml::file(path));
        } else {
            figment = figment.merge(Toml::file("repo-sync.toml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("REPOSYNC_").split("__"));

        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).expect("should load default config");

        assert_eq!(settings.base_branch, DEFAULT_BASE_BRANCH);
        assert_eq!(settings.branch, DEFAULT_SYNC_BRANCH);
        assert_eq!(settings.bot.name, "repo-sync[bot]");
        assert!(settings.owner.is_none());
    }

    #[test]
    fn test_custom_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "owner = \"acme\"\nbase_branch = \"develop\"\n").unwrap();

        let settings = Settings::load(path.to_str()).unwrap();

        assert_eq!(settings.owner.as_deref(), Some("acme"));
        assert_eq!(settings.base_branch, "develop");
        assert_eq!(settings.branch, DEFAULT_SYNC_BRANCH);
    }

    #[test]
    fn test_missing_custom_config_falls_back_to_defaults() {
        let settings = Settings::load(Some("non_existent.toml")).unwrap();

        assert_eq!(settings.base_branch, DEFAULT_BASE_BRANCH);
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("REPOSYNC_PULL_REQUEST_TITLE", "sync: custom title");
        }

        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.pull_request_title, "sync: custom title");

        unsafe {
            std::env::remove_var("REPOSYNC_PULL_REQUEST_TITLE");
        }
    }
}
