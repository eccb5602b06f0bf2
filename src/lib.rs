//! # repo-sync - Directory-to-Repository Synchronization
//!
//! A one-shot automation tool that copies a local directory tree into a
//! remote GitHub repository and opens a pull request with the result.
//!
//! ## Features
//!
//! - **Manifest-driven filtering**: glob patterns decide which files sync
//! - **Idempotent**: reruns converge on the same open pull request
//! - **Dry-run mode**: report the change summary without pushing anything
//! - **Ephemeral clones**: the working clone never outlives the invocation
//!
//! ## Quick Start
//!
//! ```bash
//! # Install repo-sync
//! cargo install repo-sync
//!
//! # Synchronize generated files into a target repository
//! repo-sync sync \
//!   --owner my-org --repository my-repo \
//!   --from-dir build/proto --to-dir src/proto \
//!   --manifest manifest.txt
//! ```

pub mod cli;
pub mod config;
pub mod git;
pub mod github;
pub mod manifest;
pub mod sync;

pub use cli::{Cli, Output};
pub use config::Settings;

/// Result type alias for repo-sync operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
