//! Configuration management commands

use std::path::Path;

use anyhow::{Result, ensure};

use crate::cli::{ConfigCommands, Output};
use crate::config::Settings;

/// Execute a config subcommand
pub async fn execute(
    cmd: ConfigCommands,
    config: Option<&str>,
    format: &str,
    output: &Output,
) -> Result<()> {
    match cmd {
        ConfigCommands::Init => init(output),
        ConfigCommands::Show => show(config, format),
    }
}

fn init(output: &Output) -> Result<()> {
    let path = Path::new("repo-sync.toml");
    ensure!(!path.exists(), "repo-sync.toml already exists");

    let template = Settings {
        owner: Some("my-org".to_string()),
        repository: Some("my-repo".to_string()),
        ..Settings::default()
    };
    let rendered = toml::to_string_pretty(&template)?;
    std::fs::write(
        path,
        format!("# repo-sync configuration\n# Command-line flags override these values.\n\n{rendered}"),
    )?;

    output.success("Wrote repo-sync.toml");
    Ok(())
}

fn show(config: Option<&str>, format: &str) -> Result<()> {
    let settings = Settings::load(config)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print!("{}", toml::to_string_pretty(&settings)?);
    }

    Ok(())
}
