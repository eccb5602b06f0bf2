use anyhow::Result;
use clap::Parser;

use repo_sync::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
