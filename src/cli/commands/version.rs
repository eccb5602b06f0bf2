//! Version command implementation

use anyhow::Result;

use crate::cli::Output;

/// Execute the version command
pub async fn execute(output: &Output) -> Result<()> {
    output.header(crate::PKG_NAME);

    output.key_value("Version:", crate::VERSION);
    output.key_value("Description:", crate::PKG_DESCRIPTION);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
    );
    output.blank_line();

    output.success("Run 'repo-sync --help' for usage information");
    Ok(())
}
