//! Show repository status
//!
//! Displays the managed repository, its branch and whether the working tree
//! has uncommitted changes.

use anyhow::Result;
use std::path::PathBuf;

use super::Session;

/// Execute the status command
pub fn execute(session: &Session) -> Result<()> {
    let client = session.text_generator()?;
    let manager = session.manager::<PathBuf>(&client, &[])?;
    let output = &session.output;

    output.header("pairgit status");
    output.table_row("Repository", &manager.root().display().to_string());
    output.table_row("Git directory", &manager.git_dir_display());

    let branch = manager
        .git()
        .current_branch()
        .unwrap_or_else(|_| "(no commits yet)".to_string());
    output.table_row("Branch", &branch);
    output.table_row("Tracked files", &manager.tracked_files().len().to_string());

    if manager.is_dirty()? {
        output.warning("Working tree has uncommitted changes");
    } else {
        output.success("Working tree clean");
    }

    Ok(())
}
