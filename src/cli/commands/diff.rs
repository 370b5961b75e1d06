//! Show diffs

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::Session;

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Revisions to compare: none for HEAD against the working tree,
    /// one for that revision against the working tree, two for a range
    #[arg(num_args = 0..=2, value_name = "REV")]
    pub revisions: Vec<String>,
}

pub fn execute(args: DiffArgs, session: &Session) -> Result<()> {
    // Global --no-color (or a non-terminal stdout) turns colouring off
    let pretty = console::colors_enabled();

    let client = session.text_generator()?;
    let manager = session.manager::<PathBuf>(&client, &[])?;

    if args.revisions.is_empty() {
        manager.show_diffs(pretty);
        return Ok(());
    }

    let diffs = manager.get_diffs(pretty, &args.revisions)?;
    if !diffs.is_empty() {
        session.output.plain(diffs.trim_end_matches('\n'));
    }

    Ok(())
}
