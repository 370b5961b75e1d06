//! Stage new files

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::{Session, absolute_paths};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Files to stage; already-tracked files are skipped
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

pub fn execute(args: AddArgs, session: &Session) -> Result<()> {
    let files = absolute_paths(&args.files)?;

    let client = session.text_generator()?;
    // Without -C the files themselves locate the repository
    let manager = session.manager(&client, &files)?;

    let staged = manager.add_new_files(&files);
    if staged.is_empty() {
        session.output.info("No new files to add");
    }

    Ok(())
}
