//! List tracked files

use anyhow::Result;
use std::path::PathBuf;

use super::Session;

pub fn execute(session: &Session) -> Result<()> {
    let client = session.text_generator()?;
    let manager = session.manager::<PathBuf>(&client, &[])?;

    let mut files: Vec<String> = manager.tracked_files().into_iter().collect();
    files.sort();

    for file in &files {
        session.output.plain(file);
    }

    Ok(())
}
