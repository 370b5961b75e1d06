//! Commit all tracked changes

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::Session;
use crate::repo::CommitRequest;

#[derive(Args, Debug, Default)]
pub struct CommitArgs {
    /// Commit message; generated from the diff when omitted
    #[arg(short, long)]
    pub message: Option<String>,

    /// Text prepended to the commit subject
    #[arg(long)]
    pub prefix: Option<String>,

    /// File with chat context, used in the prompt and appended to the commit body
    #[arg(long, value_name = "FILE")]
    pub context_file: Option<PathBuf>,
}

pub fn execute(args: CommitArgs, session: &Session) -> Result<()> {
    let context = args
        .context_file
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read context file: {}", path.display()))
        })
        .transpose()?;

    let client = session.text_generator()?;
    let manager = session.manager::<PathBuf>(&client, &[])?;

    let request = CommitRequest {
        message: args.message,
        prefix: args.prefix,
        context,
    };

    if manager.commit(&request)?.is_none() {
        session.output.info("Nothing to commit, working tree clean");
    }

    Ok(())
}
