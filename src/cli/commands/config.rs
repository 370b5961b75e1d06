//! Configuration command implementations

use anyhow::Result;
use clap::{Args, Subcommand};

use super::Session;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the merged configuration as TOML
    Show,
    /// Validate the merged configuration
    Validate,
}

/// Execute config commands
pub fn execute(args: ConfigArgs, session: &Session) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show(session),
        ConfigCommands::Validate => validate(session),
    }
}

fn show(session: &Session) -> Result<()> {
    session.output.plain(session.config.to_toml()?.trim_end());
    Ok(())
}

fn validate(session: &Session) -> Result<()> {
    // Loading already validated; report what the session will use
    session.config.validate()?;

    let output = &session.output;
    output.success("Configuration is valid");
    output.table_row("Models", &session.config.llm.models.join(", "));
    output.table_row("API base", &session.config.llm.api_base);
    output.table_row(
        "API key",
        if session.config.llm.resolve_api_key().is_some() {
            "set"
        } else {
            "missing"
        },
    );

    Ok(())
}
