//! Command-line interface for pairgit
//!
//! A thin layer over [`crate::repo::RepositoryManager`]: it parses arguments,
//! loads configuration and wires the terminal output and text generation
//! client into the manager.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::{Output, UserIo};

use crate::config::PairgitConfig;
use commands::Session;

/// pairgit - git lifecycle for AI pair-programming sessions
#[derive(Parser)]
#[command(name = "pairgit", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// File or directory used to locate the repository (repeatable)
    #[arg(short = 'C', long = "path", value_name = "PATH", global = true)]
    pub paths: Vec<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Commit all tracked changes, generating a message when none is given
    Commit(commands::commit::CommitArgs),
    /// Stage files that are not tracked yet
    Add(commands::add::AddArgs),
    /// Show changes against HEAD or between revisions
    Diff(commands::diff::DiffArgs),
    /// List files tracked in the latest commit
    Files,
    /// Show repository status
    Status,
    /// Configuration management
    Config(commands::config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let config = PairgitConfig::load_with_custom_config(self.config.as_deref())?;
        if self.no_color || !config.output.color {
            console::set_colors_enabled(false);
        }

        let session = Session {
            output: Output::new(self.verbose > 0, self.quiet),
            config,
            paths: self.paths,
        };

        match self.command {
            Some(Commands::Commit(args)) => commands::commit::execute(args, &session),
            Some(Commands::Add(args)) => commands::add::execute(args, &session),
            Some(Commands::Diff(args)) => commands::diff::execute(args, &session),
            Some(Commands::Files) => commands::files::execute(&session),
            Some(Commands::Status) => commands::status::execute(&session),
            Some(Commands::Config(args)) => commands::config::execute(args, &session),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug,reqwest=info,hyper_util=info"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs go to stderr; stdout carries diffs and listings
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
