//! Command implementations for the pairgit CLI
//!
//! Each command lives in its own module with its clap arguments and an
//! `execute` entry point.

pub mod add;
pub mod commit;
pub mod config;
pub mod diff;
pub mod files;
pub mod status;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config::PairgitConfig;
use crate::llm::TextGenerator;
use crate::llm::openai::OpenAiClient;
use crate::repo::RepositoryManager;

/// Everything a command needs besides its own arguments
pub struct Session {
    pub output: Output,
    pub config: PairgitConfig,
    /// Candidate paths from `-C/--path`
    pub paths: Vec<PathBuf>,
}

impl Session {
    /// Text generation client built from `[llm]`
    pub fn text_generator(&self) -> Result<OpenAiClient> {
        Ok(OpenAiClient::new(&self.config.llm)?)
    }

    /// Resolve the managed repository from `-C` paths, or from `fallback`
    /// when none were given (an empty fallback means the current directory)
    pub fn manager<'a, P: AsRef<Path>>(
        &'a self,
        generator: &'a dyn TextGenerator,
        fallback: &[P],
    ) -> Result<RepositoryManager<'a>> {
        let candidates: Vec<PathBuf> = if self.paths.is_empty() {
            fallback.iter().map(|p| p.as_ref().to_path_buf()).collect()
        } else {
            self.paths.clone()
        };

        let manager = RepositoryManager::new(&candidates, &self.output, generator, &self.config)?;
        self.output
            .verbose(&format!("Repository: {}", manager.root().display()));
        Ok(manager)
    }
}

/// Make CLI path arguments absolute against the current directory
pub fn absolute_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    paths
        .iter()
        .map(|path| Ok(std::path::absolute(path)?))
        .collect()
}
