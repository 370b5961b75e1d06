//! # pairgit - git lifecycle for AI pair-programming sessions
//!
//! pairgit keeps the repository an assistant is editing in a known state:
//!
//! - **Repository resolution**: find the one repository the session's files
//!   live in, and refuse to guess when they span several
//! - **Staging**: add files the session created that git doesn't track yet
//! - **Commits**: commit every tracked change, with a given message or one
//!   generated from the diff by an OpenAI-compatible model
//! - **Queries**: diffs, tracked files and the dirty flag
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use pairgit::cli::Output;
//! use pairgit::config::PairgitConfig;
//! use pairgit::llm::openai::OpenAiClient;
//! use pairgit::repo::{CommitRequest, RepositoryManager};
//!
//! let config = PairgitConfig::load()?;
//! let output = Output::new(false, false);
//! let client = OpenAiClient::new(&config.llm)?;
//!
//! let manager = RepositoryManager::new(&["src/main.rs"], &output, &client, &config)?;
//! manager.add_new_files(&["src/main.rs"]);
//! if let Some(outcome) = manager.commit(&CommitRequest::default())? {
//!     println!("committed {}", outcome.hash);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod git;
pub mod llm;
pub mod repo;

pub use cli::{Cli, Output, UserIo};
pub use config::PairgitConfig;
pub use repo::{CommitOutcome, CommitRequest, RepoError, RepositoryManager};

/// Result type alias for pairgit operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
