//! Repository lifecycle for a pair-programming session
//!
//! [`RepositoryManager`] resolves the one repository a session works in,
//! stages files the session creates, and commits changes with either a given
//! or a generated message. Query failures degrade to empty results; only
//! resolution failures are fatal.

pub mod commit_message;

use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::UserIo;
use crate::config::{CommitConfig, PairgitConfig};
use crate::git::GitRepo;
use crate::git::commit::{apply_prefix, short_hash, with_context};
use crate::git::paths::relative_to;
use crate::llm::{GenerationError, TextGenerator};
use commit_message::CommitMessageGenerator;

/// Why no repository could be adopted
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("No git repository found")]
    NotFound,

    #[error("Files are in different git repos: {}", format_roots(.roots))]
    MultipleRepos { roots: Vec<PathBuf> },

    #[error(transparent)]
    Git(#[from] anyhow::Error),
}

fn format_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Options for [`RepositoryManager::commit`]
#[derive(Debug, Clone, Default)]
pub struct CommitRequest {
    /// Use this message instead of generating one
    pub message: Option<String>,
    /// Prepended to the subject line
    pub prefix: Option<String>,
    /// Chat transcript; fed to generation and appended to the body
    pub context: Option<String>,
}

/// A commit that was created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Abbreviated commit hash
    pub hash: String,
    /// Subject as committed, prefix included, context excluded
    pub message: String,
}

pub struct RepositoryManager<'a> {
    git: GitRepo,
    io: &'a dyn UserIo,
    messages: CommitMessageGenerator<'a>,
    commit_config: CommitConfig,
}

impl<'a> RepositoryManager<'a> {
    /// Resolve exactly one repository from `fnames` (default: the current directory).
    ///
    /// Paths outside any repository are ignored. Fails when none of them is
    /// inside a repository, or when they span more than one.
    pub fn new<P: AsRef<Path>>(
        fnames: &[P],
        io: &'a dyn UserIo,
        generator: &'a dyn TextGenerator,
        config: &PairgitConfig,
    ) -> Result<Self, RepoError> {
        let candidates: Vec<&Path> = if fnames.is_empty() {
            vec![Path::new(".")]
        } else {
            fnames.iter().map(|p| p.as_ref()).collect()
        };

        let mut roots = BTreeSet::new();
        for candidate in candidates {
            match GitRepo::find_root(candidate)? {
                Some(root) => {
                    tracing::debug!("{} is in repository {}", candidate.display(), root.display());
                    roots.insert(root);
                }
                None => tracing::debug!("{} is not in a git repository", candidate.display()),
            }
        }

        let root = match roots.len() {
            0 => return Err(RepoError::NotFound),
            1 => roots.pop_first().ok_or(RepoError::NotFound)?,
            _ => {
                io.tool_error("Files are in different git repos.");
                return Err(RepoError::MultipleRepos {
                    roots: roots.into_iter().collect(),
                });
            }
        };

        let git = GitRepo::open(&root)?;

        Ok(Self {
            git,
            io,
            messages: CommitMessageGenerator::new(generator, config.llm.models.clone()),
            commit_config: config.commit.clone(),
        })
    }

    /// Absolute working-tree root of the managed repository
    pub fn root(&self) -> &Path {
        self.git.root()
    }

    pub fn git(&self) -> &GitRepo {
        &self.git
    }

    /// The `.git` directory, relative to the current directory when possible
    pub fn git_dir_display(&self) -> String {
        let git_dir = self.git.git_dir();
        let git_dir = git_dir.canonicalize().unwrap_or_else(|_| git_dir.to_path_buf());
        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.canonicalize().unwrap_or(cwd))
            .and_then(|cwd| relative_to(&git_dir, &cwd))
            .unwrap_or(git_dir)
            .display()
            .to_string()
    }

    /// Stage every path in `fnames` that is not tracked yet.
    ///
    /// Relative paths are taken from the repository root. Returns the paths
    /// that were staged.
    pub fn add_new_files<P: AsRef<Path>>(&self, fnames: &[P]) -> Vec<PathBuf> {
        let tracked = self.tracked_files();
        let mut staged = Vec::new();

        for fname in fnames {
            let fname = fname.as_ref();
            let relative = match self.relative_to_root(fname) {
                Some(relative) => relative,
                None => {
                    self.io
                        .tool_error(&format!("{} is outside the repository", fname.display()));
                    continue;
                }
            };

            if tracked.contains(relative.to_string_lossy().as_ref()) {
                continue;
            }

            self.io.tool_output(&format!("Adding {} to git", fname.display()));
            match self.git.stage(&relative) {
                Ok(()) => staged.push(relative),
                Err(e) => self.io.tool_error(&format!("Unable to add {}: {e:#}", fname.display())),
            }
        }

        staged
    }

    /// Commit all tracked modifications.
    ///
    /// Returns `Ok(None)` without committing when the working tree is clean.
    pub fn commit(&self, request: &CommitRequest) -> Result<Option<CommitOutcome>> {
        if !self.git.is_dirty()? {
            return Ok(None);
        }

        let context = request.context.as_deref();
        let message = match request.message.as_deref().filter(|m| !m.is_empty()) {
            Some(message) => Some(message.to_string()),
            None => match self.get_diffs(false, &[]) {
                Ok(diffs) => {
                    tracing::debug!("Diff for commit message:\n{}", diffs);
                    self.get_commit_message(&diffs, context)
                }
                Err(e) => {
                    tracing::warn!("Could not compute diff for commit message: {e:#}");
                    None
                }
            },
        };

        let message = message.unwrap_or_else(|| self.commit_config.fallback_message.clone());
        let message = apply_prefix(&message, request.prefix.as_deref());
        let full_message = with_context(&message, &self.commit_config.context_header, context);

        let oid = self.git.commit_all(&full_message)?;
        let hash = short_hash(oid);
        self.io.tool_output(&format!("Commit {hash} {message}"));

        Ok(Some(CommitOutcome { hash, message }))
    }

    /// Ask the text generation service for a commit message; `None` when it can't
    pub fn get_commit_message(&self, diffs: &str, context: Option<&str>) -> Option<String> {
        match self.messages.generate(diffs, context) {
            Ok(message) => Some(message),
            Err(GenerationError::DiffTooLarge { .. }) => {
                self.io.tool_error(&format!(
                    "Diff is too large for {} to generate a commit message.",
                    self.messages.primary_model()
                ));
                None
            }
            Err(e) => {
                tracing::debug!("Commit message generation failed: {}", e);
                self.io.tool_error("Failed to generate commit message!");
                None
            }
        }
    }

    /// Diff text for `revisions` (default: HEAD against the working tree)
    pub fn get_diffs(&self, pretty: bool, revisions: &[String]) -> Result<String> {
        self.git.diff(revisions, pretty)
    }

    /// Display diffs against HEAD; a no-op on a branch without commits
    pub fn show_diffs(&self, pretty: bool) -> String {
        let has_commits = self.git.has_commits().unwrap_or_else(|e| {
            tracing::debug!("Treating branch as empty: {e:#}");
            false
        });
        if !has_commits {
            return String::new();
        }

        match self.get_diffs(pretty, &[]) {
            Ok(diffs) => {
                if !diffs.is_empty() {
                    self.io.tool_output(diffs.trim_end_matches('\n'));
                }
                diffs
            }
            Err(e) => {
                self.io.tool_error(&format!("Unable to show diffs: {e:#}"));
                String::new()
            }
        }
    }

    /// Files in the latest commit, host-normalized; empty before the first commit
    pub fn tracked_files(&self) -> HashSet<String> {
        self.git.tracked_files().unwrap_or_else(|e| {
            tracing::warn!("Could not list tracked files: {e:#}");
            HashSet::new()
        })
    }

    pub fn is_dirty(&self) -> Result<bool> {
        self.git.is_dirty()
    }

    fn relative_to_root(&self, fname: &Path) -> Option<PathBuf> {
        let joined = if fname.is_absolute() {
            fname.to_path_buf()
        } else {
            self.root().join(fname)
        };
        let resolved = joined.canonicalize().unwrap_or(joined);
        resolved
            .strip_prefix(self.root())
            .ok()
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}


#[cfg(test)]
mod tests;
