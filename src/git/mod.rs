//! Git integration layer for pairgit
//!
//! This module wraps git2 behind the handful of operations the repository
//! manager needs: root discovery, diffs, staging, commit-all, tracked blobs
//! and the dirty check.

pub mod commit;
pub mod operations;
pub mod paths;

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository whose working tree starts at `root`
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let repo = Repository::open(root)
            .with_context(|| format!("Failed to open Git repository at {}", root.display()))?;
        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let root = canonical(workdir)?;

        Ok(GitRepo { repo, root })
    }

    /// Find the working-tree root enclosing `path`, searching its ancestors.
    ///
    /// Returns `Ok(None)` when `path` is not inside any repository (or only
    /// inside a bare one). Paths that do not exist yet are searched from
    /// their nearest existing ancestor.
    pub fn find_root(path: &Path) -> Result<Option<PathBuf>> {
        let absolute = std::path::absolute(path)
            .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
        let Some(start) = search_start(&absolute) else {
            return Ok(None);
        };

        match Repository::discover(start) {
            Ok(repo) => match repo.workdir() {
                Some(workdir) => Ok(Some(canonical(workdir)?)),
                None => {
                    tracing::debug!("Ignoring bare repository at {}", repo.path().display());
                    Ok(None)
                }
            },
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to look for a repository around {}", absolute.display())
            }),
        }
    }

    /// Absolute, canonical working-tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.git` directory
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        let shorthand = head.shorthand().unwrap_or("HEAD");
        Ok(shorthand.to_string())
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Failed to canonicalize {}", path.display()))
}

/// Nearest existing directory at or above `path`
fn search_start(path: &Path) -> Option<&Path> {
    let mut current = Some(path);
    while let Some(candidate) = current {
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = candidate.parent();
    }
    None
}
