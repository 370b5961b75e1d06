use anyhow::{Context, Result, bail};
use console::Style;
use git2::{
    Commit, Diff, DiffFormat, DiffOptions, ErrorCode, IndexAddOption, ObjectType, Oid,
    StatusOptions, Tree, TreeWalkMode, TreeWalkResult,
};
use std::collections::HashSet;
use std::path::Path;

use super::GitRepo;
use super::paths::{to_git_path, to_host_path};

impl GitRepo {
    /// Most recent commit on HEAD, or `None` on an unborn branch
    pub fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(
                head.peel_to_commit().context("Failed to read HEAD commit")?,
            )),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }

    /// Whether the active branch has at least one commit
    pub fn has_commits(&self) -> Result<bool> {
        Ok(self.head_commit()?.is_some())
    }

    /// Render a patch as text.
    ///
    /// No revisions compares HEAD against the working tree (index included),
    /// one revision compares that revision against the working tree, and two
    /// compare the trees of both. An unborn HEAD diffs against the empty tree.
    pub fn diff(&self, revisions: &[String], color: bool) -> Result<String> {
        let mut opts = DiffOptions::new();

        let diff = match revisions {
            [] => {
                let head_tree = self.head_tree()?;
                self.repo
                    .diff_tree_to_workdir_with_index(head_tree.as_ref(), Some(&mut opts))
            }
            [rev] => {
                let tree = self.rev_tree(rev)?;
                self.repo
                    .diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))
            }
            [old, new] => {
                let old_tree = self.rev_tree(old)?;
                let new_tree = self.rev_tree(new)?;
                self.repo
                    .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))
            }
            _ => bail!("Expected at most two revisions to diff, got {}", revisions.len()),
        }
        .context("Failed to compute diff")?;

        render_patch(&diff, color)
    }

    /// Stage one path, given relative to the working-tree root, like `git add`.
    ///
    /// Directories stage their non-ignored contents. Ignored paths are refused.
    pub fn stage(&self, relative: &Path) -> Result<()> {
        let git_path = to_git_path(relative);
        if self
            .repo
            .is_path_ignored(Path::new(&git_path))
            .context("Failed to check ignore rules")?
        {
            bail!("{} is ignored by .gitignore", relative.display());
        }

        let mut index = self.repo.index().context("Failed to open index")?;
        index.read(false).context("Failed to reload index")?;
        if self.root.join(relative).is_dir() {
            index
                .add_all([git_path.as_str()], IndexAddOption::DEFAULT, None)
                .with_context(|| format!("Failed to stage directory {}", relative.display()))?;
        } else {
            index
                .add_path(Path::new(&git_path))
                .with_context(|| format!("Failed to stage {}", relative.display()))?;
        }
        index.write().context("Failed to write index")?;
        Ok(())
    }

    /// Commit every modification to tracked files, like `git commit -a`.
    ///
    /// Untracked files are left alone and hooks are never run.
    pub fn commit_all(&self, message: &str) -> Result<Oid> {
        let mut index = self.repo.index().context("Failed to open index")?;
        index.read(false).context("Failed to reload index")?;
        index
            .update_all(["*"], None)
            .context("Failed to refresh tracked files in the index")?;
        index.write().context("Failed to write index")?;

        let tree_id = index.write_tree().context("Failed to write tree")?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self
            .repo
            .signature()
            .context("No commit identity; set user.name and user.email")?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .context("Failed to create commit")?;

        tracing::info!("Created commit {}", oid);
        Ok(oid)
    }

    /// Paths of every blob in the HEAD tree, host-normalized.
    ///
    /// Empty when nothing has been committed yet.
    pub fn tracked_files(&self) -> Result<HashSet<String>> {
        let Some(commit) = self.head_commit()? else {
            return Ok(HashSet::new());
        };
        let tree = commit.tree().context("Failed to read HEAD tree")?;

        let mut files = HashSet::new();
        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.insert(to_host_path(&format!("{dir}{name}")));
                }
            }
            TreeWalkResult::Ok
        })
        .context("Failed to walk HEAD tree")?;

        Ok(files)
    }

    /// Whether the index or working tree differs from HEAD (untracked files ignored)
    pub fn is_dirty(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false);
        opts.include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("Failed to get repository status")?;

        Ok(!statuses.is_empty())
    }

    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.head_commit()? {
            Some(commit) => Ok(Some(commit.tree().context("Failed to read HEAD tree")?)),
            None => Ok(None),
        }
    }

    fn rev_tree(&self, rev: &str) -> Result<Tree<'_>> {
        self.repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_tree())
            .with_context(|| format!("Unknown revision: {rev}"))
    }
}

fn render_patch(diff: &Diff<'_>, color: bool) -> Result<String> {
    let mut out = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            origin @ ('+' | '-' | ' ') => {
                let text = format!("{origin}{content}");
                out.push_str(&paint(origin, &text, color));
            }
            origin => out.push_str(&paint(origin, &content, color)),
        }
        true
    })
    .context("Failed to render diff")?;

    Ok(out)
}

/// Colour one diff line the way `git diff --color` does
fn paint(origin: char, text: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }

    let style = match origin {
        '+' => Style::new().green(),
        '-' => Style::new().red(),
        'H' => Style::new().cyan(),
        'F' => Style::new().bold(),
        _ => return text.to_string(),
    }
    .force_styling(true);

    // Escape codes never wrap the trailing newline
    text.split_inclusive('\n')
        .map(|line| match line.strip_suffix('\n') {
            Some(body) => format!("{}\n", style.apply_to(body)),
            None => style.apply_to(line).to_string(),
        })
        .collect()
}
