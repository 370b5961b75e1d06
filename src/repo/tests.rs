use super::test_support::{RecordingIo, ScriptedGenerator};
use super::*;
use crate::git::paths::to_host_path;
use crate::git::test_support::{commit_files, init_repo, write_file};
use git2::Repository;
use tempfile::TempDir;

fn config() -> PairgitConfig {
    PairgitConfig::default()
}

/// Repository with `a/b.txt` and `c.txt` committed
fn committed_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = init_repo(temp_dir.path());
    write_file(temp_dir.path(), "a/b.txt", "one\n");
    write_file(temp_dir.path(), "c.txt", "two\n");
    commit_files(&repo, &["a/b.txt", "c.txt"], "initial");
    (temp_dir, repo)
}

fn head_message(repo: &Repository) -> String {
    repo.head()
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .message()
        .unwrap()
        .to_string()
}

#[test]
fn test_two_paths_in_one_repo_resolve_to_its_root() {
    let (temp_dir, _repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);

    let paths = [temp_dir.path().join("a/b.txt"), temp_dir.path().join("c.txt")];
    let manager = RepositoryManager::new(&paths, &io, &generator, &config()).unwrap();

    assert_eq!(manager.root(), temp_dir.path().canonicalize().unwrap());
    assert!(io.errors.borrow().is_empty());
}

#[test]
fn test_path_outside_any_repo_is_ignored() {
    let (temp_dir, _repo) = committed_repo();
    let outside = TempDir::new().unwrap();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);

    let paths = [outside.path().to_path_buf(), temp_dir.path().join("c.txt")];
    let manager = RepositoryManager::new(&paths, &io, &generator, &config()).unwrap();

    assert_eq!(manager.root(), temp_dir.path().canonicalize().unwrap());
}

#[test]
fn test_paths_in_different_repos_fail() {
    let (first, _r1) = committed_repo();
    let (second, _r2) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);

    let paths = [first.path().join("c.txt"), second.path().join("c.txt")];
    let result = RepositoryManager::new(&paths, &io, &generator, &config());

    match result {
        Err(RepoError::MultipleRepos { roots }) => assert_eq!(roots.len(), 2),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("expected MultipleRepos"),
    }
    assert_eq!(
        io.errors.borrow().as_slice(),
        ["Files are in different git repos."]
    );
}

#[test]
fn test_no_repository_found() {
    let outside = TempDir::new().unwrap();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);

    let result = RepositoryManager::new(&[outside.path()], &io, &generator, &config());
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[test]
fn test_commit_on_clean_tree_is_a_no_op() {
    let (temp_dir, repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![Ok("should not be used".to_string())]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    let before = repo.head().unwrap().target();
    assert_eq!(manager.commit(&CommitRequest::default()).unwrap(), None);
    assert_eq!(repo.head().unwrap().target(), before);
    assert!(generator.calls().is_empty());
    assert!(io.outputs.borrow().is_empty());
}

#[test]
fn test_explicit_message_skips_generation() {
    let (temp_dir, repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    write_file(temp_dir.path(), "c.txt", "changed\n");
    let outcome = manager
        .commit(&CommitRequest {
            message: Some("Update c".to_string()),
            ..Default::default()
        })
        .unwrap()
        .unwrap();

    assert!(generator.calls().is_empty());
    assert_eq!(outcome.message, "Update c");
    assert_eq!(outcome.hash.len(), 7);
    assert_eq!(head_message(&repo), "Update c");
    assert_eq!(
        io.outputs.borrow().last().unwrap(),
        &format!("Commit {} Update c", outcome.hash)
    );
    assert!(!manager.is_dirty().unwrap());
}

#[test]
fn test_generated_message_with_prefix_and_context() {
    let (temp_dir, repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![Ok("\"Changed c\"".to_string())]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    write_file(temp_dir.path(), "c.txt", "changed\n");
    let outcome = manager
        .commit(&CommitRequest {
            prefix: Some("aider: ".to_string()),
            context: Some("USER: change c".to_string()),
            ..Default::default()
        })
        .unwrap()
        .unwrap();

    assert_eq!(outcome.message, "aider: Changed c");
    assert_eq!(
        head_message(&repo),
        "aider: Changed c\n\n# Aider chat conversation:\n\nUSER: change c"
    );

    // The prompt carried the context ahead of the labelled diff
    let prompts = generator.prompts();
    let user_prompt = &prompts[0][1].content;
    assert!(user_prompt.starts_with("USER: change c\n# Diffs:\n"));
    assert!(user_prompt.contains("+changed"));
}

#[test]
fn test_failed_generation_uses_fallback_message() {
    let (temp_dir, repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![
        Err(GenerationError::RequestRejected("nope".into())),
        Err(GenerationError::RequestRejected("nope".into())),
    ]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    write_file(temp_dir.path(), "c.txt", "changed\n");
    let outcome = manager.commit(&CommitRequest::default()).unwrap().unwrap();

    assert_eq!(outcome.message, "(no commit message provided)");
    assert_eq!(head_message(&repo), "(no commit message provided)");
    assert_eq!(generator.calls(), vec!["gpt-3.5-turbo", "gpt-3.5-turbo-16k"]);
    assert_eq!(
        io.errors.borrow().as_slice(),
        ["Failed to generate commit message!"]
    );
}

#[test]
fn test_oversized_diff_falls_back_without_calling_service() {
    let (temp_dir, _repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![Ok("unused".to_string())]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    write_file(
        temp_dir.path(),
        "c.txt",
        &"x".repeat(commit_message::MAX_DIFF_CHARS + 10),
    );
    let outcome = manager.commit(&CommitRequest::default()).unwrap().unwrap();

    assert!(generator.calls().is_empty());
    assert_eq!(outcome.message, "(no commit message provided)");
    assert_eq!(
        io.errors.borrow().as_slice(),
        ["Diff is too large for gpt-3.5-turbo to generate a commit message."]
    );
}

#[test]
fn test_add_new_files_stages_only_untracked() {
    let (temp_dir, _repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    write_file(temp_dir.path(), "src/new.rs", "fn main() {}\n");
    let new_file = PathBuf::from("src").join("new.rs");
    let staged = manager.add_new_files(&[PathBuf::from("c.txt"), new_file.clone()]);

    assert_eq!(staged, vec![new_file.clone()]);
    assert_eq!(
        io.outputs.borrow().as_slice(),
        [format!("Adding {} to git", new_file.display())]
    );
    // Staged but uncommitted files make the tree dirty
    assert!(manager.is_dirty().unwrap());
}

#[test]
fn test_add_new_files_rejects_paths_outside_root() {
    let (temp_dir, _repo) = committed_repo();
    let outside = TempDir::new().unwrap();
    write_file(outside.path(), "stray.txt", "x\n");
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    let staged = manager.add_new_files(&[outside.path().join("stray.txt")]);
    assert!(staged.is_empty());
    assert_eq!(io.errors.borrow().len(), 1);
}

#[test]
fn test_add_new_files_stages_directory_contents() {
    let (temp_dir, _repo) = committed_repo();
    write_file(temp_dir.path(), ".gitignore", "*.log\n");
    write_file(temp_dir.path(), "sub/x.txt", "x\n");
    write_file(temp_dir.path(), "sub/deep/y.txt", "y\n");
    write_file(temp_dir.path(), "sub/trace.log", "noise\n");
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    let staged = manager.add_new_files(&["sub"]);
    assert_eq!(staged, vec![PathBuf::from("sub")]);
    assert!(io.errors.borrow().is_empty());

    manager
        .commit(&CommitRequest {
            message: Some("Add sub".to_string()),
            ..Default::default()
        })
        .unwrap()
        .expect("staged directory makes a commit");

    let tracked = manager.tracked_files();
    assert!(tracked.contains(&to_host_path("sub/x.txt")));
    assert!(tracked.contains(&to_host_path("sub/deep/y.txt")));
    assert!(!tracked.contains(&to_host_path("sub/trace.log")));
}

#[test]
fn test_add_new_files_refuses_ignored_file() {
    let (temp_dir, _repo) = committed_repo();
    write_file(temp_dir.path(), ".gitignore", "*.log\n");
    write_file(temp_dir.path(), "debug.log", "noise\n");
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    let staged = manager.add_new_files(&["debug.log"]);

    assert!(staged.is_empty());
    let errors = io.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("ignored by .gitignore"));
    // Nothing reached the index, so the tree stays clean
    assert!(!manager.is_dirty().unwrap());
}

#[test]
fn test_tracked_files_and_dirty_state() {
    let temp_dir = TempDir::new().unwrap();
    let repo = init_repo(temp_dir.path());
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    assert!(manager.tracked_files().is_empty());

    write_file(temp_dir.path(), "a/b.txt", "one\n");
    write_file(temp_dir.path(), "c.txt", "two\n");
    commit_files(&repo, &["a/b.txt", "c.txt"], "initial");

    let expected: HashSet<String> = [to_host_path("a/b.txt"), to_host_path("c.txt")]
        .into_iter()
        .collect();
    assert_eq!(manager.tracked_files(), expected);

    assert!(!manager.is_dirty().unwrap());
    write_file(temp_dir.path(), "a/b.txt", "edited\n");
    assert!(manager.is_dirty().unwrap());
    manager
        .commit(&CommitRequest {
            message: Some("Edit b".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert!(!manager.is_dirty().unwrap());
}

#[test]
fn test_show_diffs_without_commits_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    write_file(temp_dir.path(), "new.txt", "hello\n");
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    manager.add_new_files(&["new.txt"]);
    assert_eq!(manager.show_diffs(false), "");
}

#[test]
fn test_show_diffs_displays_changes() {
    let (temp_dir, _repo) = committed_repo();
    let io = RecordingIo::default();
    let generator = ScriptedGenerator::new(vec![]);
    let manager = RepositoryManager::new(&[temp_dir.path()], &io, &generator, &config()).unwrap();

    write_file(temp_dir.path(), "c.txt", "three\n");
    let diffs = manager.show_diffs(false);

    assert!(diffs.contains("+three"));
    assert_eq!(io.outputs.borrow().len(), 1);
    assert!(io.outputs.borrow()[0].contains("-two"));
}
