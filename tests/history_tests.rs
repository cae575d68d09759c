//! Git history tests: build small repositories with git2 and verify
//! revision-based re-analysis never reads the working tree.

use std::fs;
use std::path::Path;

use flowmap::analysis::{Analyzer, AnalyzerConfig};
use flowmap::history::HistoryReader;
use flowmap::SkipReason;
use tempfile::TempDir;

fn commit_all(repo: &git2::Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn init_repo(dir: &Path) -> git2::Repository {
    git2::Repository::init(dir).unwrap()
}

#[test]
fn test_file_at_revision_reads_committed_content() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("app.py"), "a = 1\n").unwrap();
    commit_all(&repo, "first");

    // dirty the working tree after committing
    fs::write(dir.path().join("app.py"), "a = 999\nb = a\n").unwrap();

    let reader = HistoryReader::open(dir.path()).unwrap();
    let content = reader
        .file_at_revision("HEAD", Path::new("app.py"))
        .unwrap()
        .unwrap();
    assert_eq!(content, b"a = 1\n");
}

#[test]
fn test_file_missing_in_revision_is_none() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("app.py"), "a = 1\n").unwrap();
    commit_all(&repo, "first");

    let reader = HistoryReader::open(dir.path()).unwrap();
    let content = reader
        .file_at_revision("HEAD", Path::new("later.py"))
        .unwrap();
    assert!(content.is_none());
}

#[test]
fn test_analyze_at_revision_sees_old_dataflow() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("app.py"), "x = 1\ny = f(x)\n").unwrap();
    let first = commit_all(&repo, "first");
    fs::write(dir.path().join("app.py"), "x = 1\ny = g(x)\n").unwrap();
    commit_all(&repo, "second");

    let reader = HistoryReader::open(dir.path()).unwrap();
    let mut analyzer = Analyzer::new(AnalyzerConfig {
        root: Some(dir.path().to_path_buf()),
        generated_at: Some("t".to_string()),
        ..Default::default()
    })
    .unwrap();

    let files = vec![dir.path().join("app.py")];
    let old = analyzer
        .analyze_at_revision(&reader, &first.to_string(), &files)
        .unwrap();
    let new = analyzer
        .analyze_at_revision(&reader, "HEAD", &files)
        .unwrap();

    let old_label = old.variables["y"].dataflow_incoming[0]
        .called_function
        .clone();
    let new_label = new.variables["y"].dataflow_incoming[0]
        .called_function
        .clone();
    assert_eq!(old_label.as_deref(), Some("f"));
    assert_eq!(new_label.as_deref(), Some("g"));
}

#[test]
fn test_missing_file_becomes_skip_marker() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("app.py"), "a = 1\n").unwrap();
    commit_all(&repo, "first");

    let reader = HistoryReader::open(dir.path()).unwrap();
    let mut analyzer = Analyzer::new(AnalyzerConfig {
        root: Some(dir.path().to_path_buf()),
        generated_at: Some("t".to_string()),
        ..Default::default()
    })
    .unwrap();

    let files = vec![dir.path().join("ghost.py")];
    let snapshot = analyzer
        .analyze_at_revision(&reader, "HEAD", &files)
        .unwrap();
    assert_eq!(snapshot.metadata.skipped_files.len(), 1);
    assert_eq!(
        snapshot.metadata.skipped_files[0].reason,
        SkipReason::MissingInRevision
    );
}

#[test]
fn test_unresolvable_revision_degrades_to_skip_markers() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("app.py"), "a = 1\n").unwrap();
    commit_all(&repo, "first");

    let reader = HistoryReader::open(dir.path()).unwrap();
    let mut analyzer = Analyzer::new(AnalyzerConfig {
        root: Some(dir.path().to_path_buf()),
        generated_at: Some("t".to_string()),
        ..Default::default()
    })
    .unwrap();

    let files = vec![dir.path().join("app.py")];
    let snapshot = analyzer
        .analyze_at_revision(&reader, "no-such-rev", &files)
        .unwrap();
    assert_eq!(snapshot.metadata.total_variables, 0);
    assert_eq!(snapshot.metadata.skipped_files.len(), 1);
    assert_eq!(
        snapshot.metadata.skipped_files[0].reason,
        SkipReason::MissingInRevision
    );
}

#[test]
fn test_list_commits_newest_first() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    fs::write(dir.path().join("app.py"), "a = 1\n").unwrap();
    commit_all(&repo, "first");
    fs::write(dir.path().join("app.py"), "a = 2\n").unwrap();
    commit_all(&repo, "second");

    let reader = HistoryReader::open(dir.path()).unwrap();
    let commits = reader.list_commits().unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].summary, "second");
    assert_eq!(commits[1].summary, "first");
    assert_eq!(commits[0].short_id.len(), 7);
}
