//! Snapshot differ integration tests: edges derived from real Python
//! sources at two points in time.

use std::fs;
use std::path::Path;

use flowmap::analysis::{Analyzer, AnalyzerConfig};
use flowmap::diff::{diff_snapshots, ChangeKind};
use flowmap::Snapshot;
use tempfile::TempDir;

fn analyze(root: &Path, name: &str, contents: &str) -> Snapshot {
    let path = root.join(name);
    fs::write(&path, contents).unwrap();
    Analyzer::new(AnalyzerConfig {
        root: Some(root.to_path_buf()),
        generated_at: Some("2026-01-01T00:00:00Z".to_string()),
        ..Default::default()
    })
    .unwrap()
    .analyze_files(&[path])
}

#[test]
fn test_new_call_edge_reported_added() {
    let dir = TempDir::new().unwrap();
    let prev = analyze(dir.path(), "app.py", "x = 1\n");
    let current = analyze(dir.path(), "app.py", "x = 1\ny = process(x)\n");

    let report = diff_snapshots(Some(&prev), &current, None);
    assert_eq!(report.added, 1);
    assert_eq!(report.changes[0].source, "x");
    assert_eq!(report.changes[0].target, "y");
    assert_eq!(report.changes[0].current_labels, "process");
}

#[test]
fn test_callee_rename_reported_modified() {
    let dir = TempDir::new().unwrap();
    let prev = analyze(dir.path(), "app.py", "y = process(x)\n");
    let current = analyze(dir.path(), "app.py", "y = process_v2(x)\n");

    let report = diff_snapshots(Some(&prev), &current, None);
    assert_eq!(report.modified, 1);
    assert_eq!(report.added, 0);
    assert_eq!(report.removed, 0);
    let change = &report.changes[0];
    assert_eq!(change.kind, ChangeKind::Modified);
    assert_eq!(change.previous_labels, "process");
    assert_eq!(change.current_labels, "process_v2");
}

#[test]
fn test_deleted_call_reported_removed() {
    let dir = TempDir::new().unwrap();
    let prev = analyze(dir.path(), "app.py", "y = process(x)\n");
    let current = analyze(dir.path(), "app.py", "y = x\n");

    let report = diff_snapshots(Some(&prev), &current, None);
    assert_eq!(report.removed, 1);
    // the plain assignment still produces an edge, just unlabeled
    assert_eq!(report.unlabeled_edges, 1);
}

#[test]
fn test_plain_assignments_never_compared() {
    let dir = TempDir::new().unwrap();
    let prev = analyze(dir.path(), "app.py", "b = a\n");
    let current = analyze(dir.path(), "app.py", "c = a\n");

    let report = diff_snapshots(Some(&prev), &current, None);
    assert_eq!(report.total_compared(), 0);
    assert_eq!(report.unlabeled_edges, 1);
}

#[test]
fn test_missing_previous_everything_added() {
    let dir = TempDir::new().unwrap();
    let current = analyze(dir.path(), "app.py", "y = f(a)\nz = g(b)\n");

    let report = diff_snapshots(None, &current, None);
    assert_eq!(report.added, 2);
    assert_eq!(report.removed, 0);
    assert!(report
        .changes
        .iter()
        .all(|c| c.kind == ChangeKind::Added && c.previous_labels.is_empty()));
}

#[test]
fn test_file_filter_restricts_comparison() {
    let dir = TempDir::new().unwrap();
    let one = dir.path().join("one.py");
    let two = dir.path().join("two.py");
    fs::write(&one, "y = f(a)\n").unwrap();
    fs::write(&two, "z = g(b)\n").unwrap();
    let current = Analyzer::new(AnalyzerConfig {
        root: Some(dir.path().to_path_buf()),
        generated_at: Some("t".to_string()),
        ..Default::default()
    })
    .unwrap()
    .analyze_files(&[one, two]);

    let report = diff_snapshots(None, &current, Some("one"));
    assert_eq!(report.added, 1);
    assert_eq!(report.filtered_out, 1);
    assert_eq!(report.changes[0].target, "y");
}
