//! Diff command implementation for flowmap

use anyhow::Result;
use flowmap::diff::diff_snapshots;
use flowmap::output::{generate_execution_id, output_json, DiffResponse, JsonResponse};
use flowmap::{OutputFormat, Snapshot, SnapshotError};
use std::path::PathBuf;

pub fn run_diff(
    current: PathBuf,
    previous: Option<PathBuf>,
    file_filter: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let current_snapshot = Snapshot::load(&current)?;
    // An unreadable previous snapshot degrades to "no previous": every
    // call-labeled current edge then classifies as added. Only the
    // current snapshot is load-or-fail.
    let previous_snapshot = match &previous {
        Some(path) => match Snapshot::load(path) {
            Ok(snapshot) => Some(snapshot),
            Err(SnapshotError::Io { .. }) => {
                eprintln!(
                    "Warning: previous snapshot {} is unreadable; reporting every edge as added",
                    path.display()
                );
                None
            }
            Err(err) => return Err(err.into()),
        },
        None => None,
    };

    let report = diff_snapshots(
        previous_snapshot.as_ref(),
        &current_snapshot,
        file_filter.as_deref(),
    );

    match output_format {
        OutputFormat::Json => {
            let response = DiffResponse {
                current: current.display().to_string(),
                previous: previous.map(|p| p.display().to_string()),
                file_filter,
                report,
            };
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(response, &exec_id))?;
        }
        OutputFormat::Human => {
            println!(
                "Compared {} call-labeled edge pair(s): {} added, {} modified, {} removed, {} unchanged",
                report.total_compared(),
                report.added,
                report.modified,
                report.removed,
                report.unchanged
            );
            if report.unlabeled_edges > 0 {
                println!("  ({} unlabeled edge(s) not compared)", report.unlabeled_edges);
            }
            if report.filtered_out > 0 {
                println!("  ({} edge(s) excluded by file filter)", report.filtered_out);
            }
            for change in &report.changes {
                match change.kind {
                    flowmap::diff::ChangeKind::Unchanged => {}
                    kind => {
                        let labels = if change.previous_labels.is_empty() {
                            change.current_labels.clone()
                        } else if change.current_labels.is_empty() {
                            change.previous_labels.clone()
                        } else {
                            format!("{} -> {}", change.previous_labels, change.current_labels)
                        };
                        println!(
                            "  {}: {} -> {} [{}]",
                            kind, change.source, change.target, labels
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
