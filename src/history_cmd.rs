//! History command implementation for flowmap
//!
//! Re-analyzes files as they were at a git revision, reading blobs
//! directly so the working tree is never touched.

use anyhow::{Context, Result};
use flowmap::analysis::{Analyzer, AnalyzerConfig};
use flowmap::history::HistoryReader;
use flowmap::output::{generate_execution_id, output_json, CommitListResponse, JsonResponse};
use flowmap::OutputFormat;
use std::path::{Path, PathBuf};

use crate::analyze_cmd::report_snapshot;

pub fn run_history(
    repo: PathBuf,
    rev: Option<String>,
    files: Vec<PathBuf>,
    out: Option<PathBuf>,
    list: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let reader = HistoryReader::open(&repo)?;

    if list {
        return list_commits(&reader, &repo, output_format);
    }

    let rev = rev.context("history requires --rev")?;
    let config = AnalyzerConfig {
        root: reader.workdir().map(|p| p.to_path_buf()),
        ..Default::default()
    };
    let mut analyzer = Analyzer::new(config)?;
    let snapshot = analyzer.analyze_at_revision(&reader, &rev, &files)?;

    if let Some(out) = &out {
        snapshot
            .save(out)
            .with_context(|| format!("Failed to write snapshot to {}", out.display()))?;
    }

    report_snapshot(&snapshot, files.len(), out, Some(rev), output_format)
}

fn list_commits(reader: &HistoryReader, repo: &Path, output_format: OutputFormat) -> Result<()> {
    let commits = reader.list_commits()?;
    match output_format {
        OutputFormat::Json => {
            let response = CommitListResponse {
                repo: repo.display().to_string(),
                commits,
            };
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(response, &exec_id))?;
        }
        OutputFormat::Human => {
            for commit in commits {
                println!("{} {}", commit.short_id, commit.summary);
            }
        }
    }
    Ok(())
}
