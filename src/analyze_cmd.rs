//! Analyze command implementation for flowmap

use anyhow::{Context, Result};
use flowmap::analysis::{discover_files, Analyzer, AnalyzerConfig};
use flowmap::output::{generate_execution_id, output_json, AnalyzeResponse, JsonResponse};
use flowmap::{Language, OutputFormat, Snapshot};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run_analyze(
    mut files: Vec<PathBuf>,
    root: Option<PathBuf>,
    language: Option<Language>,
    clang_args: Vec<String>,
    out: Option<PathBuf>,
    generated_at: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    if let Some(root) = &root {
        let discovered = discover_files(root);
        eprintln!("Discovered {} file(s) under {}", discovered.len(), root.display());
        files.extend(discovered);
        files.sort();
        files.dedup();
    }

    let config = AnalyzerConfig {
        root,
        language,
        clang_args,
        generated_at,
    };
    let mut analyzer = Analyzer::new(config)?;
    let snapshot = analyzer.analyze_files(&files);

    if let Some(out) = &out {
        snapshot
            .save(out)
            .with_context(|| format!("Failed to write snapshot to {}", out.display()))?;
    }

    report_snapshot(&snapshot, files.len(), out, None, output_format)
}

pub fn report_snapshot(
    snapshot: &Snapshot,
    input_count: usize,
    out: Option<PathBuf>,
    revision: Option<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let meta = &snapshot.metadata;
    let analyzed = input_count.saturating_sub(meta.skipped_files.len());
    match output_format {
        OutputFormat::Json => {
            let response = AnalyzeResponse {
                analyzed_files: analyzed,
                skipped_files: meta.skipped_files.clone(),
                total_variables: meta.total_variables,
                total_definitions: meta.total_definitions,
                total_uses: meta.total_uses,
                total_dataflow_edges: meta.total_dataflow_edges,
                digest: snapshot.digest(),
                out: out.map(|p| p.display().to_string()),
                revision,
            };
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(response, &exec_id))?;
        }
        OutputFormat::Human => {
            if let Some(rev) = &revision {
                println!("Revision: {}", rev);
            }
            println!("Analyzed {} file(s), skipped {}", analyzed, meta.skipped_files.len());
            println!("  Variables:      {}", meta.total_variables);
            println!("  Definitions:    {}", meta.total_definitions);
            println!("  Uses:           {}", meta.total_uses);
            println!("  Dataflow edges: {}", meta.total_dataflow_edges);
            println!("  Digest:         {}", snapshot.digest());
            for skipped in &meta.skipped_files {
                eprintln!("  skipped: {}", skipped);
            }
            if let Some(out) = &out {
                println!("Snapshot written to {}", out.display());
            }
        }
    }
    Ok(())
}
