//! Status command implementation for flowmap

use anyhow::Result;
use flowmap::output::{generate_execution_id, output_json, JsonResponse, StatusResponse};
use flowmap::{OutputFormat, Snapshot};
use std::path::PathBuf;

pub fn run_status(snapshot_path: PathBuf, output_format: OutputFormat) -> Result<()> {
    let snapshot = Snapshot::load(&snapshot_path)?;
    let meta = &snapshot.metadata;

    match output_format {
        OutputFormat::Json => {
            let response = StatusResponse {
                snapshot: snapshot_path.display().to_string(),
                schema_version: meta.schema_version.clone(),
                generated_at: meta.generated_at.clone(),
                total_variables: meta.total_variables,
                total_definitions: meta.total_definitions,
                total_uses: meta.total_uses,
                total_dataflow_edges: meta.total_dataflow_edges,
                functions: meta.functions.len(),
                skipped_files: meta.skipped_files.len(),
                digest: snapshot.digest(),
            };
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(response, &exec_id))?;
        }
        OutputFormat::Human => {
            println!("Snapshot: {}", snapshot_path.display());
            println!("  Schema version: {}", meta.schema_version);
            println!("  Generated at:   {}", meta.generated_at);
            println!("  Variables:      {}", meta.total_variables);
            println!("  Definitions:    {}", meta.total_definitions);
            println!("  Uses:           {}", meta.total_uses);
            println!("  Dataflow edges: {}", meta.total_dataflow_edges);
            println!("  Functions:      {}", meta.functions.len());
            println!("  Skipped files:  {}", meta.skipped_files.len());
            println!("  Digest:         {}", snapshot.digest());
        }
    }
    Ok(())
}
