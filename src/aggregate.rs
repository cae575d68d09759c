//! Aggregator: merges per-file facts into the variable-keyed mapping.
//!
//! Merge key is the bare variable name, so same-named variables in
//! different functions collapse into one record. The same input file set
//! in the same order yields byte-identical snapshots.

use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostics::{SkipReason, SkippedFile};
use crate::flow;
use crate::ingest::FileFacts;
use crate::snapshot::{Snapshot, SnapshotMetadata, VariableRecord, SNAPSHOT_SCHEMA_VERSION};

/// Accumulates facts from every analyzed file and produces one Snapshot.
///
/// Exclusively owns the variable mapping for one analysis run.
#[derive(Debug, Default)]
pub struct Aggregator {
    variables: BTreeMap<String, VariableRecord>,
    functions: BTreeSet<String>,
    skipped: Vec<SkippedFile>,
    total_definitions: usize,
    total_uses: usize,
    total_edges: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's facts into the mapping.
    ///
    /// Edges are derived here, and each edge is recorded once as outgoing
    /// on its source record and once as incoming on its target record. A
    /// variable observed only as an edge endpoint still gets a record, so
    /// edge endpoints always resolve.
    pub fn add_file(&mut self, facts: FileFacts) {
        for function in &facts.functions {
            self.functions.insert(function.clone());
        }
        for def in facts.defs {
            self.total_definitions += 1;
            self.variables
                .entry(def.variable.clone())
                .or_default()
                .definitions
                .push(def);
        }
        for use_fact in facts.uses {
            self.total_uses += 1;
            self.variables
                .entry(use_fact.variable.clone())
                .or_default()
                .uses
                .push(use_fact);
        }
        for edge in flow::build_edges(&facts.assignments) {
            self.total_edges += 1;
            self.variables
                .entry(edge.source.clone())
                .or_default()
                .dataflow_outgoing
                .push(edge.clone());
            self.variables
                .entry(edge.target.clone())
                .or_default()
                .dataflow_incoming
                .push(edge);
        }
    }

    /// Record a file that contributed zero facts.
    pub fn skip_file(&mut self, file: impl Into<String>, reason: SkipReason) {
        self.skipped.push(SkippedFile::new(file, reason));
    }

    /// Finish the run and produce the snapshot document.
    ///
    /// Skip markers are sorted by reason then path for a stable order.
    pub fn finish(mut self, generated_at: String) -> Snapshot {
        self.skipped
            .sort_by(|a, b| a.reason.cmp(&b.reason).then_with(|| a.file.cmp(&b.file)));
        let metadata = SnapshotMetadata {
            schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
            total_variables: self.variables.len(),
            total_definitions: self.total_definitions,
            total_uses: self.total_uses,
            total_dataflow_edges: self.total_edges,
            generated_at,
            functions: self.functions.into_iter().collect(),
            skipped_files: self.skipped,
        };
        Snapshot {
            metadata,
            variables: self.variables,
        }
    }
}
