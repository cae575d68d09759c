//! Persisted snapshot document: the sole durable artifact the analysis
//! produces and the sole input the differ consumes.
//!
//! # Compatibility
//!
//! The document layout is a stable contract with external consumers (a
//! rendering layer): top-level `metadata` and `variables` keys, and within
//! each variable record the `definitions`, `uses`, `dataflow_outgoing`,
//! and `dataflow_incoming` field names. Extra metadata fields may be
//! added; these names never change.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::diagnostics::SkippedFile;
use crate::flow::FlowFact;
use crate::ingest::{DefFact, UseFact};

/// Current snapshot document schema version
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";

/// Aggregate record for one variable name across the analyzed file set
///
/// Keyed by bare variable name: same-named variables in different
/// functions collapse into one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariableRecord {
    /// Definitions of this variable, in traversal order
    pub definitions: Vec<DefFact>,
    /// Uses of this variable, in traversal order
    pub uses: Vec<UseFact>,
    /// Edges with this variable as source
    pub dataflow_outgoing: Vec<FlowFact>,
    /// Edges with this variable as target
    pub dataflow_incoming: Vec<FlowFact>,
}

/// Snapshot metadata: the four counts plus run context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotMetadata {
    /// Document schema version
    pub schema_version: String,
    pub total_variables: usize,
    pub total_definitions: usize,
    pub total_uses: usize,
    pub total_dataflow_edges: usize,
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    /// Function names seen across the file set, sorted
    pub functions: Vec<String>,
    /// Files that contributed zero facts, with reasons
    pub skipped_files: Vec<SkippedFile>,
}

/// One serialized aggregate of all facts for an analyzed file set
///
/// Immutable once written. Two snapshots are the sole inputs to the
/// differ, which never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    /// Variable name → record; BTreeMap keeps serialization order stable
    pub variables: BTreeMap<String, VariableRecord>,
}

/// Snapshot load failures
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("cannot read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Snapshot {
    /// Serialize to pretty JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self).map(|mut s| {
            s.push('\n');
            s
        })
    }

    /// Write the document to a file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a document from a file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SnapshotError::Malformed {
            path: path.to_string_lossy().to_string(),
            source,
        })
    }

    /// Content digest over the counts and the variable mapping.
    ///
    /// Excludes `generated_at`, so two runs over unchanged inputs produce
    /// equal digests regardless of wall-clock time.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.metadata.total_variables.to_string());
        hasher.update(":");
        hasher.update(self.metadata.total_definitions.to_string());
        hasher.update(":");
        hasher.update(self.metadata.total_uses.to_string());
        hasher.update(":");
        hasher.update(self.metadata.total_dataflow_edges.to_string());
        hasher.update(":");
        // BTreeMap iteration order makes this canonical
        if let Ok(vars) = serde_json::to_string(&self.variables) {
            hasher.update(vars);
        }
        let hash = hasher.finalize();
        hex::encode(&hash[..8])
    }
}
