//! Flowmap: a deterministic variable-level dataflow snapshot tool
//!
//! Flowmap parses source files, extracts variable definitions, uses, and
//! assignment-derived dataflow edges, and persists them as a JSON snapshot
//! keyed by variable name. Snapshots from two points in time can be diffed
//! to see how call-labeled dataflow changed, and files can be re-analyzed
//! as they were at any git revision without touching the working tree.
//!
//! # Position Conventions
//!
//! Flowmap uses tree-sitter position conventions for all fact data:
//! - **Line positions**: 1-indexed (line 1 is the first line)
//! - **Byte offsets**: 0-indexed from file start
//!
//! # Determinism
//!
//! Two runs over the same inputs with the same configuration produce
//! byte-identical snapshots, modulo the `generated_at` timestamp, which
//! can be pinned via [`analysis::AnalyzerConfig`]. The content digest
//! excludes the timestamp.

pub mod aggregate;
pub mod analysis;
pub mod common;
pub mod diagnostics;
pub mod diff;
pub mod error_codes;
pub mod flow;
pub mod history;
pub mod ingest;
pub mod output;
pub mod snapshot;
pub mod version;

pub use aggregate::Aggregator;
pub use analysis::{discover_files, Analyzer, AnalyzerConfig};
pub use common::{relative_to_root, resolve_path, safe_slice};
pub use diagnostics::{SkipReason, SkippedFile};
pub use diff::{diff_snapshots, ChangeKind, DiffReport, EdgeChange};
pub use flow::{build_edges, FlowFact};
pub use history::{CommitInfo, HistoryError, HistoryReader};
pub use ingest::{
    DefFact, DefKind, FileFacts, FlowKind, Language, SourceAnalyzer, UseContext, UseFact,
    GLOBAL_SCOPE,
};
pub use output::{error_code, generate_execution_id, output_json, ErrorResponse, JsonResponse, OutputFormat};
pub use snapshot::{
    Snapshot, SnapshotError, SnapshotMetadata, VariableRecord, SNAPSHOT_SCHEMA_VERSION,
};
