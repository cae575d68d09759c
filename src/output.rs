//! JSON output types for CLI commands
//!
//! Provides schema-versioned response types for all commands.

use serde::{Deserialize, Serialize};

use crate::diagnostics::SkippedFile;
use crate::diff::DiffReport;
use crate::history::CommitInfo;

/// Current JSON output schema version
pub const FLOWMAP_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Wrapper for all JSON responses
///
/// Every JSON response includes schema_version and execution_id for
/// parsing stability and traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for parsing stability
    pub schema_version: String,
    /// Unique execution ID for this run
    pub execution_id: String,
    /// Tool name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Wall-clock time of the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Response data
    pub data: T,
    /// Whether the response is partial (e.g., truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<T> JsonResponse<T> {
    /// Create a new JSON response
    pub fn new(data: T, execution_id: &str) -> Self {
        JsonResponse {
            schema_version: FLOWMAP_JSON_SCHEMA_VERSION.to_string(),
            execution_id: execution_id.to_string(),
            tool: Some("flowmap".to_string()),
            timestamp: Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            data,
            partial: None,
        }
    }

    /// Mark the response as partial
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }
}

/// Response for analyze and history commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Files that contributed facts
    pub analyzed_files: usize,
    /// Files recorded as skipped, with reasons
    pub skipped_files: Vec<SkippedFile>,
    pub total_variables: usize,
    pub total_definitions: usize,
    pub total_uses: usize,
    pub total_dataflow_edges: usize,
    /// Short content digest of the snapshot
    pub digest: String,
    /// Where the snapshot was written, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    /// Revision analyzed, set by the history command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// Response for the diff command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResponse {
    pub current: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_filter: Option<String>,
    #[serde(flatten)]
    pub report: DiffReport,
}

/// Response for `history --list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitListResponse {
    pub repo: String,
    pub commits: Vec<CommitInfo>,
}

/// Response for the status command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub snapshot: String,
    pub schema_version: String,
    pub generated_at: String,
    pub total_variables: usize,
    pub total_definitions: usize,
    pub total_uses: usize,
    pub total_dataflow_edges: usize,
    pub functions: usize,
    pub skipped_files: usize,
    pub digest: String,
}

/// Response for errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category/type
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

/// Map a command failure to its stable error code
///
/// Walks the error chain looking for a typed source; unmatched errors
/// fall back to the generic argument code.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::error_codes;
    use crate::history::HistoryError;
    use crate::snapshot::SnapshotError;

    for cause in err.chain() {
        if let Some(snapshot_err) = cause.downcast_ref::<SnapshotError>() {
            return match snapshot_err {
                SnapshotError::Io { .. } => error_codes::FLOW_SNAP_001_UNREADABLE,
                SnapshotError::Malformed { .. } => error_codes::FLOW_SNAP_002_MALFORMED,
            };
        }
        if let Some(history_err) = cause.downcast_ref::<HistoryError>() {
            return match history_err {
                HistoryError::NotARepository { .. } => {
                    error_codes::FLOW_HIST_001_NOT_A_REPOSITORY
                }
                HistoryError::Git(_) => error_codes::FLOW_HIST_002_BAD_REVISION,
            };
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return error_codes::FLOW_IO_001_FILE_NOT_FOUND;
        }
    }
    error_codes::FLOW_CLI_001_INVALID_ARGUMENTS
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// JSON output with schema versioning
    Json,
}

impl OutputFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Generate a unique execution ID for this run
///
/// Uses timestamp + process ID for uniqueness.
pub fn generate_execution_id() -> String {
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let pid = process::id();

    format!("{:x}-{:x}", timestamp, pid)
}

/// Output JSON to stdout
pub fn output_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}
