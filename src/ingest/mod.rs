pub mod cpp;
pub mod python;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::safe_slice;

/// Scope label for facts recorded outside any function body.
pub const GLOBAL_SCOPE: &str = "<global>";

/// Source language supported by flowmap
///
/// Python is the primary path; C++ is experimental. Both walkers produce
/// the same fact shapes, so everything downstream is language-agnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    Python,
    Cpp,
}

impl Language {
    /// Detect language from a file path extension.
    ///
    /// Returns None for extensions flowmap does not analyze.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "py" => Some(Language::Python),
            "cpp" | "cc" | "cxx" | "c++" | "h" | "hpp" | "hh" | "hxx" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Parse from a CLI argument string.
    pub fn from_str_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Some(Language::Python),
            "cpp" | "c++" | "cxx" => Some(Language::Cpp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
        }
    }
}

/// Kind of variable definition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DefKind {
    /// Left-hand side of an assignment statement
    Assignment,
    /// Function parameter, defined at function entry
    Parameter,
}

/// Syntactic context in which a variable was read
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UseContext {
    /// General expression read
    Read,
    /// Argument position inside a call
    Argument,
    /// Inside a return statement
    Return,
}

/// Kind of flow carried by an edge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Plain `target = expr`
    Assignment,
    /// Augmented `target += expr` and friends
    AugmentedAssignment,
}

/// A variable definition recorded at a specific source location
///
/// Pure data. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefFact {
    /// Variable name
    pub variable: String,
    /// 1-indexed source line
    pub line: usize,
    /// Enclosing function name, or [`GLOBAL_SCOPE`]
    pub function: String,
    /// File the definition occurs in
    pub file: String,
    /// Definition kind
    pub kind: DefKind,
    /// Source-expression label: the RHS variable name for a
    /// single-variable assignment, or `name()` for a stored call result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_source: Option<String>,
}

/// A variable read recorded at a specific source location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UseFact {
    /// Variable name
    pub variable: String,
    /// 1-indexed source line
    pub line: usize,
    /// Enclosing function name, or [`GLOBAL_SCOPE`]
    pub function: String,
    /// File the use occurs in
    pub file: String,
    /// Syntactic context of the read
    pub context: UseContext,
}

/// One assignment statement as observed by a walker
///
/// Intermediate shape consumed by the flow edge builder; never serialized.
/// `rhs_vars` holds every variable referenced on the right-hand side with
/// its source line; for a stored call result these are the call arguments
/// and `called_function` carries the callee name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignFact {
    /// Assigned variable
    pub target: String,
    /// 1-indexed line of the assignment
    pub target_line: usize,
    /// Enclosing function name, or [`GLOBAL_SCOPE`]
    pub function: String,
    /// File the assignment occurs in
    pub file: String,
    /// Variables referenced on the RHS, with their lines
    pub rhs_vars: Vec<(String, usize)>,
    /// Callee name when the RHS is a call expression
    pub called_function: Option<String>,
    /// True for augmented forms (`+=`, `-=`, ...)
    pub augmented: bool,
}

/// Everything one walker pass collected for a single file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFacts {
    /// File path as supplied by the caller
    pub file: String,
    /// Function names defined in this file, in source order
    pub functions: Vec<String>,
    /// Definitions in source order
    pub defs: Vec<DefFact>,
    /// Uses in source order
    pub uses: Vec<UseFact>,
    /// Assignments in source order, pending edge derivation
    pub assignments: Vec<AssignFact>,
}

impl FileFacts {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }
}

/// A language-specific source walker
///
/// One variant per language family (Python-family, C-family). Each walker
/// owns its tree-sitter parser and produces the same [`FileFacts`] shape.
pub trait SourceAnalyzer {
    /// Language this walker handles
    fn language(&self) -> Language;

    /// Walk one file's syntax tree and collect facts.
    ///
    /// Returns None when the file does not parse; the caller records the
    /// file as skipped and continues, it is never fatal to the run.
    fn analyze(&mut self, file_path: &Path, source: &[u8]) -> Option<FileFacts>;
}

/// Extract the UTF-8 text of a node, bounds-checked.
pub(crate) fn node_text<'a>(node: &tree_sitter::Node, source: &'a [u8]) -> Option<&'a str> {
    let bytes = safe_slice(source, node.start_byte(), node.end_byte())?;
    std::str::from_utf8(bytes).ok()
}

/// 1-indexed line for a node (tree-sitter rows are 0-indexed).
pub(crate) fn node_line(node: &tree_sitter::Node) -> usize {
    node.start_position().row + 1
}
