//! Python variable dataflow extraction using tree-sitter-python.
//!
//! Walks one file's syntax tree and records variable definitions, uses,
//! and assignment facts with source locations.

use crate::ingest::{
    node_line, node_text, AssignFact, DefFact, DefKind, FileFacts, Language, SourceAnalyzer,
    UseContext, UseFact, GLOBAL_SCOPE,
};
use anyhow::Result;
use std::path::Path;

/// Walker that extracts dataflow facts from Python source code.
///
/// Pure function: input (path, contents) → output FileFacts.
/// No filesystem access. No global state. No caching.
pub struct PythonFlowParser {
    parser: tree_sitter::Parser,
}

impl PythonFlowParser {
    /// Create a new walker for Python source code.
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_python::language())?;
        Ok(Self { parser })
    }
}

impl SourceAnalyzer for PythonFlowParser {
    fn language(&self) -> Language {
        Language::Python
    }

    /// Walk one Python file and collect facts.
    ///
    /// Returns None when the tree does not parse cleanly; the file then
    /// contributes zero facts and is reported as skipped by the caller.
    fn analyze(&mut self, file_path: &Path, source: &[u8]) -> Option<FileFacts> {
        let tree = self.parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }

        let mut facts = FileFacts::new(file_path.to_string_lossy().to_string());
        walk(&root, source, &mut facts, GLOBAL_SCOPE, UseContext::Read);
        Some(facts)
    }
}

/// Recursive tree walk with enclosing-function and use-context tracking.
///
/// Definition positions (assignment targets, parameters, loop targets) are
/// handled explicitly and never reached by the generic identifier branch,
/// so a name is either a definition or a use at any given site, not both.
fn walk(
    node: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
    use_ctx: UseContext,
) {
    match node.kind() {
        "function_definition" => {
            let name = node
                .child_by_field_name("name")
                .and_then(|n| node_text(&n, source))
                .map(str::to_string);
            if let Some(name) = name {
                facts.functions.push(name.clone());
                if let Some(params) = node.child_by_field_name("parameters") {
                    collect_parameters(&params, source, facts, &name);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    walk(&body, source, facts, &name, UseContext::Read);
                }
            }
        }
        "assignment" => {
            handle_assignment(node, source, facts, function, false);
        }
        "augmented_assignment" => {
            handle_assignment(node, source, facts, function, true);
        }
        "for_statement" => {
            if let Some(left) = node.child_by_field_name("left") {
                collect_bind_targets(&left, source, facts, function);
            }
            if let Some(right) = node.child_by_field_name("right") {
                walk(&right, source, facts, function, UseContext::Read);
            }
            if let Some(body) = node.child_by_field_name("body") {
                walk(&body, source, facts, function, UseContext::Read);
            }
        }
        "return_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(&child, source, facts, function, UseContext::Return);
            }
        }
        "call" => {
            // The callee name is not a variable read; an attribute
            // receiver (obj.method()) still is.
            if let Some(func) = node.child_by_field_name("function") {
                if func.kind() == "attribute" {
                    if let Some(obj) = func.child_by_field_name("object") {
                        walk(&obj, source, facts, function, use_ctx);
                    }
                }
            }
            if let Some(args) = node.child_by_field_name("arguments") {
                walk(&args, source, facts, function, UseContext::Argument);
            }
        }
        "keyword_argument" => {
            if let Some(value) = node.child_by_field_name("value") {
                walk(&value, source, facts, function, UseContext::Argument);
            }
        }
        "attribute" => {
            // a.b reads a; b is a member name, not a variable
            if let Some(obj) = node.child_by_field_name("object") {
                walk(&obj, source, facts, function, use_ctx);
            }
        }
        "identifier" => {
            if let Some(name) = node_text(node, source) {
                facts.uses.push(UseFact {
                    variable: name.to_string(),
                    line: node_line(node),
                    function: function.to_string(),
                    file: facts.file.clone(),
                    context: use_ctx,
                });
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(&child, source, facts, function, use_ctx);
            }
        }
    }
}

/// Record an assignment statement: target definition, assignment fact for
/// the edge builder, and RHS uses.
fn handle_assignment(
    node: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
    augmented: bool,
) {
    let line = node_line(node);
    let right = node.child_by_field_name("right");

    let mut rhs_vars = Vec::new();
    let mut called_function = None;
    if let Some(ref r) = right {
        if r.kind() == "call" {
            called_function = callee_name(r, source);
            if let Some(args) = r.child_by_field_name("arguments") {
                collect_rhs_vars(&args, source, &mut rhs_vars);
            }
        } else {
            collect_rhs_vars(r, source, &mut rhs_vars);
        }
    }

    let value_source = right.as_ref().and_then(|r| match r.kind() {
        "identifier" => node_text(r, source).map(str::to_string),
        "call" => called_function.as_ref().map(|c| format!("{}()", c)),
        _ => None,
    });

    if let Some(left) = node.child_by_field_name("left") {
        match left.kind() {
            "identifier" => {
                if let Some(target) = node_text(&left, source) {
                    facts.defs.push(DefFact {
                        variable: target.to_string(),
                        line,
                        function: function.to_string(),
                        file: facts.file.clone(),
                        kind: DefKind::Assignment,
                        value_source,
                    });
                    facts.assignments.push(AssignFact {
                        target: target.to_string(),
                        target_line: line,
                        function: function.to_string(),
                        file: facts.file.clone(),
                        rhs_vars: rhs_vars.clone(),
                        called_function: called_function.clone(),
                        augmented,
                    });
                }
            }
            "pattern_list" | "tuple_pattern" => {
                // a, b = ... defines each target; edges are only derived
                // for single-identifier targets
                collect_bind_targets(&left, source, facts, function);
            }
            // attribute/subscript targets: member granularity is a non-goal
            _ => {}
        }
    }

    if let Some(r) = right {
        walk(&r, source, facts, function, UseContext::Read);
    }
}

/// Record every identifier below `node` as an assignment-kind definition.
///
/// Used for tuple-unpacking targets and for-loop variables.
fn collect_bind_targets(
    node: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
) {
    if node.kind() == "identifier" {
        if let Some(name) = node_text(node, source) {
            facts.defs.push(DefFact {
                variable: name.to_string(),
                line: node_line(node),
                function: function.to_string(),
                file: facts.file.clone(),
                kind: DefKind::Assignment,
                value_source: None,
            });
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_bind_targets(&child, source, facts, function);
    }
}

/// Record function parameters as parameter-kind definitions at entry.
fn collect_parameters(
    params: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
) {
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let name_node = match child.kind() {
            "identifier" => Some(child),
            "default_parameter" | "typed_default_parameter" => child.child_by_field_name("name"),
            "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                first_identifier(&child)
            }
            _ => None,
        };
        if let Some(name_node) = name_node {
            if name_node.kind() != "identifier" {
                continue;
            }
            if let Some(name) = node_text(&name_node, source) {
                facts.defs.push(DefFact {
                    variable: name.to_string(),
                    line: node_line(&name_node),
                    function: function.to_string(),
                    file: facts.file.clone(),
                    kind: DefKind::Parameter,
                    value_source: None,
                });
            }
        }
    }
}

/// First identifier node in a subtree, depth-first.
fn first_identifier<'t>(node: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    if node.kind() == "identifier" {
        return Some(*node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_identifier(&child) {
            return Some(found);
        }
    }
    None
}

/// Collect every variable referenced in an expression subtree.
///
/// Skips callee names, method-call receivers, and attribute member
/// names; recurses into call arguments and plain attribute receivers.
fn collect_rhs_vars(node: &tree_sitter::Node, source: &[u8], out: &mut Vec<(String, usize)>) {
    match node.kind() {
        "identifier" => {
            if let Some(name) = node_text(node, source) {
                out.push((name.to_string(), node_line(node)));
            }
        }
        "call" => {
            // only the arguments flow; the callee and a method receiver
            // do not, nested or not
            if let Some(args) = node.child_by_field_name("arguments") {
                collect_rhs_vars(&args, source, out);
            }
        }
        "attribute" => {
            if let Some(obj) = node.child_by_field_name("object") {
                collect_rhs_vars(&obj, source, out);
            }
        }
        "keyword_argument" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect_rhs_vars(&value, source, out);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_rhs_vars(&child, source, out);
            }
        }
    }
}

/// Callee name from a call node: plain identifier, or the attribute name
/// for obj.method() calls.
fn callee_name(node: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    let func = node.child_by_field_name("function")?;
    match func.kind() {
        "identifier" => node_text(&func, source).map(str::to_string),
        "attribute" => func
            .child_by_field_name("attribute")
            .and_then(|a| node_text(&a, source))
            .map(str::to_string),
        _ => None,
    }
}
