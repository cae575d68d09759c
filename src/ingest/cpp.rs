//! C++ variable dataflow extraction using tree-sitter-cpp (experimental).
//!
//! Walks declarations, assignment expressions, and calls. Compiler-style
//! arguments from the build system travel in the analysis config; the
//! tree-sitter grammar itself needs no compile flags.

use crate::ingest::{
    node_line, node_text, AssignFact, DefFact, DefKind, FileFacts, Language, SourceAnalyzer,
    UseContext, UseFact, GLOBAL_SCOPE,
};
use anyhow::Result;
use std::path::Path;

/// Walker that extracts dataflow facts from C++ source code.
pub struct CppFlowParser {
    parser: tree_sitter::Parser,
}

impl CppFlowParser {
    /// Create a new walker for C++ source code.
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_cpp::language())?;
        Ok(Self { parser })
    }
}

impl SourceAnalyzer for CppFlowParser {
    fn language(&self) -> Language {
        Language::Cpp
    }

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

fn walk(
    node: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
    use_ctx: UseContext,
) {
    match node.kind() {
        "function_definition" => {
            let fn_decl = node
                .child_by_field_name("declarator")
                .and_then(|d| find_function_declarator(&d));
            let name = fn_decl
                .as_ref()
                .and_then(|d| d.child_by_field_name("declarator"))
                .and_then(|d| declarator_name(&d, source));
            if let Some(name) = name {
                facts.functions.push(name.clone());
                if let Some(params) = fn_decl.as_ref().and_then(|d| d.child_by_field_name("parameters")) {
                    collect_parameters(&params, source, facts, &name);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    walk(&body, source, facts, &name, UseContext::Read);
                }
            } else if let Some(body) = node.child_by_field_name("body") {
                walk(&body, source, facts, function, UseContext::Read);
            }
        }
        "declaration" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "init_declarator" => {
                        handle_init_declarator(&child, source, facts, function);
                    }
                    // `int x;` declares without initializing
                    "identifier" => {
                        if let Some(name) = node_text(&child, source) {
                            facts.defs.push(DefFact {
                                variable: name.to_string(),
                                line: node_line(&child),
                                function: function.to_string(),
                                file: facts.file.clone(),
                                kind: DefKind::Assignment,
                                value_source: None,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        "assignment_expression" => {
            handle_assignment_expression(node, source, facts, function);
        }
        "return_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(&child, source, facts, function, UseContext::Return);
            }
        }
        "call_expression" => {
            if let Some(func) = node.child_by_field_name("function") {
                if func.kind() == "field_expression" {
                    if let Some(obj) = func.child_by_field_name("argument") {
                        walk(&obj, source, facts, function, use_ctx);
                    }
                }
            }
            if let Some(args) = node.child_by_field_name("arguments") {
                walk(&args, source, facts, function, UseContext::Argument);
            }
        }
        "field_expression" => {
            // obj.member reads obj; the member name is not a variable
            if let Some(obj) = node.child_by_field_name("argument") {
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

/// `int y = expr;` records a definition plus an assignment fact.
fn handle_init_declarator(
    node: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
) {
    let target = node
        .child_by_field_name("declarator")
        .and_then(|d| declarator_name(&d, source));
    let target = match target {
        Some(t) => t,
        None => return,
    };
    let line = node_line(node);
    let value = node.child_by_field_name("value");
    record_assignment(source, facts, function, &target, line, value, false);
}

/// `x = expr` / `x += expr` statements.
fn handle_assignment_expression(
    node: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
) {
    let left = match node.child_by_field_name("left") {
        Some(l) => l,
        None => return,
    };
    if left.kind() != "identifier" {
        // member/array/pointer targets: beyond whole-variable granularity
        if let Some(right) = node.child_by_field_name("right") {
            walk(&right, source, facts, function, UseContext::Read);
        }
        return;
    }
    let target = match node_text(&left, source) {
        Some(t) => t.to_string(),
        None => return,
    };
    let augmented = node
        .child_by_field_name("operator")
        .and_then(|op| node_text(&op, source).map(str::to_string))
        .map(|op| op != "=")
        .unwrap_or(false);
    let line = node_line(node);
    let right = node.child_by_field_name("right");
    record_assignment(source, facts, function, &target, line, right, augmented);
}

/// Shared tail for both assignment forms: RHS var collection, call label,
/// definition, assignment fact, and RHS uses.
fn record_assignment(
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
    target: &str,
    line: usize,
    rhs: Option<tree_sitter::Node>,
    augmented: bool,
) {
    let mut rhs_vars = Vec::new();
    let mut called_function = None;
    if let Some(ref r) = rhs {
        if r.kind() == "call_expression" {
            called_function = callee_name(r, source);
            if let Some(args) = r.child_by_field_name("arguments") {
                collect_rhs_vars(&args, source, &mut rhs_vars);
            }
        } else {
            collect_rhs_vars(r, source, &mut rhs_vars);
        }
    }

    let value_source = rhs.as_ref().and_then(|r| match r.kind() {
        "identifier" => node_text(r, source).map(str::to_string),
        "call_expression" => called_function.as_ref().map(|c| format!("{}()", c)),
        _ => None,
    });

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
        rhs_vars,
        called_function,
        augmented,
    });

    if let Some(r) = rhs {
        walk(&r, source, facts, function, UseContext::Read);
    }
}

/// Parameters of a function definition, defined at entry.
fn collect_parameters(
    params: &tree_sitter::Node,
    source: &[u8],
    facts: &mut FileFacts,
    function: &str,
) {
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        if child.kind() != "parameter_declaration"
            && child.kind() != "optional_parameter_declaration"
        {
            continue;
        }
        let name = child
            .child_by_field_name("declarator")
            .and_then(|d| declarator_name(&d, source));
        if let Some(name) = name {
            facts.defs.push(DefFact {
                variable: name,
                line: node_line(&child),
                function: function.to_string(),
                file: facts.file.clone(),
                kind: DefKind::Parameter,
                value_source: None,
            });
        }
    }
}

/// Find the function_declarator inside a possibly nested declarator
/// (pointer/reference declarators wrap it for `int* f()` and the like).
fn find_function_declarator<'t>(node: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    if node.kind() == "function_declarator" {
        return Some(*node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_function_declarator(&child) {
            return Some(found);
        }
    }
    None
}

/// Innermost name of a declarator, stripping qualification and
/// pointer/reference wrapping.
fn declarator_name(node: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" | "field_identifier" | "destructor_name" | "operator_name" => {
            node_text(node, source).map(str::to_string)
        }
        "qualified_identifier" => {
            let name = node.child_by_field_name("name")?;
            declarator_name(&name, source)
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if let Some(found) = declarator_name(&child, source) {
                    return Some(found);
                }
            }
            None
        }
    }
}

/// Variables referenced in an expression subtree; callee names and member
/// names excluded, call arguments and receivers included.
fn collect_rhs_vars(node: &tree_sitter::Node, source: &[u8], out: &mut Vec<(String, usize)>) {
    match node.kind() {
        "identifier" => {
            if let Some(name) = node_text(node, source) {
                out.push((name.to_string(), node_line(node)));
            }
        }
        "call_expression" => {
            if let Some(args) = node.child_by_field_name("arguments") {
                collect_rhs_vars(&args, source, out);
            }
        }
        "field_expression" => {
            if let Some(obj) = node.child_by_field_name("argument") {
                collect_rhs_vars(&obj, source, out);
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

/// Callee name from a call_expression node.
fn callee_name(node: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    let func = node.child_by_field_name("function")?;
    match func.kind() {
        "identifier" => node_text(&func, source).map(str::to_string),
        "field_expression" => func
            .child_by_field_name("field")
            .and_then(|f| node_text(&f, source))
            .map(str::to_string),
        "qualified_identifier" => func
            .child_by_field_name("name")
            .and_then(|n| node_text(&n, source))
            .map(str::to_string),
        _ => None,
    }
}
