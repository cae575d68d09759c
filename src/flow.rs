//! Flow edge builder: derives directed variable→variable edges from
//! assignment facts within one function scope.
//!
//! For `target = expr`, one edge is emitted per variable referenced in
//! `expr`, all sharing the same target and line pair. A stored call result
//! carries the callee name as the called-function label, with every call
//! argument flowing into the assigned variable. There is no per-parameter
//! precision.

use serde::{Deserialize, Serialize};

use crate::ingest::{AssignFact, FlowKind};

/// A directed dataflow edge between two variables
///
/// Edges with a `called_function` label denote flow through a function
/// call and are the only edges the snapshot differ considers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowFact {
    /// Variable the value flows from
    pub source: String,
    /// Variable the value flows to
    pub target: String,
    /// 1-indexed line of the source reference
    pub source_line: usize,
    /// 1-indexed line of the assignment
    pub target_line: usize,
    /// Enclosing function of the assignment
    pub function: String,
    /// File the assignment occurs in
    pub file: String,
    /// Assignment form that carried the flow
    pub flow_kind: FlowKind,
    /// Callee name when the flow passes through a function call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub called_function: Option<String>,
}

/// Derive edges from the assignments one walker pass collected.
///
/// Pure function; the input order is preserved, so the output is
/// deterministic for a deterministic walk. An augmented assignment with a
/// constant RHS references no variable and yields no edge.
pub fn build_edges(assignments: &[AssignFact]) -> Vec<FlowFact> {
    let mut edges = Vec::new();
    for assign in assignments {
        let flow_kind = if assign.augmented {
            FlowKind::AugmentedAssignment
        } else {
            FlowKind::Assignment
        };
        for (source, source_line) in &assign.rhs_vars {
            edges.push(FlowFact {
                source: source.clone(),
                target: assign.target.clone(),
                source_line: *source_line,
                target_line: assign.target_line,
                function: assign.function.clone(),
                file: assign.file.clone(),
                flow_kind,
                called_function: assign.called_function.clone(),
            });
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::GLOBAL_SCOPE;

    fn assign(target: &str, line: usize, rhs: &[(&str, usize)]) -> AssignFact {
        AssignFact {
            target: target.to_string(),
            target_line: line,
            function: GLOBAL_SCOPE.to_string(),
            file: "test.py".to_string(),
            rhs_vars: rhs.iter().map(|(v, l)| (v.to_string(), *l)).collect(),
            called_function: None,
            augmented: false,
        }
    }

    #[test]
    fn test_single_var_assignment_edge() {
        // b = a
        let edges = build_edges(&[assign("b", 2, &[("a", 2)])]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "a");
        assert_eq!(edges[0].target, "b");
        assert_eq!(edges[0].flow_kind, FlowKind::Assignment);
    }

    #[test]
    fn test_multi_var_rhs_one_edge_per_variable() {
        // d = b + c
        let edges = build_edges(&[assign("d", 4, &[("b", 4), ("c", 4)])]);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.target == "d" && e.target_line == 4));
        let sources: Vec<_> = edges.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["b", "c"]);
    }

    #[test]
    fn test_constant_rhs_yields_no_edge() {
        // a = 1
        let edges = build_edges(&[assign("a", 1, &[])]);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_call_arguments_flow_into_target() {
        let mut fact = assign("result", 7, &[("x", 7), ("y", 7)]);
        fact.called_function = Some("combine".to_string());
        let edges = build_edges(&[fact]);
        assert_eq!(edges.len(), 2);
        assert!(edges
            .iter()
            .all(|e| e.called_function.as_deref() == Some("combine")));
    }

    #[test]
    fn test_augmented_flow_kind() {
        let mut fact = assign("x", 3, &[("y", 3)]);
        fact.augmented = true;
        let edges = build_edges(&[fact]);
        assert_eq!(edges[0].flow_kind, FlowKind::AugmentedAssignment);
    }

    #[test]
    fn test_spec_example_chain() {
        // a = 1; b = a; c = 2; d = b + c
        let edges = build_edges(&[
            assign("a", 1, &[]),
            assign("b", 2, &[("a", 2)]),
            assign("c", 3, &[]),
            assign("d", 4, &[("b", 4), ("c", 4)]),
        ]);
        let pairs: Vec<_> = edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "d"), ("c", "d")]);
    }
}
