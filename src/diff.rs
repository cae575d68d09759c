//! Graph differ: classifies call-labeled dataflow edges between two
//! snapshots.
//!
//! Only edges carrying a `called_function` label participate. Edges are
//! keyed by the (source, target) variable pair; the label sets attached to
//! a pair decide whether a surviving pair counts as modified or unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Unchanged,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
            ChangeKind::Unchanged => "unchanged",
        };
        write!(f, "{s}")
    }
}

/// One classified edge pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeChange {
    pub source: String,
    pub target: String,
    pub kind: ChangeKind,
    /// Comma-joined sorted label set in the current snapshot, empty when
    /// the pair only exists in the previous one.
    pub current_labels: String,
    /// Comma-joined sorted label set in the previous snapshot.
    pub previous_labels: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffReport {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Labeled pairs in the current snapshot excluded by the file filter.
    pub filtered_out: usize,
    /// Current-snapshot edges with no call label, outside the comparison.
    pub unlabeled_edges: usize,
    pub changes: Vec<EdgeChange>,
}

impl DiffReport {
    pub fn total_compared(&self) -> usize {
        self.added + self.modified + self.removed + self.unchanged
    }
}

/// Pair key → sorted set of call labels, restricted to labeled outgoing
/// edges. Counting only the outgoing side avoids double-counting the
/// mirrored incoming copy.
fn labeled_pairs(
    snapshot: &Snapshot,
    file_filter: Option<&str>,
) -> (BTreeMap<(String, String), BTreeSet<String>>, usize, usize) {
    let mut pairs: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
    let mut filtered_out = 0usize;
    let mut unlabeled = 0usize;
    for record in snapshot.variables.values() {
        for edge in &record.dataflow_outgoing {
            let Some(label) = &edge.called_function else {
                unlabeled += 1;
                continue;
            };
            if let Some(filter) = file_filter {
                if !edge.file.contains(filter) {
                    filtered_out += 1;
                    continue;
                }
            }
            pairs
                .entry((edge.source.clone(), edge.target.clone()))
                .or_default()
                .insert(label.clone());
        }
    }
    (pairs, filtered_out, unlabeled)
}

fn join_labels(labels: &BTreeSet<String>) -> String {
    labels.iter().cloned().collect::<Vec<_>>().join(",")
}

/// Compare two snapshots. With no previous snapshot every current pair is
/// reported as added, which makes the first run of a series well defined.
pub fn diff_snapshots(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    file_filter: Option<&str>,
) -> DiffReport {
    let (current_pairs, filtered_out, unlabeled_edges) = labeled_pairs(current, file_filter);
    let previous_pairs = match previous {
        Some(snapshot) => labeled_pairs(snapshot, file_filter).0,
        None => BTreeMap::new(),
    };

    let mut changes = Vec::new();
    for ((source, target), labels) in &current_pairs {
        let key = (source.clone(), target.clone());
        let kind = match previous_pairs.get(&key) {
            None => ChangeKind::Added,
            Some(old) if old == labels => ChangeKind::Unchanged,
            Some(_) => ChangeKind::Modified,
        };
        let previous_labels = previous_pairs
            .get(&key)
            .map(join_labels)
            .unwrap_or_default();
        changes.push(EdgeChange {
            source: source.clone(),
            target: target.clone(),
            kind,
            current_labels: join_labels(labels),
            previous_labels,
        });
    }
    for ((source, target), labels) in &previous_pairs {
        if current_pairs.contains_key(&(source.clone(), target.clone())) {
            continue;
        }
        changes.push(EdgeChange {
            source: source.clone(),
            target: target.clone(),
            kind: ChangeKind::Removed,
            current_labels: String::new(),
            previous_labels: join_labels(labels),
        });
    }
    changes.sort_by(|a, b| {
        a.source
            .cmp(&b.source)
            .then_with(|| a.target.cmp(&b.target))
            .then_with(|| a.kind.to_string().cmp(&b.kind.to_string()))
    });

    let count = |kind: ChangeKind| changes.iter().filter(|c| c.kind == kind).count();
    DiffReport {
        added: count(ChangeKind::Added),
        modified: count(ChangeKind::Modified),
        removed: count(ChangeKind::Removed),
        unchanged: count(ChangeKind::Unchanged),
        filtered_out,
        unlabeled_edges,
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::ingest::{AssignFact, FileFacts, GLOBAL_SCOPE};

    fn snapshot_with(edges: &[(&str, &str, Option<&str>, &str)]) -> Snapshot {
        let mut facts = FileFacts::new("a.py");
        for (source, target, label, file) in edges {
            facts.assignments.push(AssignFact {
                target: target.to_string(),
                target_line: 1,
                function: GLOBAL_SCOPE.to_string(),
                file: file.to_string(),
                rhs_vars: vec![(source.to_string(), 1)],
                called_function: label.map(str::to_string),
                augmented: false,
            });
        }
        let mut agg = Aggregator::new();
        agg.add_file(facts);
        agg.finish("t".to_string())
    }

    #[test]
    fn test_no_previous_all_added() {
        let current = snapshot_with(&[("a", "b", Some("f"), "a.py")]);
        let report = diff_snapshots(None, &current, None);
        assert_eq!(report.added, 1);
        assert_eq!(report.removed, 0);
        assert_eq!(report.changes[0].kind, ChangeKind::Added);
        assert_eq!(report.changes[0].previous_labels, "");
    }

    #[test]
    fn test_unchanged_pair() {
        let prev = snapshot_with(&[("a", "b", Some("f"), "a.py")]);
        let current = snapshot_with(&[("a", "b", Some("f"), "a.py")]);
        let report = diff_snapshots(Some(&prev), &current, None);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.added, 0);
    }

    #[test]
    fn test_label_change_is_modified_not_add_remove() {
        let prev = snapshot_with(&[("a", "b", Some("f"), "a.py")]);
        let current = snapshot_with(&[("a", "b", Some("g"), "a.py")]);
        let report = diff_snapshots(Some(&prev), &current, None);
        assert_eq!(report.modified, 1);
        assert_eq!(report.added, 0);
        assert_eq!(report.removed, 0);
        assert_eq!(report.changes[0].current_labels, "g");
        assert_eq!(report.changes[0].previous_labels, "f");
    }

    #[test]
    fn test_removed_pair() {
        let prev = snapshot_with(&[("a", "b", Some("f"), "a.py")]);
        let current = snapshot_with(&[]);
        let report = diff_snapshots(Some(&prev), &current, None);
        assert_eq!(report.removed, 1);
        assert_eq!(report.changes[0].current_labels, "");
    }

    #[test]
    fn test_unlabeled_edges_excluded() {
        let current = snapshot_with(&[("a", "b", None, "a.py"), ("c", "d", Some("f"), "a.py")]);
        let report = diff_snapshots(None, &current, None);
        assert_eq!(report.added, 1);
        assert_eq!(report.unlabeled_edges, 1);
    }

    #[test]
    fn test_multiple_labels_join_sorted() {
        let current = snapshot_with(&[
            ("a", "b", Some("g"), "a.py"),
            ("a", "b", Some("f"), "a.py"),
        ]);
        let report = diff_snapshots(None, &current, None);
        assert_eq!(report.added, 1);
        assert_eq!(report.changes[0].current_labels, "f,g");
    }

    #[test]
    fn test_file_filter_substring() {
        let current = snapshot_with(&[
            ("a", "b", Some("f"), "pkg/one.py"),
            ("c", "d", Some("g"), "pkg/two.py"),
        ]);
        let report = diff_snapshots(None, &current, Some("one"));
        assert_eq!(report.added, 1);
        assert_eq!(report.filtered_out, 1);
        assert_eq!(report.changes[0].source, "a");
    }

    #[test]
    fn test_changes_sorted_by_pair() {
        let current = snapshot_with(&[
            ("z", "a", Some("f"), "a.py"),
            ("a", "z", Some("f"), "a.py"),
        ]);
        let report = diff_snapshots(None, &current, None);
        assert_eq!(report.changes[0].source, "a");
        assert_eq!(report.changes[1].source, "z");
    }
}
