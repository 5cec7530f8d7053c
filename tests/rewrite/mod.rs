//! Path-based history simplification

use crate::common::{GraphBuilder, drain, oid, parent_names};
use pretty_assertions::assert_eq;
use revwalk::RevWalk;
use rstest::rstest;

fn filtered_walk(graph: &GraphBuilder, prefix: &str) -> RevWalk {
    let mut walk = graph.walk();
    walk.set_tree_filter(Some(graph.comparator(prefix)));
    walk
}

/// A commit that leaves the filtered path untouched is elided and its
/// surviving child is re-parented past it.
///
/// ```text
/// A (adds x) <- B (x unchanged) <- C (modifies x)
/// ```
#[rstest]
fn unchanged_commit_collapses_out() {
    let graph = GraphBuilder::new();
    graph.commit_with_tree("A", &[], 100, &[("x", 1)]);
    graph.commit_with_tree("B", &["A"], 200, &[("x", 1), ("noise", 1)]);
    graph.commit_with_tree("C", &["B"], 300, &[("x", 2), ("noise", 1)]);

    let mut walk = filtered_walk(&graph, "x");
    let tip = walk.lookup_commit(&oid("C"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["C", "A"]);
    assert_eq!(parent_names(&walk, tip, &graph), ["A"]);
}

/// A merge whose filtered tree matches one interesting parent collapses to
/// that parent; the other side of the merge is never walked.
///
/// ```text
///       A (x=1)
///      / \
///     B   C (x=2)
///      \ /
///       M (x=2, same as C under the filter)
/// ```
#[rstest]
fn merge_collapses_to_matching_parent() {
    let graph = GraphBuilder::new();
    graph.commit_with_tree("A", &[], 100, &[("x", 1), ("a", 1)]);
    graph.commit_with_tree("B", &["A"], 200, &[("x", 1), ("a", 1), ("b", 1)]);
    graph.commit_with_tree("C", &["A"], 300, &[("x", 2), ("a", 1)]);
    graph.commit_with_tree("M", &["B", "C"], 400, &[("x", 2), ("a", 1), ("b", 1)]);

    let mut walk = filtered_walk(&graph, "x");
    let tip = walk.lookup_commit(&oid("M"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["C", "A"]);
}

/// A root commit that never touches the filtered path is dropped, leaving
/// the first touching commit as a root of the simplified history.
#[rstest]
fn untouched_root_is_dropped() {
    let graph = GraphBuilder::new();
    graph.commit_with_tree("A", &[], 100, &[("other", 1)]);
    graph.commit_with_tree("B", &["A"], 200, &[("other", 1), ("x", 1)]);

    let mut walk = filtered_walk(&graph, "x");
    let tip = walk.lookup_commit(&oid("B"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["B"]);
    assert_eq!(parent_names(&walk, tip, &graph), Vec::<String>::new());
}

/// Matching an uninteresting parent blocks the merge collapse; the merge
/// itself stays in the output.
///
/// ```text
/// U (x=1, uninteresting)   B (x=2)
///            \            /
///             M (x=1, same as U under the filter)
/// ```
#[rstest]
fn uninteresting_match_blocks_collapse() {
    let graph = GraphBuilder::new();
    graph.commit_with_tree("U", &[], 100, &[("x", 1)]);
    graph.commit_with_tree("B", &[], 200, &[("x", 2), ("b", 1)]);
    graph.commit_with_tree("M", &["U", "B"], 300, &[("x", 1)]);

    let mut walk = filtered_walk(&graph, "x");
    let start = walk.lookup_commit(&oid("M"));
    let stop = walk.lookup_commit(&oid("U"));
    walk.mark_start(start).unwrap();
    walk.mark_uninteresting(stop).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["M", "B"]);
}

/// A merge parent whose filtered diff is nothing but additions becomes a
/// synthetic root: history beyond it is cut off.
///
/// ```text
/// P0 <- P (no x anywhere)    Q (x=2)
///              \            /
///               M (x=1, adds x relative to P)
/// ```
#[rstest]
fn adds_only_parent_becomes_synthetic_root() {
    let graph = GraphBuilder::new();
    graph.commit_with_tree("P0", &[], 50, &[("z", 1)]);
    graph.commit_with_tree("P", &["P0"], 100, &[("z", 1), ("y", 1)]);
    graph.commit_with_tree("Q", &[], 200, &[("x", 2)]);
    graph.commit_with_tree("M", &["P", "Q"], 300, &[("x", 1), ("y", 1), ("z", 1)]);

    let mut walk = filtered_walk(&graph, "x");
    let tip = walk.lookup_commit(&oid("M"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["M", "Q"]);
    assert_eq!(parent_names(&walk, tip, &graph), ["Q"]);
}
