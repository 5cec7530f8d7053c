//! Core traversal behavior: discovery, de-duplication, range exclusion

use crate::common::{GraphBuilder, drain, oid};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Linear history is emitted newest first.
///
/// ```text
/// A <- B <- C
/// ```
#[rstest]
fn linear_history_newest_first() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);
    graph.commit("C", &["B"], 300);

    let mut walk = graph.walk();
    let tip = walk.lookup_commit(&oid("C"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["C", "B", "A"]);
}

/// A commit reachable through two paths appears exactly once.
///
/// ```text
///       A
///      / \
///     B   C
///      \ /
///       D (merge)
/// ```
#[rstest]
fn diamond_merge_deduplicates() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);
    graph.commit("C", &["A"], 300);
    graph.commit("D", &["B", "C"], 400);

    let mut walk = graph.walk();
    let tip = walk.lookup_commit(&oid("D"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["D", "C", "B", "A"]);
}

/// Equal commit times keep discovery order stable.
#[rstest]
fn identical_timestamps_keep_discovery_order() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 100);
    graph.commit("C", &["B"], 100);

    let mut walk = graph.walk();
    let tip = walk.lookup_commit(&oid("C"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["C", "B", "A"]);
}

/// Uninteresting ancestry is excluded transitively, even where it is also
/// reachable from the interesting start.
///
/// ```text
///       A
///      / \
///     B   C (uninteresting)
///     |
///     D (start)
/// ```
#[rstest]
fn uninteresting_ancestry_is_excluded() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);
    graph.commit("C", &["A"], 300);
    graph.commit("D", &["B"], 400);

    let mut walk = graph.walk();
    let start = walk.lookup_commit(&oid("D"));
    let stop = walk.lookup_commit(&oid("C"));
    walk.mark_start(start).unwrap();
    walk.mark_uninteresting(stop).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["D", "B"]);
}

/// The common ancestor of two branches is excluded even when every commit
/// carries the same timestamp, which makes queue order arbitrary.
///
/// ```text
/// A <- B <- C <- D (start)
///       \
///        E <- F <- G (uninteresting)
/// ```
#[rstest]
fn common_ancestor_excluded_with_identical_timestamps() {
    let graph = GraphBuilder::new();
    for (name, parents) in [
        ("A", vec![]),
        ("B", vec!["A"]),
        ("C", vec!["B"]),
        ("D", vec!["C"]),
        ("E", vec!["B"]),
        ("F", vec!["E"]),
        ("G", vec!["F"]),
    ] {
        graph.commit(name, &parents, 100);
    }

    let mut walk = graph.walk();
    let start = walk.lookup_commit(&oid("D"));
    let stop = walk.lookup_commit(&oid("G"));
    walk.mark_start(start).unwrap();
    walk.mark_uninteresting(stop).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["D", "C"]);
}

/// A broken parent link surfaces as an error instead of silent truncation.
#[rstest]
fn missing_parent_surfaces_error() {
    let graph = GraphBuilder::new();
    graph.commit("B", &["Z"], 200);

    let mut walk = graph.walk();
    let tip = walk.lookup_commit(&oid("B"));
    walk.mark_start(tip).unwrap();

    let err = walk.next().unwrap_err();
    assert!(err.to_string().contains("missing object"), "{err:#}");
}

/// Starting from a non-commit object fails at mark time.
#[rstest]
fn wrong_object_type_fails_at_mark() {
    let graph = GraphBuilder::new();
    let blob = graph.blob("deadbeef");

    let mut walk = graph.walk();
    let ix = walk.lookup_commit(&blob);
    let err = walk.mark_start(ix).unwrap_err();
    assert!(err.to_string().contains("incorrect object type"), "{err:#}");
}

/// The iterator adaptor yields the same sequence as explicit `next` calls.
#[rstest]
fn iterator_adaptor_matches_next() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);

    let mut walk = graph.walk();
    let tip = walk.lookup_commit(&oid("B"));
    walk.mark_start(tip).unwrap();

    let ids: Vec<_> = walk
        .iter()
        .collect::<anyhow::Result<Vec<_>>>()
        .expect("traversal succeeds");
    let names: Vec<_> = ids
        .iter()
        .map(|&c| graph.name_of(walk.commit(c).oid()))
        .collect();
    assert_eq!(names, ["B", "A"]);
}

/// A commit filter hides commits without cutting off their ancestry.
#[rstest]
fn commit_filter_skips_without_truncating() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);
    graph.commit("C", &["B"], 300);

    let mut walk = graph.walk();
    let hidden = oid("B");
    walk.set_commit_filter(Some(Box::new(move |c: &revwalk::RevCommit| {
        c.oid() != &hidden
    })));
    let tip = walk.lookup_commit(&oid("C"));
    walk.mark_start(tip).unwrap();

    assert_eq!(drain(&mut walk, &graph), ["C", "A"]);
}
