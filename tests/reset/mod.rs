//! Walk reuse: reset, flag retention, carried application flags

use crate::common::{GraphBuilder, drain, oid};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// After a reset the walk can run again and the parsed headers are served
/// from the arena, not re-read from the object source.
#[rstest]
fn reset_allows_reuse_without_reloading() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);
    graph.commit("C", &["B"], 300);

    let mut walk = graph.walk();
    let tip = walk.lookup_commit(&oid("C"));
    walk.mark_start(tip).unwrap();
    assert_eq!(drain(&mut walk, &graph), ["C", "B", "A"]);

    let loads_after_first = graph.load_count();
    walk.reset();
    walk.mark_start(tip).unwrap();
    assert_eq!(drain(&mut walk, &graph), ["C", "B", "A"]);
    assert_eq!(graph.load_count(), loads_after_first);
}

/// A reset clears the traversal state left by a range walk, so the second
/// run sees the full history.
#[rstest]
fn reset_clears_uninteresting_state() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);
    graph.commit("C", &["B"], 300);

    let mut walk = graph.walk();
    let start = walk.lookup_commit(&oid("C"));
    let stop = walk.lookup_commit(&oid("A"));
    walk.mark_start(start).unwrap();
    walk.mark_uninteresting(stop).unwrap();
    assert_eq!(drain(&mut walk, &graph), ["C", "B"]);

    walk.reset();
    walk.mark_start(start).unwrap();
    assert_eq!(drain(&mut walk, &graph), ["C", "B", "A"]);
}

/// Retained application flags survive a reset; everything else is cleared.
#[rstest]
fn reset_retain_keeps_only_requested_flags() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);

    let mut walk = graph.walk();
    let keep = walk.new_flag("keep").unwrap();
    let toss = walk.new_flag("toss").unwrap();
    let tip = walk.lookup_commit(&oid("B"));
    walk.mark_start(tip).unwrap();
    walk.add_flag(tip, &keep);
    walk.add_flag(tip, &toss);
    assert_eq!(drain(&mut walk, &graph), ["B", "A"]);

    let mut retain = walk.new_flag_set();
    retain.insert(keep.clone());
    walk.reset_retain(&retain);

    assert!(walk.has_flag(tip, &keep));
    assert!(!walk.has_flag(tip, &toss));

    // Traversal state was still cleared.
    walk.mark_start(tip).unwrap();
    assert_eq!(drain(&mut walk, &graph), ["B", "A"]);
}

/// A carried application flag spreads to the ancestry during traversal,
/// like the built-in uninteresting propagation.
#[rstest]
fn carried_flag_reaches_ancestors() {
    let graph = GraphBuilder::new();
    graph.commit("A", &[], 100);
    graph.commit("B", &["A"], 200);
    graph.commit("C", &["B"], 300);

    let mut walk = graph.walk();
    let mark = walk.new_flag("mark").unwrap();
    walk.carry(&mark);
    let tip = walk.lookup_commit(&oid("C"));
    walk.mark_start(tip).unwrap();
    walk.add_flag(tip, &mark);
    assert_eq!(drain(&mut walk, &graph), ["C", "B", "A"]);

    let root = walk.lookup_commit(&oid("A"));
    assert!(walk.has_flag(root, &mark));
}
