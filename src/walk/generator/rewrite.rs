//! History simplification under a path filter
//!
//! Two phases. Phase one (`include_by_tree`) runs inside admission as part
//! of the inclusion test: commits that introduce no filtered change relative
//! to a parent are flagged REWRITE and excluded, with merge commits
//! collapsing onto the one interesting parent they match. Phase two
//! (`RewriteGenerator`) runs after full buffering and rewrites the parent
//! references of the surviving commits so the output is a dense DAG with no
//! dangling references to collapsed commits.

use super::{Generator, GeneratorFlags};
use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::flags::CommitFlags;
use crate::walk::queue::RevQueue;
use crate::walk::queue::block::SharedFreeList;
use crate::walk::queue::fifo::FifoQueue;

/// Phase one: decide whether a commit survives the path filter
///
/// Side effects on exclusion: the commit gains REWRITE, and a collapsing
/// merge has its parent list replaced by the single matched parent. A
/// parent whose filtered diff is nothing but additions has its own parent
/// list truncated, making it a synthetic root for simplification purposes.
pub(crate) fn include_by_tree(walk: &mut WalkCore, c: CommitIx) -> anyhow::Result<bool> {
    for i in 0..walk.arena.get(c).parents().len() {
        let p = walk.arena.get(c).parents()[i];
        walk.parse(p)?;
    }

    let WalkCore {
        arena, comparator, ..
    } = walk;
    let cmp = comparator
        .as_mut()
        .expect("tree filter stage requires a comparator");

    let tree = arena.get(c).parsed_tree().clone();
    let parents = arena.get(c).parents().to_vec();

    match parents.as_slice() {
        [] => {
            // Root commit: keep only when the filter matches something.
            let changes = cmp.diff(None, &tree)?;
            if changes.is_empty() {
                arena.get_mut(c).flags |= CommitFlags::REWRITE;
                return Ok(false);
            }
            Ok(true)
        }
        [p] => {
            let old = arena.get(*p).parsed_tree().clone();
            let changes = cmp.diff(Some(&old), &tree)?;
            if changes.is_empty() {
                // No filtered difference; the parent stands in for this
                // commit.
                arena.get_mut(c).flags |= CommitFlags::REWRITE;
                return Ok(false);
            }
            Ok(true)
        }
        _ => {
            // Merge: one filtered diff per parent, then decide.
            let mut same_interesting = None;
            let mut same_uninteresting = false;
            let mut adds_only = Vec::new();

            for &p in &parents {
                let old = arena.get(p).parsed_tree().clone();
                let changes = cmp.diff(Some(&old), &tree)?;
                if changes.is_empty() {
                    if arena.get(p).is(CommitFlags::UNINTERESTING) {
                        // Identical to an uninteresting parent: collapsing
                        // would lie about where the content came from.
                        same_uninteresting = true;
                    } else if same_interesting.is_none() {
                        same_interesting = Some(p);
                    }
                } else if changes.iter().all(|ch| ch.is_addition()) {
                    adds_only.push(p);
                }
            }

            if let Some(p) = same_interesting
                && !same_uninteresting
            {
                let commit = arena.get_mut(c);
                commit.parents = vec![p];
                commit.flags |= CommitFlags::REWRITE;
                return Ok(false);
            }

            for p in adds_only {
                arena.get_mut(p).parents.clear();
            }
            Ok(true)
        }
    }
}

/// Phase two: rewrite parent references through collapsed chains
///
/// Fully buffers its source first so every commit the chains can reach has
/// already been classified by phase one.
pub(crate) struct RewriteGenerator {
    source: Option<Box<dyn Generator>>,
    pending: FifoQueue,
    output: GeneratorFlags,
}

impl RewriteGenerator {
    pub(crate) fn new(source: Box<dyn Generator>) -> Self {
        let output = (source.output_flags() | GeneratorFlags::HAS_REWRITE)
            & !GeneratorFlags::NEEDS_REWRITE;
        RewriteGenerator {
            source: Some(source),
            pending: FifoQueue::new(),
            output,
        }
    }

    fn prime(&mut self, walk: &mut WalkCore) -> anyhow::Result<()> {
        let Some(mut source) = self.source.take() else {
            return Ok(());
        };
        source.share_free_list(&self.pending.free_list());
        while let Some(c) = source.next(walk)? {
            self.pending.add(c, &walk.arena);
        }
        Ok(())
    }

    /// Follow a chain of collapsed single-parent commits to its stand-in
    ///
    /// Stops at the first commit that is a merge, uninteresting, or not
    /// REWRITE-flagged; a chain that bottoms out yields no parent at all.
    fn rewrite(walk: &WalkCore, mut p: CommitIx) -> Option<CommitIx> {
        loop {
            let commit = walk.arena.get(p);
            if commit.parents().len() > 1 {
                return Some(p);
            }
            if commit.is(CommitFlags::UNINTERESTING) {
                return Some(p);
            }
            if !commit.is(CommitFlags::REWRITE) {
                return Some(p);
            }
            match commit.parents().first() {
                Some(&parent) => p = parent,
                None => return None,
            }
        }
    }

    /// Drop collapsed-away slots and duplicates from a rewritten list
    ///
    /// TEMP_MARK flags already-kept parents during the scan and is cleared
    /// before returning.
    fn cleanup(walk: &mut WalkCore, rewritten: Vec<Option<CommitIx>>) -> Vec<CommitIx> {
        let mut kept = Vec::with_capacity(rewritten.len());
        for p in rewritten.into_iter().flatten() {
            if walk.arena.get(p).is(CommitFlags::TEMP_MARK) {
                continue;
            }
            walk.arena.get_mut(p).flags |= CommitFlags::TEMP_MARK;
            kept.push(p);
        }
        for &p in &kept {
            walk.arena.get_mut(p).flags &= !CommitFlags::TEMP_MARK;
        }
        kept
    }
}

impl Generator for RewriteGenerator {
    fn output_flags(&self) -> GeneratorFlags {
        self.output
    }

    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>> {
        self.prime(walk)?;

        let Some(c) = self.pending.next() else {
            return Ok(None);
        };

        let parents = walk.arena.get(c).parents().to_vec();
        let rewritten: Vec<Option<CommitIx>> =
            parents.iter().map(|&p| Self::rewrite(walk, p)).collect();

        let changed = rewritten
            .iter()
            .zip(&parents)
            .any(|(new, &old)| *new != Some(old));
        if changed {
            let new_parents = Self::cleanup(walk, rewritten);
            walk.arena.get_mut(c).parents = new_parents;
        }
        Ok(Some(c))
    }

    fn share_free_list(&mut self, free: &SharedFreeList) {
        self.pending.share_free_list(free);
    }
}
