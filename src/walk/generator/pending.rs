//! Admission and uninteresting propagation
//!
//! The base stage of every pipeline. Pulls commits from the date-ordered
//! admission queue; for each one it parses and guard-enqueues the parents
//! (SEEN keeps every commit to a single visit), spreads carried flags to
//! the materialized ancestry, suppresses uninteresting commits, and applies
//! the inclusion test (caller predicate plus the tree-filter phase of
//! history simplification).
//!
//! Because admission is date-ordered while parent timestamps can exceed
//! child timestamps (clock skew), termination is conservative: once
//! everything still pending is uninteresting, the stage keeps scanning
//! while the next pending commit is not older than the last one produced,
//! so uninteresting propagation can reach slightly out-of-order ancestors.

use super::{Generator, GeneratorFlags};
use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::flags::CommitFlags;
use crate::walk::generator::rewrite;
use crate::walk::queue::RevQueue;
use crate::walk::queue::date::DateQueue;
use chrono::{DateTime, FixedOffset};

/// Number of commits the delay stage buffers ahead of emission
pub(crate) const OVER_SCAN: usize = 6;

pub(crate) struct PendingGenerator {
    pending: DateQueue,
    output: GeneratorFlags,
    /// Whether the queue may be dropped once everything left is
    /// uninteresting; boundary reporting needs it kept
    can_dispose: bool,
    /// Timestamp of the last produced commit; None until first production
    last_time: Option<DateTime<FixedOffset>>,
    use_tree_filter: bool,
}

impl PendingGenerator {
    pub(crate) fn new(
        pending: DateQueue,
        has_uninteresting: bool,
        use_tree_filter: bool,
        can_dispose: bool,
    ) -> Self {
        let mut output = GeneratorFlags::SORT_TIME_DESC;
        if has_uninteresting {
            output |= GeneratorFlags::HAS_UNINTERESTING;
        }
        if use_tree_filter {
            output |= GeneratorFlags::HAS_REWRITE | GeneratorFlags::NEEDS_REWRITE;
        }
        PendingGenerator {
            pending,
            output,
            can_dispose,
            last_time: None,
            use_tree_filter,
        }
    }

    /// Inclusion test: caller predicate, then the tree-filter phase
    ///
    /// The tree filter may rewrite the commit's parent list (merge
    /// collapse, synthetic roots), so it runs before parents are enqueued.
    fn include(&mut self, walk: &mut WalkCore, c: CommitIx) -> anyhow::Result<bool> {
        if let Some(filter) = walk.commit_filter.as_mut() {
            let commit = walk.arena.get(c);
            if !filter.include(commit) {
                return Ok(false);
            }
        }
        if self.use_tree_filter {
            return rewrite::include_by_tree(walk, c);
        }
        Ok(true)
    }
}

impl Generator for PendingGenerator {
    fn output_flags(&self) -> GeneratorFlags {
        self.output
    }

    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>> {
        loop {
            let Some(c) = self.pending.next() else {
                return Ok(None);
            };

            let uninteresting = walk.arena.get(c).is(CommitFlags::UNINTERESTING);
            let produce = if uninteresting {
                false
            } else {
                self.include(walk, c)?
            };

            // Enqueue parents after the inclusion test so a rewritten
            // parent list is the one that gets walked.
            for p in walk.arena.get(c).parents().to_vec() {
                if walk.arena.get(p).is(CommitFlags::SEEN) {
                    continue;
                }
                // Parse before the add so the date queue sees a real
                // timestamp.
                walk.parse(p)?;
                self.pending
                    .add_guarded(p, CommitFlags::SEEN, &mut walk.arena);
            }
            walk.carry_flags(c);

            if walk.arena.get(c).is(CommitFlags::UNINTERESTING) {
                if self
                    .pending
                    .everybody_has_flag(CommitFlags::UNINTERESTING, &walk.arena)
                {
                    if let Some(n) = self.pending.peek() {
                        let next_time = walk.arena.get(n).timestamp();
                        if self.last_time.is_none_or(|last| next_time >= last) {
                            // Too close to call: the next pending commit is
                            // not older than the last one produced, so keep
                            // scanning to flush propagation through it.
                            continue;
                        }
                    }
                    if self.can_dispose {
                        self.pending.clear();
                    }
                    return Ok(None);
                }
                continue;
            }

            if produce {
                self.last_time = Some(walk.arena.get(c).timestamp());
                return Ok(Some(c));
            }
            // Filtered out; its ancestry has already been enqueued.
        }
    }
}
