//! Revision walk orchestrator
//!
//! `RevWalk` owns the commit arena, the start queue and the generator
//! pipeline, and exposes the whole engine through a small surface: mark
//! starting points, pick sortings and filters, then pull commits one at a
//! time. The pipeline is assembled lazily on the first `next()` call, and
//! from that point on the configuration is frozen.
//!
//! A walk is single-threaded by construction (the block pool is reference
//! counted without atomics); create one walk per thread.

use crate::diff::TreeComparator;
use crate::objects::object_id::ObjectId;
use crate::walk::arena::{CommitIx, RevCommit};
use crate::walk::flags::{APP_FLAGS, CommitFlags, RevFlag, RevFlagSet};
use crate::walk::generator::{Generator, start};
use crate::walk::queue::{AlwaysEmptyQueue, RevQueue};
use crate::walk::queue::fifo::FifoQueue;
use crate::walk::sort::{RevSort, SortFlags};
use crate::walk::{CommitFilter, WalkCore};
use crate::source::ObjectSource;
use anyhow::bail;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WALK_ID: AtomicU64 = AtomicU64::new(1);

fn next_walk_id() -> u64 {
    NEXT_WALK_ID.fetch_add(1, Ordering::Relaxed)
}

pub struct RevWalk {
    core: WalkCore,
    /// Start commits in mark order; drained into the date queue on the
    /// first `next()`, then replaced by the exhausted sentinel
    seed: Box<dyn RevQueue>,
    pending: Option<Box<dyn Generator>>,
    /// Every commit ever passed to `mark_start`/`mark_uninteresting`,
    /// kept for `reset`
    roots: Vec<CommitIx>,
    sorting: SortFlags,
    /// Bitmask of application flag bits still available to `new_flag`
    free_app_flags: u32,
    walk_id: u64,
}

impl RevWalk {
    pub fn new(source: Box<dyn ObjectSource>) -> Self {
        RevWalk {
            core: WalkCore::new(source),
            seed: Box::new(FifoQueue::new()),
            pending: None,
            roots: Vec::new(),
            sorting: SortFlags::empty(),
            free_app_flags: APP_FLAGS,
            walk_id: next_walk_id(),
        }
    }

    /// Intern an object id, creating an unparsed commit slot on first sight
    pub fn lookup_commit(&mut self, oid: &ObjectId) -> CommitIx {
        self.core.arena.lookup(oid)
    }

    /// Intern and eagerly parse a commit header
    pub fn parse_commit(&mut self, oid: &ObjectId) -> anyhow::Result<CommitIx> {
        let ix = self.core.arena.lookup(oid);
        self.core.parse(ix)?;
        Ok(ix)
    }

    pub fn commit(&self, ix: CommitIx) -> &RevCommit {
        self.core.arena.get(ix)
    }

    /// Mark a commit as a starting point of the traversal
    ///
    /// Parses the header up front so a bad start commit fails here rather
    /// than mid-walk. Marking the same commit twice is a no-op.
    pub fn mark_start(&mut self, ix: CommitIx) -> anyhow::Result<()> {
        self.assert_not_started();
        if self.core.arena.get(ix).is(CommitFlags::SEEN) {
            return Ok(());
        }
        self.core.parse(ix)?;
        self.core.arena.get_mut(ix).flags |= CommitFlags::SEEN;
        self.roots.push(ix);
        self.seed.add(ix, &self.core.arena);
        Ok(())
    }

    /// Mark a commit, and transitively its ancestry, as uninteresting
    ///
    /// The commit still seeds the traversal so the flag propagates through
    /// the graph alongside the interesting starts.
    pub fn mark_uninteresting(&mut self, ix: CommitIx) -> anyhow::Result<()> {
        self.assert_not_started();
        self.core.arena.get_mut(ix).flags |= CommitFlags::UNINTERESTING;
        self.core.carry_flags(ix);
        self.mark_start(ix)
    }

    /// Select exactly this output ordering, discarding previous choices
    pub fn sort(&mut self, sort: RevSort) {
        self.assert_not_started();
        self.sorting = SortFlags::from(sort);
    }

    /// Add or remove one ordering on top of the current combination
    ///
    /// `RevSort::None` is exclusive: enabling it clears everything else,
    /// and disabling it is a no-op.
    pub fn sort_with(&mut self, sort: RevSort, use_it: bool) {
        self.assert_not_started();
        match sort {
            RevSort::None => {
                if use_it {
                    self.sorting = SortFlags::empty();
                }
            }
            other => self.sorting.set(SortFlags::from(other), use_it),
        }
    }

    /// Restrict the walk to commits touching paths the comparator reports,
    /// rewriting parent links across the elided history
    pub fn set_tree_filter(&mut self, comparator: Option<Box<dyn TreeComparator>>) {
        self.assert_not_started();
        self.core.comparator = comparator;
    }

    pub fn set_commit_filter(&mut self, filter: Option<Box<dyn CommitFilter>>) {
        self.assert_not_started();
        self.core.commit_filter = filter;
    }

    /// Allocate an application flag bit owned by this walk
    ///
    /// Fails once all application bits are in use; previously issued flags
    /// stay valid.
    pub fn new_flag(&mut self, name: impl Into<String>) -> anyhow::Result<RevFlag> {
        let name = name.into();
        if self.free_app_flags == 0 {
            bail!(
                "cannot allocate flag '{}': all {} application flag bits are in use",
                name,
                APP_FLAGS.count_ones(),
            );
        }
        let mask = 1u32 << self.free_app_flags.trailing_zeros();
        self.free_app_flags &= !mask;
        Ok(RevFlag::new(name, mask, self.walk_id))
    }

    pub fn new_flag_set(&self) -> RevFlagSet {
        RevFlagSet::new()
    }

    /// Automatically spread this flag to the ancestry of every commit that
    /// carries it, the way UNINTERESTING always spreads
    pub fn carry(&mut self, flag: &RevFlag) {
        self.verify_flag(flag);
        self.core.carry_mask |= flag.mask;
    }

    /// Return a flag bit to the pool
    ///
    /// Call only after `reset` has cleared the bit from every commit,
    /// otherwise a later allocation inherits stale marks.
    pub fn free_flag(&mut self, flag: RevFlag) {
        self.verify_flag(&flag);
        self.core.carry_mask &= !flag.mask;
        self.free_app_flags |= flag.mask;
    }

    pub fn add_flag(&mut self, ix: CommitIx, flag: &RevFlag) {
        self.verify_flag(flag);
        self.core.arena.get_mut(ix).flags |= CommitFlags::from_bits_retain(flag.mask);
    }

    pub fn remove_flag(&mut self, ix: CommitIx, flag: &RevFlag) {
        self.verify_flag(flag);
        self.core.arena.get_mut(ix).flags &= !CommitFlags::from_bits_retain(flag.mask);
    }

    pub fn has_flag(&self, ix: CommitIx, flag: &RevFlag) -> bool {
        self.verify_flag(flag);
        self.core.arena.get(ix).is(CommitFlags::from_bits_retain(flag.mask))
    }

    /// Produce the next commit of the traversal
    ///
    /// The first call freezes the configuration and assembles the pipeline.
    /// After an error the traversal is abandoned; call `reset` before
    /// reusing the walk.
    pub fn next(&mut self) -> anyhow::Result<Option<CommitIx>> {
        if self.pending.is_none() {
            let mut seed: Box<dyn RevQueue> =
                std::mem::replace(&mut self.seed, Box::new(AlwaysEmptyQueue));
            let use_tree_filter = self.core.comparator.is_some();
            let g = start::connect(&mut self.core, seed.as_mut(), self.sorting, use_tree_filter);
            self.pending = Some(g);
        }
        self.pending
            .as_mut()
            .expect("pipeline was just assembled")
            .next(&mut self.core)
    }

    /// Iterator adaptor over `next()`
    ///
    /// Finite and single-pass; an error ends the iteration after being
    /// yielded once.
    pub fn iter(&mut self) -> Iter<'_> {
        Iter {
            walk: self,
            done: false,
        }
    }

    /// Clear per-traversal state, keeping parsed headers and interning
    pub fn reset(&mut self) {
        self.reset_retain(&RevFlagSet::new());
    }

    /// Clear per-traversal state, preserving the given application flags
    ///
    /// Walks every commit reachable from prior roots and strips all flag
    /// bits except PARSED and the retained set. Parsed headers survive, so
    /// a following traversal never re-reads the object source.
    pub fn reset_retain(&mut self, retain: &RevFlagSet) {
        let retain_mask = retain.mask | CommitFlags::PARSED.bits();
        let clear_mask = !retain_mask;

        let mut stack = std::mem::take(&mut self.roots);
        while let Some(c) = stack.pop() {
            let commit = self.core.arena.get_mut(c);
            if commit.flags.bits() & clear_mask == 0 {
                // Already clean, and so is everything beneath it.
                continue;
            }
            commit.flags = CommitFlags::from_bits_retain(commit.flags.bits() & retain_mask);
            commit.in_degree = 0;
            stack.extend_from_slice(self.core.arena.get(c).parents());
        }

        self.pending = None;
        self.seed = Box::new(FifoQueue::new());
    }

    /// Discard everything: commits, interning, issued flags
    ///
    /// Flags allocated before `dispose` are invalid afterward; using one
    /// panics.
    pub fn dispose(&mut self) {
        self.core.arena.clear();
        self.core.carry_mask = CommitFlags::UNINTERESTING.bits();
        self.free_app_flags = APP_FLAGS;
        self.walk_id = next_walk_id();
        self.roots.clear();
        self.pending = None;
        self.seed = Box::new(FifoQueue::new());
    }

    fn assert_not_started(&self) {
        assert!(
            self.pending.is_none(),
            "walk configuration cannot change after traversal has started",
        );
    }

    fn verify_flag(&self, flag: &RevFlag) {
        assert!(
            flag.walk_id == self.walk_id,
            "flag '{}' belongs to a different revision walk",
            flag.name(),
        );
    }
}

pub struct Iter<'a> {
    walk: &'a mut RevWalk,
    done: bool,
}

impl Iterator for Iter<'_> {
    type Item = anyhow::Result<CommitIx>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.walk.next() {
            Ok(Some(c)) => Some(Ok(c)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
