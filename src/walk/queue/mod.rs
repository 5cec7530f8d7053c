//! Revision queue family
//!
//! Mutable containers of flagged commits with pluggable removal order:
//!
//! - `fifo`: strict insertion order, block-pooled, supports `unpop`
//! - `lifo`: strict reverse-insertion order, block-pooled
//! - `date`: descending commit-time order, linked entries
//! - `AlwaysEmptyQueue`: sentinel base case that never yields data
//!
//! Queue operations are pure data moves; they never touch the object source
//! and cannot fail. The one exception is adding to the sentinel, which is a
//! programmer error and panics.

pub(crate) mod block;
pub(crate) mod date;
pub(crate) mod fifo;
pub(crate) mod lifo;

use crate::walk::arena::{CommitArena, CommitIx};
use crate::walk::flags::CommitFlags;

/// Common contract of the revision queues
///
/// `add` takes the arena so date-ordered queues can read commit times; the
/// block-pooled queues ignore it.
pub(crate) trait RevQueue {
    fn add(&mut self, c: CommitIx, arena: &CommitArena);

    fn next(&mut self) -> Option<CommitIx>;

    fn clear(&mut self);

    /// O(n) scan: do all queued commits carry these flag bits?
    fn everybody_has_flag(&self, flags: CommitFlags, arena: &CommitArena) -> bool;

    /// O(n) scan: does any queued commit carry these flag bits?
    fn anybody_has_flag(&self, flags: CommitFlags, arena: &CommitArena) -> bool;

    /// Enqueue-once admission: skip when the control flag is already set,
    /// otherwise set it and enqueue
    fn add_guarded(&mut self, c: CommitIx, flag: CommitFlags, arena: &mut CommitArena) {
        if !arena.get(c).is(flag) {
            arena.get_mut(c).flags |= flag;
            self.add(c, arena);
        }
    }

    /// Apply the guarded add to every parent of a commit
    fn add_parents(&mut self, c: CommitIx, flag: CommitFlags, arena: &mut CommitArena) {
        for p in arena.get(c).parents().to_vec() {
            self.add_guarded(p, flag, arena);
        }
    }
}

/// Sentinel queue representing "exhausted, will never yield data"
///
/// Stands in wherever a queue slot must exist but no data can ever arrive,
/// avoiding an `Option` check at every call site.
#[derive(Default)]
pub(crate) struct AlwaysEmptyQueue;

impl RevQueue for AlwaysEmptyQueue {
    fn add(&mut self, _c: CommitIx, _arena: &CommitArena) {
        panic!("cannot add a commit to the always-empty queue");
    }

    fn next(&mut self) -> Option<CommitIx> {
        None
    }

    fn clear(&mut self) {}

    fn everybody_has_flag(&self, _flags: CommitFlags, _arena: &CommitArena) -> bool {
        true
    }

    fn anybody_has_flag(&self, _flags: CommitFlags, _arena: &CommitArena) -> bool {
        false
    }
}
