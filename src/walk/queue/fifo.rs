//! First-in/first-out revision queue
//!
//! Strict insertion order, backed by pooled blocks. Supports `unpop`
//! (push-back in front of the head), which topological sorting uses to slot
//! a parent directly behind the child that unblocked it.

use super::RevQueue;
use super::block::{Block, SharedFreeList, new_free_list};
use crate::walk::arena::{CommitArena, CommitIx};
use crate::walk::flags::CommitFlags;
use std::collections::VecDeque;

pub(crate) struct FifoQueue {
    /// Front block is popped from, back block is pushed into
    blocks: VecDeque<Box<Block>>,
    free: SharedFreeList,
}

impl Default for FifoQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FifoQueue {
    pub(crate) fn new() -> Self {
        FifoQueue {
            blocks: VecDeque::new(),
            free: new_free_list(),
        }
    }

    pub(crate) fn with_free_list(free: SharedFreeList) -> Self {
        FifoQueue {
            blocks: VecDeque::new(),
            free,
        }
    }

    /// Draw future blocks from (and release them to) the given pool
    pub(crate) fn share_free_list(&mut self, free: &SharedFreeList) {
        self.free = free.clone();
    }

    pub(crate) fn free_list(&self) -> SharedFreeList {
        self.free.clone()
    }

    /// Insert strictly before the current head without disturbing order
    pub(crate) fn unpop(&mut self, c: CommitIx) {
        match self.blocks.front_mut() {
            None => {
                let mut b = self.free.borrow_mut().new_block();
                b.reset_to_middle();
                b.unpop(c);
                self.blocks.push_front(b);
            }
            Some(b) if b.can_unpop() => b.unpop(c),
            Some(_) => {
                let mut b = self.free.borrow_mut().new_block();
                b.reset_to_end();
                b.unpop(c);
                self.blocks.push_front(b);
            }
        }
    }

    /// Clear flag bits on every queued commit
    pub(crate) fn remove_flag(&self, flags: CommitFlags, arena: &mut CommitArena) {
        for b in &self.blocks {
            for c in b.iter() {
                arena.get_mut(c).flags &= !flags;
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = CommitIx> + '_ {
        self.blocks.iter().flat_map(|b| b.iter())
    }
}

impl RevQueue for FifoQueue {
    fn add(&mut self, c: CommitIx, _arena: &CommitArena) {
        let needs_block = self.blocks.back().is_none_or(|b| b.is_full());
        if needs_block {
            let b = self.free.borrow_mut().new_block();
            self.blocks.push_back(b);
        }
        self.blocks
            .back_mut()
            .expect("a tail block was just ensured")
            .add(c);
    }

    fn next(&mut self) -> Option<CommitIx> {
        loop {
            let front = self.blocks.front_mut()?;
            if front.is_empty() {
                let b = self.blocks.pop_front().expect("front exists");
                self.free.borrow_mut().free_block(b);
                continue;
            }
            return Some(front.pop());
        }
    }

    fn clear(&mut self) {
        let mut free = self.free.borrow_mut();
        for b in self.blocks.drain(..) {
            free.free_block(b);
        }
    }

    fn everybody_has_flag(&self, flags: CommitFlags, arena: &CommitArena) -> bool {
        self.iter().all(|c| arena.get(c).is(flags))
    }

    fn anybody_has_flag(&self, flags: CommitFlags, arena: &CommitArena) -> bool {
        self.iter().any(|c| arena.get(c).is(flags))
    }
}
