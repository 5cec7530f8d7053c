//! Last-in/first-out revision queue
//!
//! Strict reverse-insertion order, backed by pooled blocks. Doubles as the
//! buffering stage for reverse-order output: drain a source into it, then
//! pop to emit everything backwards.

use super::RevQueue;
use super::block::{Block, SharedFreeList, new_free_list};
use crate::walk::arena::{CommitArena, CommitIx};
use crate::walk::flags::CommitFlags;

pub(crate) struct LifoQueue {
    /// Top of the stack is the last element
    blocks: Vec<Box<Block>>,
    free: SharedFreeList,
}

impl Default for LifoQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LifoQueue {
    pub(crate) fn new() -> Self {
        LifoQueue {
            blocks: Vec::new(),
            free: new_free_list(),
        }
    }

    pub(crate) fn share_free_list(&mut self, free: &SharedFreeList) {
        self.free = free.clone();
    }

    fn iter(&self) -> impl Iterator<Item = CommitIx> + '_ {
        self.blocks.iter().flat_map(|b| b.iter())
    }
}

impl RevQueue for LifoQueue {
    fn add(&mut self, c: CommitIx, _arena: &CommitArena) {
        let needs_block = self.blocks.last().is_none_or(|b| b.is_full());
        if needs_block {
            let b = self.free.borrow_mut().new_block();
            self.blocks.push(b);
        }
        self.blocks
            .last_mut()
            .expect("a top block was just ensured")
            .add(c);
    }

    fn next(&mut self) -> Option<CommitIx> {
        loop {
            let top = self.blocks.last_mut()?;
            if top.is_empty() {
                let b = self.blocks.pop().expect("top exists");
                self.free.borrow_mut().free_block(b);
                continue;
            }
            return Some(top.pop_tail());
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
