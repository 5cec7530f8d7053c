//! Block-pooled queue storage
//!
//! Queues buffer commits in fixed-capacity blocks with independent head and
//! tail cursors. Drained blocks return to a free list instead of the
//! allocator; queues handing work to each other can share one free list so
//! blocks cycle between them. The shared list is `Rc`-based and therefore
//! `!Send`: single-thread discipline per free-list group is enforced by the
//! type, not by convention.

use crate::walk::arena::CommitIx;
use std::cell::RefCell;
use std::rc::Rc;

/// Number of commit slots per block
pub(crate) const BLOCK_SIZE: usize = 256;

/// Fixed-capacity slot array with independent head/tail cursors
///
/// The cursors can be reset to the front, middle, or end of the slot array
/// so a recycled block can grow in whichever direction its queue needs
/// without reallocation.
pub(crate) struct Block {
    slots: [CommitIx; BLOCK_SIZE],
    /// Next slot to pop from
    head: usize,
    /// Next slot to push into
    tail: usize,
}

impl Block {
    fn new() -> Self {
        Block {
            slots: [CommitIx(0); BLOCK_SIZE],
            head: 0,
            tail: 0,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.tail == BLOCK_SIZE
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// True when there is room in front of the head for an unpop
    pub(crate) fn can_unpop(&self) -> bool {
        self.head > 0
    }

    pub(crate) fn add(&mut self, c: CommitIx) {
        self.slots[self.tail] = c;
        self.tail += 1;
    }

    pub(crate) fn pop(&mut self) -> CommitIx {
        let c = self.slots[self.head];
        self.head += 1;
        c
    }

    pub(crate) fn pop_tail(&mut self) -> CommitIx {
        self.tail -= 1;
        self.slots[self.tail]
    }

    /// Insert strictly before the current head
    pub(crate) fn unpop(&mut self, c: CommitIx) {
        self.head -= 1;
        self.slots[self.head] = c;
    }

    pub(crate) fn reset_to_front(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Leave room to grow in either direction
    pub(crate) fn reset_to_middle(&mut self) {
        self.head = BLOCK_SIZE / 2;
        self.tail = BLOCK_SIZE / 2;
    }

    /// Leave room only in front; used when unpopping onto a fresh block
    pub(crate) fn reset_to_end(&mut self) {
        self.head = BLOCK_SIZE;
        self.tail = BLOCK_SIZE;
    }

    /// Live entries, oldest first
    pub(crate) fn iter(&self) -> impl Iterator<Item = CommitIx> + '_ {
        self.slots[self.head..self.tail].iter().copied()
    }
}

/// Pool of recycled blocks
#[derive(Default)]
pub(crate) struct BlockFreeList {
    free: Vec<Box<Block>>,
}

impl BlockFreeList {
    pub(crate) fn new_block(&mut self) -> Box<Block> {
        match self.free.pop() {
            Some(mut b) => {
                b.reset_to_front();
                b
            }
            None => Box::new(Block::new()),
        }
    }

    pub(crate) fn free_block(&mut self, block: Box<Block>) {
        self.free.push(block);
    }
}

/// A free list shared between the queues of one pipeline
///
/// `Rc` keeps the group single-threaded by construction.
pub(crate) type SharedFreeList = Rc<RefCell<BlockFreeList>>;

pub(crate) fn new_free_list() -> SharedFreeList {
    Rc::new(RefCell::new(BlockFreeList::default()))
}
