//! Clock-skew delay window
//!
//! Holds a fixed over-scan count of upstream commits in a FIFO before
//! releasing the oldest one. The constant latency gives uninteresting
//! propagation a chance to catch ancestors whose timestamps are slightly
//! out of order before they reach the caller.

use super::{Generator, GeneratorFlags};
use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::generator::pending::OVER_SCAN;
use crate::walk::queue::RevQueue;
use crate::walk::queue::block::SharedFreeList;
use crate::walk::queue::fifo::FifoQueue;

pub(crate) struct DelayGenerator {
    source: Box<dyn Generator>,
    delay: FifoQueue,
    size: usize,
}

impl DelayGenerator {
    pub(crate) fn new(source: Box<dyn Generator>) -> Self {
        DelayGenerator {
            source,
            delay: FifoQueue::new(),
            size: 0,
        }
    }
}

impl Generator for DelayGenerator {
    fn output_flags(&self) -> GeneratorFlags {
        self.source.output_flags()
    }

    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>> {
        while self.size < OVER_SCAN {
            match self.source.next(walk)? {
                Some(c) => {
                    self.delay.add(c, &walk.arena);
                    self.size += 1;
                }
                None => break,
            }
        }

        match self.delay.next() {
            Some(c) => {
                self.size -= 1;
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    fn share_free_list(&mut self, free: &SharedFreeList) {
        self.delay.share_free_list(free);
        self.source.share_free_list(free);
    }
}
