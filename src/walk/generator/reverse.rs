//! Oldest-first emission
//!
//! Buffers the entire upstream output in a LIFO, then drains it, which
//! reverses whatever order the inner pipeline produced. Memory is
//! proportional to the full result set.

use super::{Generator, GeneratorFlags};
use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::queue::RevQueue;
use crate::walk::queue::block::SharedFreeList;
use crate::walk::queue::lifo::LifoQueue;

pub(crate) struct ReverseGenerator {
    source: Option<Box<dyn Generator>>,
    buffer: LifoQueue,
    output: GeneratorFlags,
}

impl ReverseGenerator {
    pub(crate) fn new(source: Box<dyn Generator>) -> Self {
        // Reversal invalidates any ordering claim the inner stages made.
        let output = source.output_flags()
            & !(GeneratorFlags::SORT_TIME_DESC | GeneratorFlags::SORT_TOPO);
        ReverseGenerator {
            source: Some(source),
            buffer: LifoQueue::new(),
            output,
        }
    }

    fn prime(&mut self, walk: &mut WalkCore) -> anyhow::Result<()> {
        let Some(mut source) = self.source.take() else {
            return Ok(());
        };
        while let Some(c) = source.next(walk)? {
            self.buffer.add(c, &walk.arena);
        }
        Ok(())
    }
}

impl Generator for ReverseGenerator {
    fn output_flags(&self) -> GeneratorFlags {
        self.output
    }

    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>> {
        self.prime(walk)?;
        Ok(self.buffer.next())
    }

    fn share_free_list(&mut self, free: &SharedFreeList) {
        self.buffer.share_free_list(free);
        if let Some(source) = self.source.as_mut() {
            source.share_free_list(free);
        }
    }
}
