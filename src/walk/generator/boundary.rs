//! Boundary commit emission
//!
//! While the source still yields, every UNINTERESTING parent of an emitted
//! commit is stashed in a held FIFO. When the source is exhausted the held
//! set is drained — de-duplicated through TEMP_MARK and parsed where needed
//! — and re-emitted after the main output, letting callers see the cut edge
//! of the traversal.

use super::{Generator, GeneratorFlags};
use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::flags::CommitFlags;
use crate::walk::queue::RevQueue;
use crate::walk::queue::block::SharedFreeList;
use crate::walk::queue::fifo::FifoQueue;

pub(crate) struct BoundaryGenerator {
    source: Box<dyn Generator>,
    held: FifoQueue,
    boundary: FifoQueue,
    draining: bool,
}

impl BoundaryGenerator {
    pub(crate) fn new(source: Box<dyn Generator>) -> Self {
        let held = FifoQueue::new();
        let boundary = FifoQueue::with_free_list(held.free_list());
        BoundaryGenerator {
            source,
            held,
            boundary,
            draining: false,
        }
    }

    /// Move the held parents into the boundary queue, dropping duplicates
    ///
    /// TEMP_MARK marks commits already taken and is cleared again before
    /// control returns to the emission loop.
    fn collect_boundary(&mut self, walk: &mut WalkCore) -> anyhow::Result<()> {
        while let Some(c) = self.held.next() {
            if walk.arena.get(c).is(CommitFlags::TEMP_MARK) {
                continue;
            }
            walk.arena.get_mut(c).flags |= CommitFlags::TEMP_MARK;
            walk.parse(c)?;
            self.boundary.add(c, &walk.arena);
        }
        self.boundary.remove_flag(CommitFlags::TEMP_MARK, &mut walk.arena);
        Ok(())
    }
}

impl Generator for BoundaryGenerator {
    fn output_flags(&self) -> GeneratorFlags {
        self.source.output_flags() | GeneratorFlags::HAS_UNINTERESTING
    }

    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>> {
        if !self.draining {
            if let Some(c) = self.source.next(walk)? {
                for p in walk.arena.get(c).parents().to_vec() {
                    if walk.arena.get(p).is(CommitFlags::UNINTERESTING) {
                        self.held.add(p, &walk.arena);
                    }
                }
                return Ok(Some(c));
            }
            self.draining = true;
            self.collect_boundary(walk)?;
        }

        Ok(self.boundary.next())
    }

    fn share_free_list(&mut self, free: &SharedFreeList) {
        self.held.share_free_list(free);
        self.boundary.share_free_list(free);
        self.source.share_free_list(free);
    }
}
