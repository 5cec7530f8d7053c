//! Topological delay ordering
//!
//! Fully buffers the upstream source, counting for every commit how many
//! buffered children reference it as a parent. Emission withholds a commit
//! while any child is still unemitted (TOPO_DELAY) and, when the last child
//! goes out, unpops the parent so it lands directly behind that child. The
//! result is a dense children-before-parents order that preserves locality.

use super::{Generator, GeneratorFlags};
use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::flags::CommitFlags;
use crate::walk::queue::RevQueue;
use crate::walk::queue::block::SharedFreeList;
use crate::walk::queue::fifo::FifoQueue;

pub(crate) struct TopoSortGenerator {
    source: Option<Box<dyn Generator>>,
    pending: FifoQueue,
    output: GeneratorFlags,
}

impl TopoSortGenerator {
    pub(crate) fn new(source: Box<dyn Generator>) -> Self {
        let output = source.output_flags() | GeneratorFlags::SORT_TOPO;
        TopoSortGenerator {
            source: Some(source),
            pending: FifoQueue::new(),
            output,
        }
    }

    /// Drain the source completely, accumulating in-degrees
    fn prime(&mut self, walk: &mut WalkCore) -> anyhow::Result<()> {
        let Some(mut source) = self.source.take() else {
            return Ok(());
        };
        source.share_free_list(&self.pending.free_list());
        while let Some(c) = source.next(walk)? {
            for p in walk.arena.get(c).parents().to_vec() {
                walk.arena.get_mut(p).in_degree += 1;
            }
            self.pending.add(c, &walk.arena);
        }
        Ok(())
    }
}

impl Generator for TopoSortGenerator {
    fn output_flags(&self) -> GeneratorFlags {
        self.output
    }

    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>> {
        self.prime(walk)?;

        loop {
            let Some(c) = self.pending.next() else {
                return Ok(None);
            };

            if walk.arena.get(c).in_degree > 0 {
                // At least one child is missing from the output; hold this
                // commit until the last child releases it.
                walk.arena.get_mut(c).flags |= CommitFlags::TOPO_DELAY;
                continue;
            }

            for p in walk.arena.get(c).parents().to_vec() {
                let parent = walk.arena.get_mut(p);
                parent.in_degree -= 1;
                if parent.in_degree == 0 && parent.is(CommitFlags::TOPO_DELAY) {
                    // This was the parent's last child; unpop it so it
                    // appears immediately behind us rather than at the tail.
                    parent.flags &= !CommitFlags::TOPO_DELAY;
                    self.pending.unpop(p);
                }
            }
            return Ok(Some(c));
        }
    }

    fn share_free_list(&mut self, free: &SharedFreeList) {
        self.pending.share_free_list(free);
        if let Some(source) = self.source.as_mut() {
            source.share_free_list(free);
        }
    }
}
