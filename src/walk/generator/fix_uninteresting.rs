//! Uninteresting cleanup pass
//!
//! Admission suppresses uninteresting commits, but a commit already sitting
//! in the delay window when its UNINTERESTING flag arrives slips through.
//! This stage drops any such stragglers coming out of the buffered source.

use super::{Generator, GeneratorFlags};
use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::flags::CommitFlags;
use crate::walk::queue::block::SharedFreeList;

pub(crate) struct FixUninterestingGenerator {
    source: Box<dyn Generator>,
}

impl FixUninterestingGenerator {
    pub(crate) fn new(source: Box<dyn Generator>) -> Self {
        FixUninterestingGenerator { source }
    }
}

impl Generator for FixUninterestingGenerator {
    fn output_flags(&self) -> GeneratorFlags {
        self.source.output_flags() & !GeneratorFlags::HAS_UNINTERESTING
    }

    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>> {
        loop {
            match self.source.next(walk)? {
                Some(c) if walk.arena.get(c).is(CommitFlags::UNINTERESTING) => continue,
                other => return Ok(other),
            }
        }
    }

    fn share_free_list(&mut self, free: &SharedFreeList) {
        self.source.share_free_list(free);
    }
}
