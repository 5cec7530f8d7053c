//! Generator pipeline
//!
//! A generator is a pull-based lazy producer of commits: one `next()` call
//! yields one commit or end-of-stream. Stages wrap each other to form a
//! pipeline; every `next()` on an outer stage pulls zero or more commits
//! from its source before producing. The stages:
//!
//! - `pending`: admission from the date queue, uninteresting propagation
//! - `rewrite`: history simplification under a path filter (both phases)
//! - `delay`: bounded over-scan window for clock-skew tolerance
//! - `fix_uninteresting`: cleanup pass dropping escaped uninteresting commits
//! - `topo`: topological delay ordering
//! - `reverse`: full buffering for oldest-first emission
//! - `boundary`: boundary-commit emission after the main output
//! - `start`: deterministic pipeline assembly from the requested sortings

pub(crate) mod boundary;
pub(crate) mod delay;
pub(crate) mod fix_uninteresting;
pub(crate) mod pending;
pub(crate) mod reverse;
pub(crate) mod rewrite;
pub(crate) mod start;
pub(crate) mod topo;

use crate::walk::WalkCore;
use crate::walk::arena::CommitIx;
use crate::walk::queue::block::SharedFreeList;
use bitflags::bitflags;

bitflags! {
    /// Capabilities a stage declares about its output
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct GeneratorFlags: u32 {
        /// Output is in descending commit-time order
        const SORT_TIME_DESC = 1 << 0;
        /// Output is topologically ordered (children before parents)
        const SORT_TOPO = 1 << 1;
        /// Output may still contain UNINTERESTING commits
        const HAS_UNINTERESTING = 1 << 2;
        /// Output may contain REWRITE-flagged commits
        const HAS_REWRITE = 1 << 3;
        /// Output still needs the parent-rewrite pass
        const NEEDS_REWRITE = 1 << 4;
    }
}

/// One stage of the pull-based pipeline
pub(crate) trait Generator {
    /// Capability mask describing this stage's output
    fn output_flags(&self) -> GeneratorFlags;

    /// Produce the next commit, or `None` at clean end of traversal
    ///
    /// Errors from the object source or the tree comparator propagate
    /// verbatim; no stage swallows an error from its source.
    fn next(&mut self, walk: &mut WalkCore) -> anyhow::Result<Option<CommitIx>>;

    /// Join this stage's internal block queues to a shared pool
    fn share_free_list(&mut self, _free: &SharedFreeList) {}
}
