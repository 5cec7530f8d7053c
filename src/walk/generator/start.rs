//! Pipeline assembly
//!
//! Builds the generator chain for one traversal from the seeded start
//! queue and the requested sortings. Innermost is always admission over a
//! date-ordered queue; the remaining stages wrap it outward in a fixed
//! order so their interactions stay deterministic:
//!
//! admission -> rewrite -> topo -> reverse -> boundary | delay + cleanup

use super::Generator;
use super::boundary::BoundaryGenerator;
use super::delay::DelayGenerator;
use super::fix_uninteresting::FixUninterestingGenerator;
use super::pending::PendingGenerator;
use super::reverse::ReverseGenerator;
use super::rewrite::RewriteGenerator;
use super::topo::TopoSortGenerator;
use crate::walk::WalkCore;
use crate::walk::flags::CommitFlags;
use crate::walk::generator::GeneratorFlags;
use crate::walk::queue::RevQueue;
use crate::walk::queue::date::DateQueue;
use crate::walk::sort::SortFlags;

/// Assemble the pipeline for the current configuration
///
/// Consumes the seeded start queue. Boundary reporting forces the
/// admission queue to be retained after termination (`can_dispose`
/// false), since the leftover uninteresting commits are exactly the
/// boundary candidates' ancestors.
pub(crate) fn connect(
    walk: &mut WalkCore,
    seed: &mut dyn RevQueue,
    sort: SortFlags,
    use_tree_filter: bool,
) -> Box<dyn Generator> {
    let has_uninteresting = seed.anybody_has_flag(CommitFlags::UNINTERESTING, &walk.arena);
    let boundary = sort.contains(SortFlags::BOUNDARY) && has_uninteresting;

    let pending = DateQueue::from_queue(seed, &walk.arena);
    let mut g: Box<dyn Generator> = Box::new(PendingGenerator::new(
        pending,
        has_uninteresting,
        use_tree_filter,
        !boundary,
    ));

    if g.output_flags().contains(GeneratorFlags::NEEDS_REWRITE) {
        g = Box::new(RewriteGenerator::new(g));
    }
    if sort.contains(SortFlags::TOPO) && !g.output_flags().contains(GeneratorFlags::SORT_TOPO) {
        g = Box::new(TopoSortGenerator::new(g));
    }
    if sort.contains(SortFlags::REVERSE) {
        g = Box::new(ReverseGenerator::new(g));
    }
    if boundary {
        g = Box::new(BoundaryGenerator::new(g));
    } else if has_uninteresting {
        g = Box::new(DelayGenerator::new(g));
        g = Box::new(FixUninterestingGenerator::new(g));
    }
    g
}
