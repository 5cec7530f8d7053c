//! Output orderings
//!
//! Sort strategies compose, except `None` which stands for "no particular
//! order" and is exclusive: selecting any other strategy clears it.

use bitflags::bitflags;

/// A requested output ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevSort {
    /// No particular order; commits appear as the traversal discovers them
    None,
    /// Descending commit timestamp
    CommitTimeDesc,
    /// All children before any parent
    Topo,
    /// Reverse the final output (forces full buffering)
    Reverse,
    /// Append boundary commits after the main output
    Boundary,
}

bitflags! {
    /// Internal combined form of the requested sortings
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct SortFlags: u8 {
        const TIME_DESC = 1 << 0;
        const TOPO = 1 << 1;
        const REVERSE = 1 << 2;
        const BOUNDARY = 1 << 3;
    }
}

impl From<RevSort> for SortFlags {
    fn from(sort: RevSort) -> Self {
        match sort {
            RevSort::None => SortFlags::empty(),
            RevSort::CommitTimeDesc => SortFlags::TIME_DESC,
            RevSort::Topo => SortFlags::TOPO,
            RevSort::Reverse => SortFlags::REVERSE,
            RevSort::Boundary => SortFlags::BOUNDARY,
        }
    }
}
