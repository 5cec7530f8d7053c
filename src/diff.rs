//! Tree comparator collaborator
//!
//! History simplification needs to know whether a commit changed anything
//! under the active path filter relative to a parent. The comparator owns
//! both the tree-walking machinery and the path predicate; the walk consumes
//! its change records as an opaque service. Structural errors in tree data
//! (bad modes, wrong ordering, duplicates) bubble through unchanged.

use crate::objects::object_id::ObjectId;

/// One differing path between two trees, restricted to the path filter
///
/// A mode of `0` means the entry is absent on that side: an addition has
/// `old_mode == 0`, a deletion has `new_mode == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChange {
    pub path: String,
    pub old_mode: u32,
    pub new_mode: u32,
}

impl TreeChange {
    /// True when the entry exists only on the new side
    pub fn is_addition(&self) -> bool {
        self.old_mode == 0
    }
}

/// Filtered diff between two tree snapshots
///
/// `old_tree` is `None` when diffing against the empty tree (root commits).
/// An empty result means the trees are identical under the path filter.
pub trait TreeComparator {
    fn diff(
        &mut self,
        old_tree: Option<&ObjectId>,
        new_tree: &ObjectId,
    ) -> anyhow::Result<Vec<TreeChange>>;
}
