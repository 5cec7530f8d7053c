//! Commit flag bits
//!
//! Every commit in the arena carries a 32-bit flag mask. The low bits are
//! reserved for the traversal machinery; the remaining bits are handed out
//! to applications one at a time by the owning walk. Flags allocated from
//! one walk are meaningless on another and are rejected loudly.

use bitflags::bitflags;

bitflags! {
    /// Per-commit flag mask
    ///
    /// The named bits are reserved; application bits live above them and are
    /// retained through the `_` catch-all so bitwise operations never drop
    /// them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct CommitFlags: u32 {
        /// Header has been parsed from the object source
        const PARSED = 1 << 0;
        /// Commit has been enqueued once; guards duplicate graph visits
        const SEEN = 1 << 1;
        /// Excluded from output; propagates to ancestors
        const UNINTERESTING = 1 << 2;
        /// Candidate for removal by history simplification
        const REWRITE = 1 << 3;
        /// Scratch bit; must be cleared before a stage returns control
        const TEMP_MARK = 1 << 4;
        /// Withheld by topological sort until all children are emitted
        const TOPO_DELAY = 1 << 5;
        const _ = !0;
    }
}

/// Number of low bits reserved for the traversal machinery
pub(crate) const RESERVED_FLAGS: u32 = 6;

/// Mask of the bits available for application flags
pub(crate) const APP_FLAGS: u32 = !0u32 << RESERVED_FLAGS;

/// A single application flag bit allocated from a walk
///
/// The flag remembers which walk issued it; walk operations panic when
/// handed a flag from a different walk instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevFlag {
    name: String,
    pub(crate) mask: u32,
    pub(crate) walk_id: u64,
}

impl RevFlag {
    pub(crate) fn new(name: String, mask: u32, walk_id: u64) -> Self {
        RevFlag {
            name,
            mask,
            walk_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for RevFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A set of flags from one walk, kept ordered by bit value
#[derive(Debug, Clone, Default)]
pub struct RevFlagSet {
    pub(crate) mask: u32,
    flags: Vec<RevFlag>,
}

impl RevFlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag to the set
    ///
    /// # Returns
    ///
    /// `true` if the flag was not already a member
    ///
    /// # Panics
    ///
    /// When mixing flags issued by different walk instances.
    pub fn insert(&mut self, flag: RevFlag) -> bool {
        if let Some(first) = self.flags.first() {
            assert_eq!(
                first.walk_id, flag.walk_id,
                "flag {} was allocated from a different walk",
                flag
            );
        }
        if self.mask & flag.mask != 0 {
            return false;
        }
        self.mask |= flag.mask;
        let at = self
            .flags
            .iter()
            .position(|f| f.mask > flag.mask)
            .unwrap_or(self.flags.len());
        self.flags.insert(at, flag);
        true
    }

    /// Remove a flag from the set
    ///
    /// # Returns
    ///
    /// `true` if the flag was a member
    pub fn remove(&mut self, flag: &RevFlag) -> bool {
        if self.mask & flag.mask == 0 {
            return false;
        }
        self.mask &= !flag.mask;
        self.flags.retain(|f| f.mask != flag.mask);
        true
    }

    pub fn contains(&self, flag: &RevFlag) -> bool {
        self.mask & flag.mask != 0
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RevFlag> {
        self.flags.iter()
    }
}

impl FromIterator<RevFlag> for RevFlagSet {
    fn from_iter<I: IntoIterator<Item = RevFlag>>(iter: I) -> Self {
        let mut set = RevFlagSet::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}
