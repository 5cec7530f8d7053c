//! Commit arena
//!
//! Commits live in a dense vector addressed by small integer indices; the
//! identity map interns each object ID exactly once. Queues and generator
//! stages move `CommitIx` values around instead of object references, which
//! keeps parent-list rewriting and flag mutation free of aliasing concerns.

use crate::objects::object_id::ObjectId;
use crate::walk::flags::{CommitFlags, RevFlag, RevFlagSet};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::HashMap;

/// Arena index of a commit; only meaningful within the walk that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitIx(pub(crate) u32);

/// A commit node in the revision graph
///
/// Created unparsed on first reference by identity; parsing fills in the
/// tree, parent list, and timestamp. The node lives for the walk's lifetime;
/// a reset clears flags, never the node itself.
#[derive(Debug, Clone)]
pub struct RevCommit {
    oid: ObjectId,
    pub(crate) flags: CommitFlags,
    pub(crate) parents: Vec<CommitIx>,
    pub(crate) tree: Option<ObjectId>,
    pub(crate) timestamp: DateTime<FixedOffset>,
    pub(crate) in_degree: u32,
}

impl RevCommit {
    fn new(oid: ObjectId) -> Self {
        RevCommit {
            oid,
            flags: CommitFlags::empty(),
            parents: Vec::new(),
            tree: None,
            timestamp: epoch(),
            in_degree: 0,
        }
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn parents(&self) -> &[CommitIx] {
        &self.parents
    }

    /// Tree snapshot id; `None` until the commit has been parsed
    pub fn tree(&self) -> Option<&ObjectId> {
        self.tree.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Test a single application flag
    pub fn has(&self, flag: &RevFlag) -> bool {
        self.flags.bits() & flag.mask != 0
    }

    /// Test whether any flag of the set is present
    pub fn has_any(&self, set: &RevFlagSet) -> bool {
        self.flags.bits() & set.mask != 0
    }

    /// Test whether every flag of the set is present
    pub fn has_all(&self, set: &RevFlagSet) -> bool {
        self.flags.bits() & set.mask == set.mask
    }

    pub(crate) fn is(&self, flags: CommitFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Tree id of a parsed commit
    pub(crate) fn parsed_tree(&self) -> &ObjectId {
        self.tree.as_ref().expect("commit header not parsed")
    }
}

fn epoch() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .expect("zero offset is valid")
        .timestamp_opt(0, 0)
        .single()
        .expect("epoch is unambiguous")
}

/// Dense commit storage plus the identity interning map
#[derive(Default)]
pub(crate) struct CommitArena {
    commits: Vec<RevCommit>,
    by_oid: HashMap<ObjectId, CommitIx>,
}

impl CommitArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Intern an identity, creating an unparsed node on first reference
    pub(crate) fn lookup(&mut self, oid: &ObjectId) -> CommitIx {
        if let Some(&ix) = self.by_oid.get(oid) {
            return ix;
        }
        let ix = CommitIx(self.commits.len() as u32);
        self.commits.push(RevCommit::new(oid.clone()));
        self.by_oid.insert(oid.clone(), ix);
        ix
    }

    pub(crate) fn get(&self, ix: CommitIx) -> &RevCommit {
        &self.commits[ix.0 as usize]
    }

    pub(crate) fn get_mut(&mut self, ix: CommitIx) -> &mut RevCommit {
        &mut self.commits[ix.0 as usize]
    }

    /// Drop every node and the identity map; previously issued indices are
    /// invalid afterwards
    pub(crate) fn clear(&mut self) {
        self.commits.clear();
        self.by_oid.clear();
    }
}
