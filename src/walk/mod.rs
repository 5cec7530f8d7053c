//! Revision walk internals
//!
//! The traversal engine is split into:
//!
//! - `arena`: dense commit storage plus identity interning
//! - `flags`: reserved flag bits and application flag allocation
//! - `queue`: the revision queue family (FIFO, LIFO, date-ordered, sentinel)
//! - `generator`: the composable pull-based pipeline stages
//! - `sort`: requested output orderings
//!
//! `WalkCore` is the shared mutable state every stage operates on: the
//! arena, the object source, and the active filters. Stages receive it by
//! mutable reference on every `next()` call, which keeps the pipeline free
//! of shared-ownership cells.

pub mod arena;
pub mod flags;
pub mod generator;
pub mod queue;
pub mod sort;

use crate::diff::TreeComparator;
use crate::objects::object_type::ObjectType;
use crate::objects::commit_header::CommitHeader;
use crate::source::{self, ObjectSource};
use anyhow::Context;
use arena::{CommitArena, CommitIx, RevCommit};
use flags::CommitFlags;

/// Caller-supplied inclusion predicate applied during admission
///
/// Commits the predicate rejects are skipped, but their ancestry is still
/// traversed.
pub trait CommitFilter {
    fn include(&mut self, commit: &RevCommit) -> bool;
}

impl<F> CommitFilter for F
where
    F: FnMut(&RevCommit) -> bool,
{
    fn include(&mut self, commit: &RevCommit) -> bool {
        self(commit)
    }
}

/// Shared traversal state threaded through every generator stage
pub(crate) struct WalkCore {
    pub(crate) arena: CommitArena,
    pub(crate) source: Box<dyn ObjectSource>,
    pub(crate) comparator: Option<Box<dyn TreeComparator>>,
    pub(crate) commit_filter: Option<Box<dyn CommitFilter>>,
    /// Flag bits spread to ancestors during admission; always includes
    /// UNINTERESTING
    pub(crate) carry_mask: u32,
}

impl WalkCore {
    pub(crate) fn new(source: Box<dyn ObjectSource>) -> Self {
        WalkCore {
            arena: CommitArena::new(),
            source,
            comparator: None,
            commit_filter: None,
            carry_mask: CommitFlags::UNINTERESTING.bits(),
        }
    }

    /// Parse a commit header from the object source
    ///
    /// Idempotent: the PARSED flag guards re-entry, so the source is
    /// contacted exactly once per commit. Fails when the object is missing
    /// or is not a commit.
    pub(crate) fn parse(&mut self, ix: CommitIx) -> anyhow::Result<()> {
        if self.arena.get(ix).is(CommitFlags::PARSED) {
            return Ok(());
        }

        let oid = self.arena.get(ix).oid().clone();
        let raw = self.source.load(&oid)?;
        if raw.object_type != ObjectType::Commit {
            return Err(source::incorrect_type(
                &oid,
                raw.object_type,
                ObjectType::Commit,
            ));
        }

        let header = CommitHeader::deserialize(&raw.data)
            .with_context(|| format!("while parsing commit {}", oid))?;
        let parents: Vec<CommitIx> = header
            .parents
            .iter()
            .map(|p| self.arena.lookup(p))
            .collect();

        let commit = self.arena.get_mut(ix);
        commit.parents = parents;
        commit.tree = Some(header.tree);
        commit.timestamp = header.timestamp;
        commit.flags |= CommitFlags::PARSED;
        Ok(())
    }

    /// Spread the carried flag bits of a commit to its materialized ancestry
    ///
    /// Only parents that already exist in the arena are reached; deeper
    /// ancestors pick the bits up when admission parses and re-carries them.
    pub(crate) fn carry_flags(&mut self, ix: CommitIx) {
        let carry = self.arena.get(ix).flags.bits() & self.carry_mask;
        if carry == 0 {
            return;
        }
        let carry = CommitFlags::from_bits_retain(carry);

        let mut stack = vec![ix];
        while let Some(c) = stack.pop() {
            for p in self.arena.get(c).parents.clone() {
                if self.arena.get(p).is(carry) {
                    continue;
                }
                self.arena.get_mut(p).flags |= carry;
                stack.push(p);
            }
        }
    }
}
