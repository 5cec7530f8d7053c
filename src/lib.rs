//! Revision graph traversal engine
//!
//! Walks the commit graph of a content-addressable object store, the way a
//! log command does: start commits seed the walk, uninteresting commits cut
//! it off, and a pipeline of generator stages shapes the output order
//! (commit-time descending, topological, reversed) and optionally simplifies
//! history down to the commits touching a set of paths.
//!
//! The store itself stays abstract behind [`ObjectSource`]; the engine only
//! needs raw commit objects back for the ids it asks about. Tree comparison
//! for path filtering is likewise abstract behind [`TreeComparator`].
//!
//! ```no_run
//! use revwalk::{ObjectId, RevSort, RevWalk};
//! # fn open_source() -> Box<dyn revwalk::ObjectSource> { unimplemented!() }
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut walk = RevWalk::new(open_source());
//! let head = ObjectId::try_parse("1fe200e7d0b9cbdd4323c270cb1f99b17b3b9aea")?;
//! let tip = walk.lookup_commit(&head);
//! walk.mark_start(tip)?;
//! walk.sort(RevSort::CommitTimeDesc);
//! while let Some(c) = walk.next()? {
//!     println!("{}", walk.commit(c).oid());
//! }
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod objects;
pub mod rev_walk;
pub mod source;
pub mod walk;

pub use diff::{TreeChange, TreeComparator};
pub use objects::object_id::ObjectId;
pub use objects::object_type::ObjectType;
pub use rev_walk::RevWalk;
pub use source::{ObjectSource, RawObject};
pub use walk::CommitFilter;
pub use walk::arena::{CommitIx, RevCommit};
pub use walk::flags::{RevFlag, RevFlagSet};
pub use walk::sort::RevSort;
