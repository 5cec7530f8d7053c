//! Object identities and parsed commit headers
//!
//! The traversal engine never touches storage itself; it receives raw object
//! payloads from an [`crate::source::ObjectSource`] and parses only the parts
//! of a commit it needs for graph traversal:
//!
//! - `object_id`: SHA-1 identities (40 hex characters)
//! - `object_type`: object kind tags (blob, tree, commit, tag)
//! - `commit_header`: tree id, parent ids, and commit timestamp

pub mod commit_header;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
