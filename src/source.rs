//! Object loader collaborator
//!
//! The walk reads commits through this narrow contract: given an identity,
//! hand back raw bytes plus the declared type, or fail. How the bytes are
//! stored (loose objects, packs, an in-memory map in tests) is not the
//! walk's concern. Each commit is loaded exactly once; the parsed header is
//! cached in the walk arena afterwards.

use crate::objects::object_id::ObjectId;
use crate::objects::object_type::ObjectType;
use bytes::Bytes;

/// A raw object as delivered by the backing store
#[derive(Debug, Clone)]
pub struct RawObject {
    /// The kind the store recorded for this object
    pub object_type: ObjectType,
    /// Object payload, without the `<type> <size>\0` envelope
    pub data: Bytes,
}

/// Read access to a content-addressable object store
///
/// Implementations must fail with [`missing_object`] when the identity is
/// unknown; the walk surfaces that error verbatim and does not retry, since
/// a broken link indicates repository corruption.
pub trait ObjectSource {
    fn load(&self, oid: &ObjectId) -> anyhow::Result<RawObject>;
}

/// Error value for an identity the backing store cannot resolve
pub fn missing_object(oid: &ObjectId) -> anyhow::Error {
    anyhow::anyhow!("missing object: {}", oid)
}

/// Error value for an identity that resolved to the wrong kind of object
pub fn incorrect_type(oid: &ObjectId, actual: ObjectType, expected: ObjectType) -> anyhow::Error {
    anyhow::anyhow!("incorrect object type: {} is a {}, expected {}", oid, actual, expected)
}
