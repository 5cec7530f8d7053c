#![allow(dead_code)]

//! In-memory graph fixtures
//!
//! Tests build commit DAGs by name ("A", "B", ...) with explicit epochs and
//! tree snapshots, then walk them through an in-memory object source. Tree
//! snapshots are path -> version maps; the comparator diffs them under a
//! path prefix, so history simplification is exercised without any real
//! tree objects.

use bytes::Bytes;
use revwalk::{
    CommitIx, ObjectId, ObjectSource, ObjectType, RawObject, RevWalk, TreeChange, TreeComparator,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

/// Fabricate a stable object id from a name
///
/// The name is hex-encoded and left-padded, so distinct names always yield
/// distinct ids and failures print something readable.
pub fn oid(name: &str) -> ObjectId {
    assert!(name.len() <= 20, "fixture name too long: {name}");
    let hex: String = name.bytes().map(|b| format!("{b:02x}")).collect();
    ObjectId::try_parse(format!("{hex:0>40}")).expect("fabricated id is valid")
}

type Snapshot = BTreeMap<String, u32>;

#[derive(Default)]
struct Store {
    objects: HashMap<ObjectId, RawObject>,
    trees: HashMap<ObjectId, Snapshot>,
    names: HashMap<ObjectId, String>,
    loads: usize,
}

/// Builds a commit graph and hands out store handles for walking it
#[derive(Default)]
pub struct GraphBuilder {
    store: Rc<RefCell<Store>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit whose tree snapshot is unique to it
    ///
    /// Every commit built this way differs from every other, so path
    /// filtering keeps all of them.
    pub fn commit(&self, name: &str, parents: &[&str], epoch: i64) -> ObjectId {
        self.commit_with_tree(name, parents, epoch, &[(name, 1)])
    }

    /// Add a commit with an explicit full tree snapshot
    ///
    /// Identical snapshots share a tree id, which is what lets the walk see
    /// two commits as tree-same.
    pub fn commit_with_tree(
        &self,
        name: &str,
        parents: &[&str],
        epoch: i64,
        files: &[(&str, u32)],
    ) -> ObjectId {
        let snapshot: Snapshot = files
            .iter()
            .map(|(path, version)| (path.to_string(), *version))
            .collect();
        let tree = oid(&format!("t{:x}", fingerprint(&snapshot)));

        let commit = oid(name);
        let parent_ids: Vec<ObjectId> = parents.iter().map(|p| oid(p)).collect();
        let data = commit_payload(&tree, &parent_ids, epoch, name);

        let mut store = self.store.borrow_mut();
        store.trees.insert(tree, snapshot);
        store.names.insert(commit.clone(), name.to_string());
        store.objects.insert(
            commit.clone(),
            RawObject {
                object_type: ObjectType::Commit,
                data,
            },
        );
        commit
    }

    /// Insert a non-commit object under a name, for wrong-type tests
    pub fn blob(&self, name: &str) -> ObjectId {
        let id = oid(name);
        self.store.borrow_mut().objects.insert(
            id.clone(),
            RawObject {
                object_type: ObjectType::Blob,
                data: Bytes::from_static(b"not a commit"),
            },
        );
        id
    }

    pub fn source(&self) -> Box<dyn ObjectSource> {
        Box::new(MapSource {
            store: Rc::clone(&self.store),
        })
    }

    /// Comparator restricting diffs to paths under the given prefix
    pub fn comparator(&self, prefix: &str) -> Box<dyn TreeComparator> {
        Box::new(SnapshotComparator {
            store: Rc::clone(&self.store),
            prefix: prefix.to_string(),
        })
    }

    pub fn walk(&self) -> RevWalk {
        RevWalk::new(self.source())
    }

    /// Number of `load` calls the source has served so far
    pub fn load_count(&self) -> usize {
        self.store.borrow().loads
    }

    pub fn name_of(&self, id: &ObjectId) -> String {
        self.store
            .borrow()
            .names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

/// Run a walk to completion and return the commit names in output order
pub fn drain(walk: &mut RevWalk, graph: &GraphBuilder) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(c) = walk.next().expect("traversal succeeds") {
        out.push(graph.name_of(walk.commit(c).oid()));
    }
    out
}

/// Names of a commit's current parents, in parent-list order
pub fn parent_names(walk: &RevWalk, c: CommitIx, graph: &GraphBuilder) -> Vec<String> {
    walk.commit(c)
        .parents()
        .iter()
        .map(|&p| graph.name_of(walk.commit(p).oid()))
        .collect()
}

fn fingerprint(snapshot: &Snapshot) -> u64 {
    use std::hash::{DefaultHasher, Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    snapshot.hash(&mut hasher);
    hasher.finish()
}

fn commit_payload(tree: &ObjectId, parents: &[ObjectId], epoch: i64, message: &str) -> Bytes {
    let mut s = format!("tree {tree}\n");
    for p in parents {
        s.push_str(&format!("parent {p}\n"));
    }
    s.push_str(&format!("author A U Thor <author@localhost> {epoch} +0000\n"));
    s.push_str(&format!("committer A U Thor <author@localhost> {epoch} +0000\n"));
    s.push_str(&format!("\n{message}\n"));
    Bytes::from(s)
}

struct MapSource {
    store: Rc<RefCell<Store>>,
}

impl ObjectSource for MapSource {
    fn load(&self, id: &ObjectId) -> anyhow::Result<RawObject> {
        let mut store = self.store.borrow_mut();
        store.loads += 1;
        store
            .objects
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing object: {}", id))
    }
}

const FILE_MODE: u32 = 0o100644;

struct SnapshotComparator {
    store: Rc<RefCell<Store>>,
    prefix: String,
}

impl TreeComparator for SnapshotComparator {
    fn diff(
        &mut self,
        old_tree: Option<&ObjectId>,
        new_tree: &ObjectId,
    ) -> anyhow::Result<Vec<TreeChange>> {
        let store = self.store.borrow();
        let empty = Snapshot::new();
        let old = match old_tree {
            Some(t) => store
                .trees
                .get(t)
                .ok_or_else(|| anyhow::anyhow!("missing tree: {}", t))?,
            None => &empty,
        };
        let new = store
            .trees
            .get(new_tree)
            .ok_or_else(|| anyhow::anyhow!("missing tree: {}", new_tree))?;

        let paths: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
        let mut changes = Vec::new();
        for path in paths {
            if !path.starts_with(&self.prefix) {
                continue;
            }
            let old_version = old.get(path);
            let new_version = new.get(path);
            if old_version != new_version {
                changes.push(TreeChange {
                    path: path.clone(),
                    old_mode: old_version.map_or(0, |_| FILE_MODE),
                    new_mode: new_version.map_or(0, |_| FILE_MODE),
                });
            }
        }
        Ok(changes)
    }
}
