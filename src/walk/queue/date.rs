//! Date-ordered revision queue
//!
//! Keeps commits in strictly descending commit-time order via sorted
//! insertion into a singly-linked list. The insert point is found by a
//! linear scan from the head, which is fine in practice: the in-flight
//! queue depth stays small relative to total history. Drained entries are
//! kept on an internal free list for reuse.

use super::RevQueue;
use crate::walk::arena::{CommitArena, CommitIx};
use crate::walk::flags::CommitFlags;
use chrono::{DateTime, FixedOffset};

struct Entry {
    commit: CommitIx,
    time: DateTime<FixedOffset>,
    next: Option<Box<Entry>>,
}

#[derive(Default)]
pub(crate) struct DateQueue {
    head: Option<Box<Entry>>,
    free: Option<Box<Entry>>,
}

impl DateQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Build a date queue by draining another queue
    pub(crate) fn from_queue(q: &mut dyn RevQueue, arena: &CommitArena) -> Self {
        let mut dq = DateQueue::new();
        while let Some(c) = q.next() {
            dq.add(c, arena);
        }
        dq
    }

    /// Look at the next commit without removing it
    pub(crate) fn peek(&self) -> Option<CommitIx> {
        self.head.as_ref().map(|e| e.commit)
    }

    fn iter(&self) -> DateIter<'_> {
        DateIter {
            entry: self.head.as_deref(),
        }
    }

    fn take_entry(&mut self, commit: CommitIx, time: DateTime<FixedOffset>) -> Box<Entry> {
        match self.free.take() {
            Some(mut e) => {
                self.free = e.next.take();
                e.commit = commit;
                e.time = time;
                e
            }
            None => Box::new(Entry {
                commit,
                time,
                next: None,
            }),
        }
    }
}

struct DateIter<'a> {
    entry: Option<&'a Entry>,
}

impl Iterator for DateIter<'_> {
    type Item = CommitIx;

    fn next(&mut self) -> Option<CommitIx> {
        let e = self.entry?;
        self.entry = e.next.as_deref();
        Some(e.commit)
    }
}

impl RevQueue for DateQueue {
    fn add(&mut self, c: CommitIx, arena: &CommitArena) {
        let time = arena.get(c).timestamp();
        let mut entry = self.take_entry(c, time);

        // Walk past entries at the same or a newer time so equal timestamps
        // keep their insertion order.
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|e| e.time >= time) {
            cursor = &mut cursor.as_mut().unwrap().next;
        }
        entry.next = cursor.take();
        *cursor = Some(entry);
    }

    fn next(&mut self) -> Option<CommitIx> {
        let mut e = self.head.take()?;
        self.head = e.next.take();
        let c = e.commit;
        e.next = self.free.take();
        self.free = Some(e);
        Some(c)
    }

    fn clear(&mut self) {
        while self.next().is_some() {}
    }

    fn everybody_has_flag(&self, flags: CommitFlags, arena: &CommitArena) -> bool {
        self.iter().all(|c| arena.get(c).is(flags))
    }

    fn anybody_has_flag(&self, flags: CommitFlags, arena: &CommitArena) -> bool {
        self.iter().any(|c| arena.get(c).is(flags))
    }
}
