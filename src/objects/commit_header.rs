//! Parsed commit header
//!
//! A commit payload looks like:
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The traversal engine only cares about the tree, the parent list, and the
//! committer timestamp; author identity and the message are skipped.

use crate::objects::object_id::ObjectId;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};

/// The traversal-relevant fields of a commit payload
///
/// Parsed once per commit and cached in the walk arena; the raw payload is
/// not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader {
    /// Tree object ID representing the directory snapshot
    pub tree: ObjectId,
    /// Parent commit IDs (empty for a root commit, multiple for merges)
    pub parents: Vec<ObjectId>,
    /// Committer timestamp, used for date-ordered traversal
    pub timestamp: DateTime<FixedOffset>,
}

impl CommitHeader {
    /// Parse a commit header from a raw commit payload
    ///
    /// # Arguments
    ///
    /// * `data` - Commit payload bytes, without the `commit <size>\0` envelope
    pub fn deserialize(data: &[u8]) -> anyhow::Result<Self> {
        let content = std::str::from_utf8(data).context("Invalid commit object: not UTF-8")?;
        let mut lines = content.lines();

        let tree_line = lines
            .next()
            .context("Invalid commit object: missing tree line")?;
        let tree = tree_line
            .strip_prefix("tree ")
            .context("Invalid commit object: invalid tree line")?;
        let tree = ObjectId::try_parse(tree)?;

        // Parse all parent lines (there can be 0, 1, or multiple parents)
        let mut parents = Vec::new();
        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        while let Some(parent) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent)?);

            next_line = lines
                .next()
                .context("Invalid commit object: missing author line")?;
        }

        // At this point, next_line should be the author line
        next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;

        let committer_line = lines
            .next()
            .context("Invalid commit object: missing committer line")?;
        let committer = committer_line
            .strip_prefix("committer ")
            .context("Invalid commit object: invalid committer line")?;
        let timestamp = parse_ident_timestamp(committer)?;

        Ok(CommitHeader {
            tree,
            parents,
            timestamp,
        })
    }
}

/// Extract the timestamp from an ident line tail
///
/// The ident format is `name <email> timestamp timezone`; the timestamp is a
/// Unix epoch value and the timezone is `+HHMM`/`-HHMM`.
fn parse_ident_timestamp(ident: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    // Split from the right to get timezone and timestamp first
    let parts: Vec<&str> = ident.rsplitn(3, ' ').collect();
    if parts.len() < 3 {
        return Err(anyhow::anyhow!("Invalid ident format: {}", ident));
    }

    let timezone = parts[0];
    let timestamp = parts[1]
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("Invalid ident timestamp: {}", parts[1]))?;

    let offset = parse_timezone(timezone)?;
    let utc = DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid ident timestamp: {}", timestamp))?;

    Ok(utc.with_timezone(&offset))
}

fn parse_timezone(timezone: &str) -> anyhow::Result<FixedOffset> {
    let invalid = || anyhow::anyhow!("Invalid ident timezone: {}", timezone);

    if timezone.len() != 5 {
        return Err(invalid());
    }
    let (sign, digits) = timezone.split_at(1);
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    let seconds = (hours * 60 + minutes) * 60;

    match sign {
        "+" => FixedOffset::east_opt(seconds).ok_or_else(invalid),
        "-" => FixedOffset::west_opt(seconds).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}
