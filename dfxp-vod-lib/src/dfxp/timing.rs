//! Resolve the `begin` / `end` / `dur` attributes of one node

use super::timestamp::parse_timestamp;
use crate::types::{TimeRange, Timestamp};
use crate::xml::{Document, NodeId};

const ATTR_BEGIN: &str = "begin";
const ATTR_END: &str = "end";
const ATTR_DUR: &str = "dur";

/// What the caller needs from a node's timing attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeQuery {
    /// Only an upper bound is needed; an explicit `end` short-circuits
    EndOnly,
    /// Both start and end
    Range,
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTime {
    /// Unknown when an `EndOnly` query was answered by `end` alone
    pub start: Option<Timestamp>,
    pub end: Timestamp,
}

fn timestamp_attr(doc: &Document, node: NodeId, name: &str) -> Option<Timestamp> {
    doc.attribute(node, name).and_then(parse_timestamp)
}

/// Resolve the timing of `node`.
///
/// `end` is taken from the `end` attribute when it parses, otherwise derived
/// as `begin + dur`. A full range additionally requires `begin`.
pub fn extract_time(doc: &Document, node: NodeId, query: TimeQuery) -> Option<ResolvedTime> {
    let end = timestamp_attr(doc, node, ATTR_END);
    if let (Some(end), TimeQuery::EndOnly) = (end, query) {
        return Some(ResolvedTime { start: None, end });
    }

    let start = timestamp_attr(doc, node, ATTR_BEGIN)?;
    let end = match end {
        Some(end) => end,
        None => start.checked_add(timestamp_attr(doc, node, ATTR_DUR)?)?,
    };

    Some(ResolvedTime {
        start: Some(start),
        end,
    })
}

/// Upper bound of the node's active interval
pub fn end_time(doc: &Document, node: NodeId) -> Option<Timestamp> {
    extract_time(doc, node, TimeQuery::EndOnly).map(|t| t.end)
}

/// Full `{start, end}` interval of the node
pub fn time_range(doc: &Document, node: NodeId) -> Option<TimeRange> {
    let t = extract_time(doc, node, TimeQuery::Range)?;
    Some(TimeRange::new(t.start?, t.end))
}
