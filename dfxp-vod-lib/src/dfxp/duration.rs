//! Cheap duration estimate for timeline setup.
//!
//! Cues are normally in document order, so the latest end times sit at the
//! back. The scan walks the tree depth-first in reverse child order and stops
//! after a handful of `<p>` elements; the result is an estimate, not an exact
//! total.

use super::stack::DepthStack;
use super::timing::end_time;
use super::{ELEMENT_DIV, ELEMENT_P};
use crate::xml::{Document, NodeId};

/// Number of `<p>` elements examined before the scan stops
pub const DURATION_ESTIMATE_NODES: usize = 10;

/// Estimate the total duration of the document in milliseconds.
pub fn estimate_duration(doc: &Document) -> u64 {
    let mut stack: DepthStack<NodeId> = DepthStack::new();
    let mut nodes_left = DURATION_ESTIMATE_NODES;
    let mut result: i64 = 0;
    let mut cur = doc.root();

    loop {
        let Some(node) = cur else {
            // subtree exhausted, resume before the parent
            match stack.pop() {
                Some(parent) => {
                    cur = doc.prev_sibling(parent);
                    continue;
                }
                None => break,
            }
        };

        let Some(name) = doc.element_name(node) else {
            cur = doc.prev_sibling(node);
            continue;
        };

        // timing can sit on a div too
        if name == ELEMENT_DIV {
            if let Some(end) = end_time(doc, node) {
                result = result.max(end);
            }
        }

        if name != ELEMENT_P {
            if let Some(last) = doc.last_child(node) {
                if stack.try_push(node) {
                    cur = Some(last);
                    continue;
                }
            }
            cur = doc.prev_sibling(node);
            continue;
        }

        if let Some(end) = end_time(doc, node) {
            result = result.max(end);
        }

        nodes_left -= 1;
        if nodes_left == 0 {
            break;
        }
        cur = doc.prev_sibling(node);
    }

    tracing::debug!(duration_ms = result, "dfxp estimated duration");
    result as u64
}
