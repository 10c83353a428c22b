//! Frame extractor
//!
//! Walks the document in order and turns every timed `<p>` that overlaps the
//! requested window into a frame. A `<p>` without usable timing borrows the
//! timing of the `<div>` it sits in. Frame bodies are rendered back to back
//! into one request-scoped buffer.

use bytes::Bytes;

use super::render::render_cue_body;
use super::stack::DepthStack;
use super::style::{can_contain_style, compute_style, Style};
use super::timing::time_range;
use super::{ELEMENT_DIV, ELEMENT_P};
use crate::error::{Result, VodError};
use crate::types::{Frame, ParseParams, Timestamp, Track, WEBVTT_HEADER_NEWLINES};
use crate::xml::{Document, NodeId};

/// Initial frame capacity
const INITIAL_FRAMES: usize = 5;

/// Requested window in the timestamp domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    /// Cues ending before this are counted and skipped
    start: Timestamp,
    /// The first cue starting at or after this (once clipped) stops the scan
    end: Timestamp,
    base_time: Timestamp,
    clip_to: Timestamp,
}

fn to_timestamp(value: u64) -> Timestamp {
    Timestamp::try_from(value).unwrap_or(Timestamp::MAX)
}

impl Window {
    fn new(params: &ParseParams) -> Self {
        let start = params.range.start.saturating_add(params.clip_from);

        if params.relative_timestamps {
            let clip_to = params.range.end.saturating_sub(params.range.start);
            Self {
                start: to_timestamp(start),
                end: to_timestamp(clip_to),
                base_time: to_timestamp(start),
                clip_to: to_timestamp(clip_to),
            }
        } else {
            // end is compared after clipping, so clip_from is not added to it
            Self {
                start: to_timestamp(start),
                end: to_timestamp(params.range.end),
                base_time: to_timestamp(params.clip_from),
                clip_to: to_timestamp(params.clip_to),
            }
        }
    }

    fn clip(&self, t: Timestamp) -> Timestamp {
        t.saturating_sub(self.base_time).clamp(0, self.clip_to)
    }
}

/// Extract the frames of `doc` that fall inside the requested window.
///
/// The track always carries the WebVTT header as its extra data. When
/// `params.frames` is false nothing else is produced.
pub fn parse_frames(doc: &Document, params: &ParseParams) -> Result<Track> {
    let mut track = Track {
        extra_data: WEBVTT_HEADER_NEWLINES,
        ..Default::default()
    };

    if !params.frames {
        return Ok(track);
    }

    let mut frames: Vec<Frame> = Vec::new();
    frames.try_reserve(INITIAL_FRAMES).map_err(|e| {
        tracing::debug!("dfxp_parse_frames: frame array init failed");
        VodError::from(e)
    })?;
    let mut arena: Vec<u8> = Vec::new();

    let window = Window::new(params);
    let mut stack: DepthStack<(NodeId, Style)> = DepthStack::new();
    let mut style = Style::default();
    let mut last_div: Option<NodeId> = None;
    let mut last_start: Timestamp = 0;
    let mut stopped = false;
    let mut cur = doc.root();

    loop {
        let Some(node) = cur else {
            let Some((parent, parent_style)) = stack.pop() else {
                break;
            };
            style = parent_style;
            if last_div == Some(parent) {
                last_div = None;
            }
            cur = doc.next_sibling(parent);
            continue;
        };
        cur = doc.next_sibling(node);

        let Some(name) = doc.element_name(node) else {
            continue;
        };

        // start from the parent's style, then apply the node's own attributes
        if let Some((_, parent_style)) = stack.last() {
            style = *parent_style;
        }
        if can_contain_style(doc, node) {
            style = compute_style(doc, node, style);
        }

        if name != ELEMENT_P {
            if let Some(child) = doc.first_child(node) {
                if stack.try_push((node, style)) {
                    if name == ELEMENT_DIV {
                        last_div = Some(node);
                    }
                    cur = Some(child);
                }
            }
            continue;
        }

        let Some(range) =
            time_range(doc, node).or_else(|| last_div.and_then(|div| time_range(doc, div)))
        else {
            continue;
        };

        if range.end < window.start {
            track.first_frame_index += 1;
            continue;
        }

        if !range.is_valid() {
            continue;
        }

        let start_time = window.clip(range.start);
        let end_time = window.clip(range.end);

        let (offset, size) = match render_cue_body(doc, doc.first_child(node), &style, &mut arena) {
            Ok(body) => body,
            Err(VodError::NotFound) => continue,
            Err(e) => return Err(e),
        };

        // the previous frame lasts until this one starts
        match frames.last_mut() {
            Some(prev) => prev.duration = start_time - last_start,
            None => track.first_frame_time_offset = start_time,
        }

        if start_time >= window.end {
            track.total_frames_duration = start_time - track.first_frame_time_offset;
            arena.truncate(offset);
            stopped = true;
            break;
        }

        frames.try_reserve(1).map_err(|e| {
            tracing::debug!("dfxp_parse_frames: frame push failed");
            VodError::from(e)
        })?;
        frames.push(Frame {
            offset,
            size,
            start_time,
            duration: 0,
            pts_delay: end_time - start_time,
            key_frame: false,
        });
        track.total_frames_size += size as u64;
        last_start = start_time;
    }

    if !stopped {
        if let Some(last) = frames.last_mut() {
            last.duration = last.pts_delay;
            track.total_frames_duration =
                last.start_time + last.pts_delay - track.first_frame_time_offset;
        }
    }

    tracing::debug!(
        frames = frames.len(),
        first_frame_index = track.first_frame_index,
        total_size = track.total_frames_size,
        "dfxp frames extracted"
    );

    track.frames = frames;
    track.data = Bytes::from(arena);
    Ok(track)
}
