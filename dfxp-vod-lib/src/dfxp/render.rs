//! Cue body renderer
//!
//! A cue body is rendered twice over the same traversal: once into a sink
//! that only counts bytes, then into the request arena sized from that count.
//! The output is the cue settings line followed by the decorated text:
//!
//! ```text
//! <settings> <text>\n\n
//! ```
//!
//! Leading whitespace of the text is folded into the settings line break.

use super::stack::DepthStack;
use super::style::{node_decoration, Decoration, Style, DECORATIONS};
use super::{ELEMENT_BR, ELEMENT_SPAN};
use crate::error::{Result, VodError};
use crate::xml::{Document, NodeId, NodeKind};

/// Room reserved on top of the measured text for settings and line breaks
pub const DECORATION_SCRATCH_SPACE: usize = 64;

/// Destination of rendered text
pub(crate) trait ContentSink {
    fn append(&mut self, s: &str);
}

/// Counts bytes without storing them
#[derive(Debug, Default)]
pub(crate) struct MeasureSink {
    pub len: usize,
}

impl ContentSink for MeasureSink {
    fn append(&mut self, s: &str) {
        self.len += s.len();
    }
}

/// Appends into the arena, never past `capacity` bytes from where it started.
/// `written` keeps counting after an overflow so the error can report it.
struct ArenaSink<'a> {
    buf: &'a mut Vec<u8>,
    capacity: usize,
    written: usize,
    overflowed: bool,
}

impl<'a> ArenaSink<'a> {
    fn new(buf: &'a mut Vec<u8>, capacity: usize) -> Self {
        Self {
            buf,
            capacity,
            written: 0,
            overflowed: false,
        }
    }
}

impl ContentSink for ArenaSink<'_> {
    fn append(&mut self, s: &str) {
        let end = self.written + s.len();
        if end > self.capacity {
            self.overflowed = true;
        }
        if !self.overflowed {
            self.buf.extend_from_slice(s.as_bytes());
        }
        self.written = end;
    }
}

fn append_tags<S: ContentSink>(sink: &mut S, flag: Decoration, parent: Decoration, close: bool) {
    // only what the child adds over its parent
    let added = flag.difference(parent);
    if added.is_empty() {
        return;
    }

    if close {
        for entry in DECORATIONS.iter().rev().filter(|e| added.contains(e.flag)) {
            sink.append(entry.close_tag);
        }
    } else {
        for entry in DECORATIONS.iter().filter(|e| added.contains(e.flag)) {
            sink.append(entry.open_tag);
        }
    }
}

/// Emit the text under a cue, starting at `first` and following its siblings.
///
/// Text and CDATA are copied, `<br>` becomes a newline and `<span>` opens the
/// decoration tags it adds over its parent. Every other element is skipped
/// together with its subtree.
pub(crate) fn append_text_content<S: ContentSink>(
    doc: &Document,
    first: Option<NodeId>,
    cue: Decoration,
    sink: &mut S,
) {
    let mut stack: DepthStack<(Option<NodeId>, Decoration)> = DepthStack::new();
    let mut flag = Decoration::empty();
    let mut cur = first;

    loop {
        let Some(node) = cur else {
            let Some((resume, parent)) = stack.pop() else {
                break;
            };
            append_tags(sink, flag, parent, true);
            flag = parent;
            cur = resume;
            continue;
        };

        match &doc.node(node).kind {
            NodeKind::Text(text) | NodeKind::CData(text) => sink.append(text),
            NodeKind::Element { name, .. } if name == ELEMENT_BR => sink.append("\n"),
            NodeKind::Element { name, .. } if name == ELEMENT_SPAN => {
                if let Some(child) = doc.first_child(node) {
                    let parent = flag;
                    if stack.try_push((doc.next_sibling(node), parent)) {
                        flag = parent | cue | node_decoration(doc, node);
                        append_tags(sink, flag, parent, false);
                        cur = Some(child);
                        continue;
                    }
                }
            }
            NodeKind::Element { .. } => {}
        }

        cur = doc.next_sibling(node);
    }
}

fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Render the body of one cue into `arena`.
///
/// Returns the offset and length of the body inside the arena. A cue whose
/// text is empty fails with `NotFound`.
pub fn render_cue_body(
    doc: &Document,
    first: Option<NodeId>,
    style: &Style,
    arena: &mut Vec<u8>,
) -> Result<(usize, usize)> {
    let mut measure = MeasureSink::default();
    append_text_content(doc, first, style.decoration, &mut measure);
    if measure.len == 0 {
        return Err(VodError::NotFound);
    }

    let alloc_size = measure.len + DECORATION_SCRATCH_SPACE;
    write_cue_body(doc, first, style, arena, alloc_size)
}

pub(crate) fn write_cue_body(
    doc: &Document,
    first: Option<NodeId>,
    style: &Style,
    arena: &mut Vec<u8>,
    alloc_size: usize,
) -> Result<(usize, usize)> {
    arena.try_reserve_exact(alloc_size).map_err(|e| {
        tracing::debug!("render_cue_body: reserving {} bytes failed: {}", alloc_size, e);
        VodError::from(e)
    })?;

    let offset = arena.len();
    let mut sink = ArenaSink::new(arena, alloc_size);
    for setting in style.annotation() {
        sink.append(setting);
    }
    sink.append(" ");
    let text_start = sink.written;
    append_text_content(doc, first, style.decoration, &mut sink);
    let text_end = sink.written;
    sink.append("\n\n");

    let written = sink.written;
    if sink.overflowed {
        arena.truncate(offset);
        tracing::error!(
            "render_cue_body: result length {} exceeded allocated length {}",
            written,
            alloc_size
        );
        return Err(VodError::Unexpected(format!(
            "result length {} exceeded allocated length {}",
            written, alloc_size
        )));
    }

    // leading whitespace turns into spaces, the last of which breaks the line
    let body = &mut arena[offset..offset + written];
    let mut pos = text_start;
    while pos < text_end && is_c_space(body[pos]) {
        body[pos] = b' ';
        pos += 1;
    }
    body[pos - 1] = b'\n';

    Ok((offset, written))
}
