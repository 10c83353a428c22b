//! DFXP / TTML subtitle format
//!
//! This module handles:
//! - Sniffing a buffer for the DFXP root element
//! - Parsing the document and estimating its duration
//! - Extracting WebVTT frames for a requested time window
//!
//! All traversals are iterative and bounded by `MAX_STACK_DEPTH`.

pub mod duration;
pub mod frames;
pub mod render;
mod stack;
pub mod style;
pub mod timestamp;
pub mod timing;

pub use duration::{estimate_duration, DURATION_ESTIMATE_NODES};
pub use frames::parse_frames;
pub use render::{render_cue_body, DECORATION_SCRATCH_SPACE};
pub use stack::MAX_STACK_DEPTH;
pub use style::{compute_style, Decoration, DisplayAlign, Style, TextAlign};
pub use timestamp::{parse_timestamp, FRAME_RATE};
pub use timing::{end_time, extract_time, time_range, ResolvedTime, TimeQuery};

use crate::error::Result;
use crate::types::SubtitleMetadata;
use crate::xml::{self, Document};

pub const DFXP_PREFIX: &[u8] = b"<tt";
pub const XML_PREFIX1: &[u8] = b"<?xml";
pub const XML_PREFIX2: &[u8] = b"<xml";
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) const ELEMENT_P: &str = "p";
pub(crate) const ELEMENT_BR: &str = "br";
pub(crate) const ELEMENT_SPAN: &str = "span";
pub(crate) const ELEMENT_DIV: &str = "div";

/// Output timescale: every timestamp is in milliseconds
pub const TIMESCALE: u32 = 1000;
pub const CODEC_NAME: &str = "wvtt";

/// A parsed document together with its base metadata
#[derive(Debug, Clone)]
pub struct ParsedDfxp {
    pub document: Document,
    pub metadata: SubtitleMetadata,
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Check whether `buf` looks like a DFXP document.
///
/// After an optional UTF-8 BOM, either an XML declaration is followed
/// somewhere by `<tt`, or the buffer starts with `<tt` directly.
pub fn probe(buf: &[u8]) -> bool {
    let p = buf.strip_prefix(UTF8_BOM).unwrap_or(buf);

    if p.starts_with(XML_PREFIX1) || p.starts_with(XML_PREFIX2) {
        contains(p, DFXP_PREFIX)
    } else {
        p.starts_with(DFXP_PREFIX)
    }
}

/// Parse a DFXP document and compute its base metadata.
pub fn parse(source: &[u8]) -> Result<ParsedDfxp> {
    if !xml::is_initialized() {
        tracing::warn!("dfxp_parse: XML parser used before init");
    }

    let document = xml::parse_document(source).map_err(|e| {
        tracing::debug!("dfxp_parse: xml parsing failed: {}", e);
        e
    })?;

    let duration_ms = estimate_duration(&document);
    let metadata = SubtitleMetadata {
        duration_ms,
        timescale: TIMESCALE,
        codec: CODEC_NAME,
        source_len: source.len(),
    };

    tracing::debug!(
        nodes = document.len(),
        duration_ms,
        "dfxp document parsed"
    );

    Ok(ParsedDfxp { document, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VodError;

    #[test]
    fn test_probe_root_element() {
        assert!(probe(b"<tt xmlns=\"http://www.w3.org/ns/ttml\"></tt>"));
        assert!(probe(b"\xEF\xBB\xBF<tt></tt>"));
        assert!(!probe(b" <tt></tt>"));
        assert!(!probe(b"WEBVTT\r\n\r\n"));
        assert!(!probe(b""));
    }

    #[test]
    fn test_probe_xml_declaration() {
        assert!(probe(b"<?xml version=\"1.0\"?>\n<tt></tt>"));
        assert!(probe(b"\xEF\xBB\xBF<?xml version=\"1.0\"?><tt/>"));
        assert!(probe(b"<xml><tt></tt></xml>"));
        assert!(!probe(b"<?xml version=\"1.0\"?>\n<smil></smil>"));
    }

    #[test]
    fn test_parse_metadata() {
        xml::init();
        let source = br#"<tt><body><p begin="1s" end="4s">x</p></body></tt>"#;
        let parsed = parse(source).unwrap();
        assert_eq!(parsed.metadata.duration_ms, 4000);
        assert_eq!(parsed.metadata.timescale, 1000);
        assert_eq!(parsed.metadata.codec, "wvtt");
        assert_eq!(parsed.metadata.source_len, source.len());
        assert!(parsed.document.root().is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse(b"not xml at all"), Err(VodError::BadData(_))));
        assert!(matches!(parse(b""), Err(VodError::BadData(_))));
    }
}
