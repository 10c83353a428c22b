//! Pluggable media format contract
//!
//! The host pipeline drives every subtitle format through the same three
//! steps: sniff the first bytes, parse the whole source, then extract frames
//! per request. DFXP is one implementation.

use std::fmt;

use crate::dfxp::{self, ParsedDfxp};
use crate::error::{Result, VodError};
use crate::types::{ParseParams, Track};

/// A subtitle format the host can probe, parse and extract frames from
pub trait MediaFormat: fmt::Debug + Send + Sync {
    /// Parsed representation kept between `parse` and `parse_frames`
    type Parsed;

    /// Short format name used in logs
    fn name(&self) -> &'static str;

    /// Whether `buf` belongs to this format
    fn probe(&self, buf: &[u8]) -> bool;

    /// Claim the buffer, or report `NotFound` so the host can try the next format
    fn reader_init(&self, buf: &[u8]) -> Result<()> {
        if self.probe(buf) {
            Ok(())
        } else {
            Err(VodError::NotFound)
        }
    }

    fn parse(&self, source: &[u8]) -> Result<Self::Parsed>;

    fn parse_frames(&self, parsed: &Self::Parsed, params: &ParseParams) -> Result<Track>;
}

/// DFXP / TTML
#[derive(Debug, Clone, Copy, Default)]
pub struct DfxpFormat;

impl MediaFormat for DfxpFormat {
    type Parsed = ParsedDfxp;

    fn name(&self) -> &'static str {
        "dfxp"
    }

    fn probe(&self, buf: &[u8]) -> bool {
        dfxp::probe(buf)
    }

    fn parse(&self, source: &[u8]) -> Result<ParsedDfxp> {
        dfxp::parse(source)
    }

    fn parse_frames(&self, parsed: &ParsedDfxp, params: &ParseParams) -> Result<Track> {
        dfxp::parse_frames(&parsed.document, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_init() {
        let format = DfxpFormat;
        assert!(format.reader_init(b"<tt></tt>").is_ok());
        assert!(matches!(
            format.reader_init(b"1\n00:00:01,000 --> 00:00:02,000\nsrt\n"),
            Err(VodError::NotFound)
        ));
    }

    #[test]
    fn test_parse_then_frames() {
        let format = DfxpFormat;
        let parsed = format
            .parse(br#"<tt><body><p begin="0s" end="2s">hello</p></body></tt>"#)
            .unwrap();
        assert_eq!(parsed.metadata.duration_ms, 2000);

        let track = format
            .parse_frames(&parsed, &ParseParams::absolute(0, 10_000))
            .unwrap();
        assert_eq!(track.frame_count(), 1);
        assert_eq!(track.frame_text(0), Some(&b"\nhello\n\n"[..]));
        assert_eq!(format.name(), "dfxp");
    }
}
