pub mod dfxp;
pub mod error;
pub mod media_format;
pub mod types;
pub mod webvtt;
pub mod xml;

#[cfg(test)]
pub(crate) mod tests;

pub use dfxp::{parse, parse_frames, probe, ParsedDfxp};
pub use error::{Result, VodError, VodStatus};
pub use media_format::{DfxpFormat, MediaFormat};
pub use types::{
    Frame, MediaRange, ParseParams, SubtitleMetadata, TimeRange, Timestamp, Track,
    WEBVTT_HEADER_NEWLINES,
};
pub use webvtt::write_segment;
pub use xml::{cleanup, init};
