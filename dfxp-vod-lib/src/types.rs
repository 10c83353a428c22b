use bytes::Bytes;
use serde::Serialize;

/// Millisecond timestamp. Resolved timestamps are never negative.
pub type Timestamp = i64;

/// Fixed header every WebVTT track starts with
pub const WEBVTT_HEADER_NEWLINES: &[u8] = b"WEBVTT\r\n\r\n";

/// Start/end pair resolved from the timing attributes of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// A range is meaningful only when both ends are resolved and ordered
    pub fn is_valid(&self) -> bool {
        self.start >= 0 && self.end >= 0 && self.start < self.end
    }
}

/// Requested time window, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaRange {
    pub start: u64,
    pub end: u64,
}

/// Per-request frame extraction parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseParams {
    /// Extract frames at all; when false the track is returned without frames
    pub frames: bool,
    /// Timestamps are relative to the start of the requested range
    pub relative_timestamps: bool,
    pub range: MediaRange,
    pub clip_from: u64,
    pub clip_to: u64,
}

impl ParseParams {
    /// Absolute window over the whole clip `[start, end)`
    pub fn absolute(start: u64, end: u64) -> Self {
        Self {
            frames: true,
            relative_timestamps: false,
            range: MediaRange { start, end },
            clip_from: 0,
            clip_to: u64::MAX,
        }
    }

    /// Window whose output timestamps start at zero
    pub fn relative(start: u64, end: u64) -> Self {
        Self {
            relative_timestamps: true,
            ..Self::absolute(start, end)
        }
    }

    pub fn with_clip(mut self, clip_from: u64, clip_to: u64) -> Self {
        self.clip_from = clip_from;
        self.clip_to = clip_to;
        self
    }

    pub fn without_frames(mut self) -> Self {
        self.frames = false;
        self
    }
}

/// One emitted cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Offset of the rendered cue body in `Track::data`
    pub offset: usize,
    /// Length of the rendered cue body
    pub size: usize,
    /// Clipped start time
    pub start_time: Timestamp,
    /// Time until the next frame starts (the last frame uses its own length)
    pub duration: Timestamp,
    /// The cue's own display length (clipped end - clipped start)
    pub pts_delay: Timestamp,
    pub key_frame: bool,
}

/// Subtitle track produced by frame extraction
#[derive(Debug, Clone, Default, Serialize)]
pub struct Track {
    pub frames: Vec<Frame>,
    /// Request-scoped buffer holding every frame body back to back
    #[serde(skip)]
    pub data: Bytes,
    /// Container preamble, emitted once per track
    #[serde(skip)]
    pub extra_data: &'static [u8],
    pub first_frame_time_offset: Timestamp,
    pub total_frames_duration: Timestamp,
    /// Number of cues that ended before the requested window
    pub first_frame_index: u64,
    pub total_frames_size: u64,
}

impl Track {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Rendered body of the frame at `index`
    pub fn frame_text(&self, index: usize) -> Option<&[u8]> {
        let frame = self.frames.get(index)?;
        self.data.get(frame.offset..frame.offset + frame.size)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Metadata returned by a successful parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleMetadata {
    /// Estimated total duration in milliseconds
    pub duration_ms: u64,
    pub timescale: u32,
    pub codec: &'static str,
    pub source_len: usize,
}
