//! WebVTT segment writer
//!
//! Turns an extracted `Track` into a WebVTT document. Each frame body already
//! starts with its cue settings, so a cue is just the timing line followed
//! directly by the body.

use bytes::{BufMut, Bytes, BytesMut};

use crate::types::{Timestamp, Track, WEBVTT_HEADER_NEWLINES};

/// Format a timestamp as a WebVTT timestamp (HH:MM:SS.mmm)
pub fn format_timestamp(ms: Timestamp) -> String {
    let total_ms = ms.max(0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Write the whole track: header, then one cue per frame.
pub fn write_segment(track: &Track) -> Bytes {
    let header = if track.extra_data.is_empty() {
        WEBVTT_HEADER_NEWLINES
    } else {
        track.extra_data
    };

    let mut out =
        BytesMut::with_capacity(header.len() + track.data.len() + track.frames.len() * 32);
    out.put_slice(header);

    for (i, frame) in track.frames.iter().enumerate() {
        let Some(body) = track.frame_text(i) else {
            tracing::warn!(
                frame = i,
                offset = frame.offset,
                size = frame.size,
                "webvtt: frame body outside track data, skipping"
            );
            continue;
        };
        let end = frame.start_time + frame.pts_delay;
        out.put_slice(format_timestamp(frame.start_time).as_bytes());
        out.put_slice(b" --> ");
        out.put_slice(format_timestamp(end).as_bytes());
        out.put_slice(body);
    }

    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Frame;

    fn track(bodies: &[(&str, Timestamp, Timestamp)]) -> Track {
        let mut data = Vec::new();
        let mut frames = Vec::new();
        for (body, start, len) in bodies {
            frames.push(Frame {
                offset: data.len(),
                size: body.len(),
                start_time: *start,
                duration: *len,
                pts_delay: *len,
                key_frame: false,
            });
            data.extend_from_slice(body.as_bytes());
        }
        Track {
            frames,
            data: Bytes::from(data),
            extra_data: WEBVTT_HEADER_NEWLINES,
            ..Default::default()
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00:00.000");
        assert_eq!(format_timestamp(1500), "00:00:01.500");
        assert_eq!(format_timestamp(3_723_004), "01:02:03.004");
        assert_eq!(format_timestamp(-5), "00:00:00.000");
        assert_eq!(format_timestamp(360_000_000), "100:00:00.000");
    }

    #[test]
    fn test_write_segment() {
        let t = track(&[
            ("\nHello\n\n", 1000, 1500),
            (" position:50% align:middle\nBye\n\n", 4000, 500),
        ]);
        let out = write_segment(&t);
        assert_eq!(
            &out[..],
            &b"WEBVTT\r\n\r\n\
00:00:01.000 --> 00:00:02.500\nHello\n\n\
00:00:04.000 --> 00:00:04.500 position:50% align:middle\nBye\n\n"[..]
        );
    }

    #[test]
    fn test_empty_track() {
        let out = write_segment(&Track::default());
        assert_eq!(&out[..], WEBVTT_HEADER_NEWLINES);
    }

    #[test]
    fn test_bad_frame_is_skipped() {
        let mut t = track(&[("\nok\n\n", 0, 1000)]);
        t.frames.push(Frame {
            offset: 100,
            size: 10,
            start_time: 2000,
            duration: 1000,
            pts_delay: 1000,
            key_frame: false,
        });
        let out = write_segment(&t);
        assert_eq!(&out[..], &b"WEBVTT\r\n\r\n00:00:00.000 --> 00:00:01.000\nok\n\n"[..]);
    }
}
