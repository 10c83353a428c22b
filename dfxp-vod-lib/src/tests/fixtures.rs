//! Test fixtures
//!
//! Sample DFXP documents covering the constructs seen in real deliveries:
//! XML declarations, namespaced styling attributes, region presets, nested
//! spans, line breaks and every time expression form.

use crate::xml::{Document, NodeId};

/// A sample document together with what frame extraction should produce
#[derive(Debug, Clone)]
pub struct TestDocument {
    pub name: &'static str,
    #[allow(dead_code)]
    pub description: &'static str,
    pub source: &'static str,
    /// `(start_time, duration, pts_delay, body)` per frame over the full window
    pub expected_frames: Vec<(i64, i64, i64, &'static str)>,
    pub expected_duration_ms: u64,
}

impl TestDocument {
    /// Typical broadcast delivery with a head, regions and styled spans
    pub fn styled() -> Self {
        Self {
            name: "styled",
            description: "XML declaration, tts: attributes, region preset, spans and br",
            source: r#"<?xml version="1.0" encoding="UTF-8"?>
<tt xmlns="http://www.w3.org/ns/ttml" xmlns:tts="http://www.w3.org/ns/ttml#styling" xml:lang="en">
  <head>
    <styling><style xml:id="defaultSpeaker" tts:fontWeight="bold"/></styling>
    <layout><region xml:id="lowerThird" tts:displayAlign="after"/></layout>
  </head>
  <body>
    <div>
      <p begin="00:00:01.000" end="00:00:03.000" region="lowerThird">Hello,<br/>world!</p>
      <p begin="00:00:04.000" end="00:00:06.500">Plain <span tts:fontStyle="italic">italic</span> text</p>
      <p begin="7s" dur="2s" tts:textAlign="left"><span tts:fontWeight="bold"><span tts:textDecoration="underline">bold underline</span></span></p>
      <p begin="00:00:10:15" end="00:00:12:00">Fish &amp; chips</p>
    </div>
  </body>
</tt>
"#,
            expected_frames: vec![
                (
                    1000,
                    3000,
                    2000,
                    " position:50% align:middle line:100%\nHello,\nworld!\n\n",
                ),
                (4000, 3000, 2500, "\nPlain <i>italic</i> text\n\n"),
                (
                    7000,
                    3500,
                    2000,
                    " position:15% align:start\n<b><u>bold underline</u></b>\n\n",
                ),
                (10500, 1500, 1500, "\nFish & chips\n\n"),
            ],
            expected_duration_ms: 12_000,
        }
    }

    /// Minimal document without a declaration, timing carried by divs
    pub fn div_timed() -> Self {
        Self {
            name: "div_timed",
            description: "cue timing on the enclosing div",
            source: r#"<tt><body>
<div begin="0.5s" end="2s"><p>first</p></div>
<div begin="2s" end="3500ms"><p>second</p></div>
</body></tt>"#,
            expected_frames: vec![
                (500, 1500, 1500, "\nfirst\n\n"),
                (2000, 1500, 1500, "\nsecond\n\n"),
            ],
            expected_duration_ms: 3500,
        }
    }

    /// Nothing usable: untimed and empty cues only
    pub fn empty() -> Self {
        Self {
            name: "empty",
            description: "no cue survives",
            source: r#"<tt><body><div><p>untimed</p><p begin="1s" end="2s"/></div></body></tt>"#,
            expected_frames: vec![],
            expected_duration_ms: 2000,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::styled(), Self::div_timed(), Self::empty()]
    }
}

/// A document nested `depth` divs deep with one cue at the bottom and one at the top
pub fn deeply_nested(depth: usize) -> String {
    let mut xml = String::from("<tt><body>");
    for _ in 0..depth {
        xml.push_str("<div>");
    }
    xml.push_str(r#"<p begin="0s" end="1s">deep</p>"#);
    for _ in 0..depth {
        xml.push_str("</div>");
    }
    xml.push_str(r#"<p begin="2s" end="3s">shallow</p></body></tt>"#);
    xml
}

/// First element named `name` in document order
pub fn find_element(doc: &Document, name: &str) -> Option<NodeId> {
    fn walk(doc: &Document, node: NodeId, name: &str) -> Option<NodeId> {
        if doc.is_element(node, name) {
            return Some(node);
        }
        let mut child = doc.first_child(node);
        while let Some(c) = child {
            if let Some(found) = walk(doc, c, name) {
                return Some(found);
            }
            child = doc.next_sibling(c);
        }
        None
    }

    walk(doc, doc.root()?, name)
}
