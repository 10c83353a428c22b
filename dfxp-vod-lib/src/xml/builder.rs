//! Builds a `Document` from raw bytes.
//!
//! The reader runs in recovery mode: ill-formed constructs (mismatched or
//! unclosed end tags, unknown entities, bad attributes) are logged and
//! skipped. Only a document that yields no root element at all is rejected.

use quick_xml::errors::Error as QuickXmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Document, NodeId};
use crate::error::{Result, VodError};

/// Parse `source` into a document tree.
pub fn parse_document(source: &[u8]) -> Result<Document> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(false);
    reader.config_mut().expand_empty_elements = true;
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_dangling_amp = true;

    let mut doc = Document::new();
    let mut open: Vec<NodeId> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                let message = single_line(&e.to_string());
                if let QuickXmlError::IllFormed(_) = e {
                    tracing::warn!(
                        position = reader.error_position(),
                        "dfxp_xml_error: {}",
                        message
                    );
                    buf.clear();
                    continue;
                }

                tracing::error!(
                    position = reader.error_position(),
                    "dfxp_xml_error: {}",
                    message
                );
                break;
            }
        };

        match event {
            Event::Start(e) => {
                if !is_xml_name(e.name().as_ref()) {
                    tracing::warn!(
                        position = reader.buffer_position(),
                        "dfxp_xml_error: invalid element name, keeping '<{}' as text",
                        single_line(&String::from_utf8_lossy(&e))
                    );
                    recover_stray_markup(&mut doc, &mut open, &e);
                    buf.clear();
                    continue;
                }
                if open.is_empty() && doc.root().is_some() {
                    tracing::error!(
                        position = reader.buffer_position(),
                        "dfxp_xml_error: extra content at the end of the document"
                    );
                    break;
                }
                let (name, attributes) = read_element(&e, &reader);
                let id = doc.append_element(open.last().copied(), name, attributes);
                open.push(id);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                close_element(&doc, &mut open, &name);
            }
            Event::Text(e) => {
                let Some(&parent) = open.last() else {
                    buf.clear();
                    continue;
                };
                match e.xml_content() {
                    Ok(text) => doc.append_text(parent, &text),
                    Err(err) => {
                        tracing::warn!(
                            "dfxp_xml_error: undecodable text: {}",
                            single_line(&err.to_string())
                        );
                        doc.append_text(parent, &String::from_utf8_lossy(&e));
                    }
                }
            }
            Event::CData(e) => {
                if let Some(&parent) = open.last() {
                    doc.append_cdata(parent, String::from_utf8_lossy(&e).into_owned());
                }
            }
            Event::GeneralRef(e) => {
                if let Some(&parent) = open.last() {
                    let entity = String::from_utf8_lossy(&e).into_owned();
                    match resolve_entity(&entity) {
                        Some(c) => doc.append_text(parent, c.encode_utf8(&mut [0u8; 4])),
                        None if !is_xml_name(entity.as_bytes()) => {
                            tracing::warn!(
                                "dfxp_xml_error: malformed reference '&{};', keeping as text",
                                entity
                            );
                            doc.append_text(parent, &format!("&{};", entity));
                        }
                        None => tracing::warn!(
                            "dfxp_xml_error: entity '&{};' was not defined",
                            entity
                        ),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if !open.is_empty() {
        tracing::warn!(
            unclosed = open.len(),
            "dfxp_xml_error: premature end of data, closing open elements"
        );
    }

    if doc.root().is_none() {
        return Err(VodError::BadData("document has no root element".to_string()));
    }

    Ok(doc)
}

fn read_element(e: &BytesStart, reader: &Reader<&[u8]>) -> (String, Vec<(String, String)>) {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(err) => {
                tracing::warn!(
                    element = name.as_str(),
                    "dfxp_xml_error: bad attribute: {}",
                    single_line(&err.to_string())
                );
                continue;
            }
        };
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        match attr.decode_and_unescape_value(reader.decoder()) {
            Ok(value) => attributes.push((key, value.into_owned())),
            Err(err) => tracing::warn!(
                element = name.as_str(),
                attribute = key.as_str(),
                "dfxp_xml_error: bad attribute value: {}",
                single_line(&err.to_string())
            ),
        }
    }

    (name, attributes)
}

/// Whether `name` starts like an XML name. Whitespace inside it is rejected too.
fn is_xml_name(name: &[u8]) -> bool {
    match name.first() {
        Some(&c) if c.is_ascii_alphabetic() || c == b'_' || c == b':' || c >= 0x80 => {
            !name.iter().any(u8::is_ascii_whitespace)
        }
        _ => false,
    }
}

/// Keep a `<` that does not open a tag as text.
///
/// The reader has already consumed everything up to the next `>`, so end
/// tags caught in `raw` are applied here.
fn recover_stray_markup(doc: &mut Document, open: &mut Vec<NodeId>, raw: &[u8]) {
    let raw = String::from_utf8_lossy(raw);
    let mut text = String::from("<");
    let mut rest: &str = &raw;

    loop {
        let Some(pos) = rest.find("</") else {
            text.push_str(rest);
            break;
        };
        text.push_str(&rest[..pos]);
        if let Some(&parent) = open.last() {
            doc.append_text(parent, &text);
        }
        text.clear();

        let tail = &rest[pos + 2..];
        let end = tail
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(tail.len());
        let name = &tail[..end];
        close_element(doc, open, name.rsplit(':').next().unwrap_or(name));
        rest = &tail[end..];
    }

    if let Some(&parent) = open.last() {
        doc.append_text(parent, &text);
    }
}

/// Pop the innermost open element named `name`, implicitly closing anything opened after it.
fn close_element(doc: &Document, open: &mut Vec<NodeId>, name: &str) {
    let Some(pos) = open.iter().rposition(|&id| doc.is_element(id, name)) else {
        tracing::warn!(
            "dfxp_xml_error: unexpected end tag </{}>, ignoring",
            name
        );
        return;
    };

    if pos + 1 != open.len() {
        tracing::warn!(
            "dfxp_xml_error: end tag </{}> closes {} unterminated element(s)",
            name,
            open.len() - pos - 1
        );
    }
    open.truncate(pos);
}

fn resolve_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let (radix, digits) = num
            .strip_prefix('x')
            .map_or((10, num), |stripped| (16, stripped));
        return u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32);
    }

    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Render an engine message as one log line: trailing line breaks dropped,
/// inner ones replaced by spaces.
pub(crate) fn single_line(message: &str) -> String {
    message
        .trim_end_matches(['\r', '\n'])
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect()
}
