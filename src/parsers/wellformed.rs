//! Well-formedness check with positioned diagnostics
//!
//! The serde deserializer is lenient and reports no location, so the raw
//! input is walked once with a pull reader first. Any problem is reported
//! with the 1-based line and column of the offending byte.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::trace;

/// A syntax problem at a known position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    fn at(xml: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(xml, offset);
        let message: String = message.into();
        Self {
            message: message.trim_end().to_string(),
            line,
            column,
        }
    }
}

/// Convert a byte offset into a 1-based (line, column) pair
pub(crate) fn line_column(xml: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(xml.len());
    let before = &xml.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = match before.iter().rposition(|&b| b == b'\n') {
        Some(newline) => offset - newline,
        None => offset + 1,
    };
    (line, column)
}

/// Check that `xml` is a single well-formed document.
///
/// Tag nesting, attribute syntax and entity references are validated; the
/// element names themselves are not.
pub fn check(xml: &str) -> Result<(), SyntaxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = true;

    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut seen_content = false;

    loop {
        let start = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(SyntaxError::at(
                    xml,
                    reader.error_position() as usize,
                    e.to_string(),
                ))
            }
        };

        match &event {
            Event::Decl(_) => {
                if seen_content {
                    return Err(SyntaxError::at(
                        xml,
                        start,
                        "XML declaration allowed only at the start of the document",
                    ));
                }
            }
            Event::Start(e) | Event::Empty(e) => {
                if open.is_empty() && seen_root {
                    return Err(SyntaxError::at(
                        xml,
                        start,
                        "Extra content at the end of the document",
                    ));
                }
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| SyntaxError::at(xml, start, err.to_string()))?;
                    attr.unescape_value()
                        .map_err(|err| SyntaxError::at(xml, start, err.to_string()))?;
                }
                seen_root = true;
                // Empty elements never get an End event
                if matches!(event, Event::Start(_)) {
                    open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(t) => {
                if open.is_empty() {
                    if t.iter().any(|b| !b.is_ascii_whitespace()) {
                        let message = if seen_root {
                            "Extra content at the end of the document"
                        } else {
                            "Start tag expected, '<' not found"
                        };
                        return Err(SyntaxError::at(xml, start, message));
                    }
                } else {
                    t.unescape()
                        .map_err(|err| SyntaxError::at(xml, start, err.to_string()))?;
                }
            }
            Event::CData(_) if open.is_empty() => {
                return Err(SyntaxError::at(
                    xml,
                    start,
                    "Extra content at the end of the document",
                ));
            }
            Event::Eof => break,
            _ => {}
        }
        seen_content = true;
    }

    if let Some(tag) = open.last() {
        return Err(SyntaxError::at(
            xml,
            xml.len(),
            format!("Premature end of data in tag {tag}"),
        ));
    }
    if !seen_root {
        return Err(SyntaxError::at(xml, xml.len(), "Document is empty"));
    }

    trace!("Input is well-formed ({} bytes)", xml.len());
    Ok(())
}
