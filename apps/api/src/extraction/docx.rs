//! Office Open XML word-processing strategy: top-level body paragraphs, one line each.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use super::{ExtractionError, FormatTag};

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the main document part and appends each body paragraph's text plus `\n`.
pub fn extract_paragraphs(payload: &[u8]) -> Result<String, ExtractionError> {
    let xml = read_document_part(payload)?;
    paragraphs_from_xml(&xml)
}

fn read_document_part(payload: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(payload))
        .map_err(|e| decode_error(format!("not a valid document archive ({e})")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| decode_error(format!("missing {DOCUMENT_PART} ({e})")))?;

    // The declared size comes from the archive header and is not trusted.
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| decode_error(format!("unreadable {DOCUMENT_PART} ({e})")))?;
    Ok(xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    // Local names of the currently open elements.
    let mut path: Vec<Vec<u8>> = Vec::new();
    // Depth of the open top-level paragraph, if any.
    let mut paragraph_depth: Option<usize> = None;
    let mut paragraph = String::new();
    let mut text = String::new();
    let mut paragraph_count = 0usize;
    let mut saw_body = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| decode_error(format!("malformed {DOCUMENT_PART} ({e})")))?;

        match event {
            Event::Start(element) => {
                let name = element.local_name().as_ref().to_vec();
                saw_body |= name == b"body";
                match paragraph_depth {
                    None if name == b"p" && parent_is_body(&path) => {
                        paragraph_depth = Some(path.len());
                        paragraph.clear();
                    }
                    Some(depth) if in_run(&path[depth + 1..]) => {
                        push_run_child(&element, &mut paragraph);
                    }
                    _ => {}
                }
                path.push(name);
            }
            Event::Empty(element) => {
                saw_body |= element.local_name().as_ref() == b"body";
                match paragraph_depth {
                    None if element.local_name().as_ref() == b"p" && parent_is_body(&path) => {
                        paragraph_count += 1;
                        text.push('\n');
                    }
                    Some(depth) if in_run(&path[depth + 1..]) => {
                        push_run_child(&element, &mut paragraph);
                    }
                    _ => {}
                }
            }
            Event::Text(content) => {
                if let Some(depth) = paragraph_depth {
                    if is_run_text(&path[depth + 1..]) {
                        let unescaped = content.unescape().map_err(|e| {
                            decode_error(format!("bad text in {DOCUMENT_PART} ({e})"))
                        })?;
                        paragraph.push_str(&unescaped);
                    }
                }
            }
            Event::End(_) => {
                path.pop();
                if paragraph_depth == Some(path.len()) {
                    paragraph_count += 1;
                    text.push_str(&paragraph);
                    text.push('\n');
                    paragraph_depth = None;
                }
            }
            // The reader reports end of input even with elements still open.
            Event::Eof if !path.is_empty() => {
                return Err(decode_error(format!(
                    "truncated {DOCUMENT_PART} ({} unclosed elements)",
                    path.len()
                )));
            }
            Event::Eof if !saw_body => {
                return Err(decode_error(format!("{DOCUMENT_PART} has no body")));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(paragraph_count, "DOCX paragraphs decoded");
    Ok(text)
}

fn decode_error(reason: String) -> ExtractionError {
    ExtractionError::decode(FormatTag::Docx, reason)
}

fn parent_is_body(path: &[Vec<u8>]) -> bool {
    path.last().is_some_and(|name| name == b"body")
}

fn matches_path(relative: &[Vec<u8>], pattern: &[&[u8]]) -> bool {
    relative.len() == pattern.len()
        && relative
            .iter()
            .zip(pattern)
            .all(|(name, expected)| name.as_slice() == *expected)
}

/// Directly inside a run of the paragraph, or of a hyperlink in it.
fn in_run(relative: &[Vec<u8>]) -> bool {
    matches_path(relative, &[b"r"]) || matches_path(relative, &[b"hyperlink", b"r"])
}

fn is_run_text(relative: &[Vec<u8>]) -> bool {
    matches_path(relative, &[b"r", b"t"]) || matches_path(relative, &[b"hyperlink", b"r", b"t"])
}

fn push_run_child(element: &BytesStart<'_>, out: &mut String) {
    match element.local_name().as_ref() {
        b"tab" | b"ptab" => out.push('\t'),
        b"br" if is_text_wrapping_break(element) => out.push('\n'),
        b"cr" => out.push('\n'),
        b"noBreakHyphen" => out.push('-'),
        _ => {}
    }
}

// Page and column breaks carry no text.
fn is_text_wrapping_break(element: &BytesStart<'_>) -> bool {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"type")
        .map_or(true, |attr| attr.value.as_ref() == b"textWrapping")
}
