//! Magic-byte detection, used only when strict format checking is enabled.

use std::io::Cursor;

use zip::ZipArchive;

use super::FormatTag;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Guesses the format from the payload itself. `None` when nothing matches.
pub fn sniff(payload: &[u8]) -> Option<FormatTag> {
    if looks_like_pdf(payload) {
        return Some(FormatTag::Pdf);
    }
    if payload.starts_with(ZIP_MAGIC) {
        return is_word_archive(payload).then_some(FormatTag::Docx);
    }
    if is_text(payload) {
        return Some(FormatTag::PlainText);
    }
    None
}

// Some producers put junk before the header; readers accept it within the first KiB.
// Text that merely mentions the marker is still text.
fn looks_like_pdf(payload: &[u8]) -> bool {
    if payload.starts_with(PDF_MAGIC) {
        return true;
    }
    let head = &payload[..payload.len().min(1024)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) && !is_text(payload)
}

fn is_text(payload: &[u8]) -> bool {
    !payload.contains(&0) && std::str::from_utf8(payload).is_ok()
}

fn is_word_archive(payload: &[u8]) -> bool {
    ZipArchive::new(Cursor::new(payload))
        .map(|archive| archive.file_names().any(|name| name == "word/document.xml"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::{docx_with_paragraphs, docx_with_parts, pdf_with_pages};

    #[test]
    fn test_detects_pdf() {
        assert_eq!(sniff(&pdf_with_pages(&["x"])), Some(FormatTag::Pdf));
    }

    #[test]
    fn test_detects_docx_but_not_other_archives() {
        assert_eq!(sniff(&docx_with_paragraphs(&["x"])), Some(FormatTag::Docx));
        assert_eq!(sniff(&docx_with_parts(&[("xl/workbook.xml", "<w/>")])), None);
    }

    #[test]
    fn test_pdf_header_after_leading_junk() {
        let mut payload = vec![0xE2, 0xE3, 0xCF, 0xD3, b'\n'];
        payload.extend(pdf_with_pages(&["x"]));
        assert_eq!(sniff(&payload), Some(FormatTag::Pdf));
    }

    #[test]
    fn test_text_mentioning_pdf_marker_stays_text() {
        let payload = b"Skills: generating %PDF-1.7 reports with Rust";
        assert_eq!(sniff(payload), Some(FormatTag::PlainText));
    }

    #[test]
    fn test_detects_utf8_text() {
        assert_eq!(sniff("Hello résumé".as_bytes()), Some(FormatTag::PlainText));
    }

    #[test]
    fn test_binary_is_unknown() {
        assert_eq!(sniff(&[0x89, b'P', b'N', b'G', 0, 0]), None);
    }
}
