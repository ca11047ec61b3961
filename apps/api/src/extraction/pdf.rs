//! PDF strategy: per-page text layers, concatenated in page order without separators.

use std::panic;

use tracing::debug;

use super::{ExtractionError, FormatTag};

/// Decodes every page's text layer and concatenates them.
///
/// A page that fails to decode fails the whole document. A document with no
/// text layer (scanned images) decodes to an empty string.
pub fn extract_pages(payload: &[u8]) -> Result<String, ExtractionError> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(payload))
        .map_err(|_| ExtractionError::decode(FormatTag::Pdf, "the PDF parser aborted"))?
        .map_err(|e| ExtractionError::decode(FormatTag::Pdf, e))?;

    debug!(page_count = pages.len(), "PDF pages decoded");

    Ok(pages.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::pdf_with_pages;

    #[test]
    fn test_pages_are_joined_without_separator() {
        let payload = pdf_with_pages(&["Alice Smith", "5 years experience"]);
        let per_page = pdf_extract::extract_text_from_mem_by_pages(&payload).unwrap();
        assert_eq!(per_page.len(), 2);

        let text = extract_pages(&payload).unwrap();
        assert_eq!(text, per_page.concat());

        let alice = text.find("Alice Smith").expect("first page text");
        let years = text.find("5 years experience").expect("second page text");
        assert!(alice < years, "pages must stay in document order");
    }

    #[test]
    fn test_page_without_text_layer_yields_empty_string() {
        let payload = pdf_with_pages(&[""]);
        let text = extract_pages(&payload).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_garbage_payload_is_decode_error() {
        let result = extract_pages(b"%PDF-1.7\nthis is not really a pdf");
        assert!(matches!(
            result,
            Err(ExtractionError::Decode {
                format: FormatTag::Pdf,
                ..
            })
        ));
    }
}
