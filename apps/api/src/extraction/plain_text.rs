//! Plain-text strategy: the whole buffer, decoded as UTF-8 verbatim.

use super::{ExtractionError, FormatTag};

/// No normalisation happens here: line endings, a leading BOM and trailing
/// whitespace all survive.
pub fn decode(payload: &[u8]) -> Result<String, ExtractionError> {
    std::str::from_utf8(payload)
        .map(str::to_owned)
        .map_err(|e| ExtractionError::decode(FormatTag::PlainText, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_without_alteration() {
        let input = "Line one\r\n\tLine two  \n\u{feff}résumé ✓\n";
        assert_eq!(decode(input.as_bytes()).unwrap(), input);
    }

    #[test]
    fn test_invalid_sequence_names_the_offset() {
        let err = decode(&[b'o', b'k', 0xc3, 0x28]).unwrap_err();
        assert!(err.to_string().contains("index 2"), "got: {err}");
    }
}
