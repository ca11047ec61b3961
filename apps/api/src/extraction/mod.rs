//! Document Text Extractor — turns an uploaded résumé into plain text.
//!
//! Dispatch is driven by the caller-declared [`FormatTag`], not by the bytes.
//! Optional strict mode sniffs the payload first and rejects mismatches.
//! Extraction is all-or-nothing: a failure anywhere in the document yields no text.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod docx;
pub mod pdf;
pub mod plain_text;
pub mod sniff;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT_MIME: &str = "text/plain";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Caller-declared encoding of an uploaded payload. Trusted, not verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    Pdf,
    Docx,
    PlainText,
    /// Carries the declared value so the failure message can name it.
    Unrecognized(String),
}

impl FormatTag {
    /// Maps a declared content type. Parameters (`; charset=...`) and case are ignored.
    pub fn from_mime(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Self::Pdf,
            DOCX_MIME => Self::Docx,
            PLAIN_TEXT_MIME => Self::PlainText,
            _ => Self::Unrecognized(content_type.trim().to_string()),
        }
    }

    /// Maps a file name by its extension.
    pub fn from_filename(filename: &str) -> Self {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            Some("txt") => Self::PlainText,
            Some(other) => Self::Unrecognized(format!(".{other}")),
            None => Self::Unrecognized(filename.to_string()),
        }
    }

    /// Resolves the tag for an upload. The declared content type wins; the file
    /// extension is only consulted when no meaningful content type was sent.
    pub fn declared(content_type: Option<&str>, filename: Option<&str>) -> Self {
        match (content_type.map(str::trim), filename) {
            (Some(ct), _) if !ct.is_empty() && !ct.eq_ignore_ascii_case(OCTET_STREAM_MIME) => {
                Self::from_mime(ct)
            }
            (_, Some(name)) => Self::from_filename(name),
            (Some(ct), None) if !ct.is_empty() => Self::Unrecognized(ct.to_string()),
            _ => Self::Unrecognized("unknown".to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Docx => f.write_str("docx"),
            Self::PlainText => f.write_str("plain_text"),
            Self::Unrecognized(declared) => write!(f, "unrecognized ({declared})"),
        }
    }
}

/// A single uploaded file, owned by one request for the duration of extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub declared_format: FormatTag,
    pub raw_bytes: Bytes,
    pub filename: Option<String>,
}

/// Non-empty plain text recovered from a document, in source unit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Could not read the {format} document: {reason}")]
    Decode { format: FormatTag, reason: String },

    #[error("No text could be extracted from the document")]
    EmptyResult,

    #[error("File declared as {declared} but its content looks like {detected}")]
    FormatMismatch {
        declared: FormatTag,
        detected: FormatTag,
    },
}

impl ExtractionError {
    pub(crate) fn decode(format: FormatTag, reason: impl fmt::Display) -> Self {
        Self::Decode {
            format,
            reason: reason.to_string(),
        }
    }
}

pub type ExtractionOutcome = Result<ExtractedText, ExtractionError>;

/// Extraction behaviour switches, taken from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionOptions {
    /// Sniff the payload and reject it when it contradicts the declared tag.
    pub strict_format_check: bool,
}

/// Dispatches on the declared tag and returns the raw concatenation, which may be empty.
pub fn extract_text(payload: &[u8], declared: &FormatTag) -> Result<String, ExtractionError> {
    match declared {
        FormatTag::Pdf => pdf::extract_pages(payload),
        FormatTag::Docx => docx::extract_paragraphs(payload),
        FormatTag::PlainText => plain_text::decode(payload),
        FormatTag::Unrecognized(declared) => {
            Err(ExtractionError::UnsupportedFormat(declared.clone()))
        }
    }
}

/// Extracts text and treats a blank result as a failure.
pub fn extract(payload: &[u8], declared: &FormatTag) -> ExtractionOutcome {
    let text = extract_text(payload, declared)?;
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyResult);
    }
    Ok(ExtractedText(text))
}

/// Entry point used by the HTTP layer: optional sniffing, then [`extract`].
pub fn extract_document(
    document: &UploadedDocument,
    options: ExtractionOptions,
) -> ExtractionOutcome {
    let declared = &document.declared_format;

    if options.strict_format_check && declared.is_supported() {
        if let Some(detected) = sniff::sniff(&document.raw_bytes) {
            if &detected != declared {
                warn!(%declared, %detected, "Declared format contradicts payload");
                return Err(ExtractionError::FormatMismatch {
                    declared: declared.clone(),
                    detected,
                });
            }
        }
    }

    let outcome = extract(&document.raw_bytes, declared);
    match &outcome {
        Ok(text) => debug!(
            format = %declared,
            bytes = document.raw_bytes.len(),
            chars = text.char_count(),
            "Extracted document text"
        ),
        Err(e) => warn!(format = %declared, bytes = document.raw_bytes.len(), "Extraction failed: {e}"),
    }
    outcome
}
