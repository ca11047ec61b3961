//! Reads the assistant's multipart form into owned, typed parts.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::{FormatTag, UploadedDocument};

pub const JOB_POSTING_FIELD: &str = "job_posting";
pub const RESUME_FIELD: &str = "resume";

/// The submitted form. Either part may be missing; handlers decide what is required.
#[derive(Debug, Default)]
pub struct AssistForm {
    pub job_posting: Option<String>,
    pub resume: Option<UploadedDocument>,
}

impl AssistForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = AssistForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            match field.name() {
                Some(JOB_POSTING_FIELD) => {
                    form.job_posting = Some(field.text().await.map_err(multipart_error)?);
                }
                Some(RESUME_FIELD) => {
                    form.resume = Some(read_document(field).await?);
                }
                other => debug!(field = ?other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// The job posting, or a validation error when it is missing or blank.
    pub fn require_job_posting(&self) -> Result<&str, AppError> {
        self.job_posting
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                AppError::Validation(format!("'{JOB_POSTING_FIELD}' cannot be empty"))
            })
    }

    pub fn take_resume(&mut self) -> Result<UploadedDocument, AppError> {
        self.resume
            .take()
            .ok_or_else(|| AppError::Validation(format!("a '{RESUME_FIELD}' file is required")))
    }
}

async fn read_document(field: Field<'_>) -> Result<UploadedDocument, AppError> {
    let filename = field.file_name().map(str::to_string);
    let declared_format = FormatTag::declared(field.content_type(), filename.as_deref());
    let raw_bytes = field.bytes().await.map_err(multipart_error)?;

    debug!(
        filename = ?filename,
        format = %declared_format,
        bytes = raw_bytes.len(),
        "Received résumé upload"
    );

    Ok(UploadedDocument {
        declared_format,
        raw_bytes,
        filename,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("Failed to read multipart form: {}", e.body_text()))
    }
}
