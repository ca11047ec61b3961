//! Axum route handlers for the Assistant API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::assistant::prompts::{PromptInputs, PromptTemplate, ASSISTANT_SYSTEM};
use crate::assistant::upload::AssistForm;
use crate::errors::AppError;
use crate::extraction::{extract_document, ExtractedText, ExtractionOptions, FormatTag, UploadedDocument};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TaskInfo {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub filename: Option<String>,
    pub format: FormatTag,
    pub char_count: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AssistResponse {
    pub request_id: Uuid,
    pub task: PromptTemplate,
    pub model: String,
    pub content: String,
    pub resume_char_count: usize,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/tasks
pub async fn handle_list_tasks() -> Json<Vec<TaskInfo>> {
    Json(
        PromptTemplate::ALL
            .into_iter()
            .map(|t| TaskInfo {
                slug: t.slug(),
                title: t.title(),
                description: t.description(),
            })
            .collect(),
    )
}

/// POST /api/v1/extract
///
/// Extracts the uploaded résumé and returns the text without calling the LLM.
/// Lets the user check what the model will actually see.
#[tracing::instrument(skip(state, multipart))]
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut form = AssistForm::from_multipart(multipart).await?;
    let document = form.take_resume()?;
    let filename = document.filename.clone();
    let format = document.declared_format.clone();

    let text = extract_resume(document, state.config.extraction).await?;

    Ok(Json(ExtractResponse {
        filename,
        format,
        char_count: text.char_count(),
        text: text.into_string(),
    }))
}

/// POST /api/v1/assist/:task
///
/// Full pipeline: read form → extract résumé → fill the task's template → one LLM call.
/// Any failure ends the request; nothing is retried.
#[tracing::instrument(skip(state, multipart))]
pub async fn handle_assist(
    State(state): State<AppState>,
    Path(task): Path<String>,
    multipart: Multipart,
) -> Result<Json<AssistResponse>, AppError> {
    let template = PromptTemplate::from_slug(&task)
        .ok_or_else(|| AppError::NotFound(format!("Unknown assistant task '{task}'")))?;

    let mut form = AssistForm::from_multipart(multipart).await?;
    if form.job_posting.is_none() && form.resume.is_none() {
        return Err(AppError::Validation(
            "Please provide both the job posting and your résumé".to_string(),
        ));
    }
    let document = form.take_resume()?;
    let job_posting = form.require_job_posting()?;

    let resume_text = extract_resume(document, state.config.extraction).await?;

    let prompt = template.fill(&PromptInputs {
        job_posting,
        resume_text: resume_text.as_str(),
    });

    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        task = template.slug(),
        model = state.llm.model(),
        prompt_chars = prompt.len(),
        "Sending assistant prompt"
    );

    let content = state.llm.complete(&prompt, ASSISTANT_SYSTEM).await?;

    Ok(Json(AssistResponse {
        request_id,
        task: template,
        model: state.llm.model().to_string(),
        content,
        resume_char_count: resume_text.char_count(),
        generated_at: Utc::now(),
    }))
}

/// Runs the CPU-bound extraction off the async runtime.
async fn extract_resume(
    document: UploadedDocument,
    options: ExtractionOptions,
) -> Result<ExtractedText, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_document(&document, options))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;
    Ok(text)
}
