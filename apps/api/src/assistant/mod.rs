// Résumé assistant: upload handling, prompt templates and the HTTP handlers
// that tie extraction and generation together.
// All generation goes through llm_client — no provider SDK calls here.

pub mod handlers;
pub mod prompts;
pub mod upload;
