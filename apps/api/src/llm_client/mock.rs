//! Test doubles for the generation backend.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;

use super::{CompletionBackend, LlmError};

/// Answers every prompt with a fixed reply, or fails with an API error.
/// Keeps every `(prompt, system)` pair it receives.
pub struct MockBackend {
    reply: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.to_string()));
        self.reply.clone().ok_or(LlmError::Api {
            status: 500,
            message: "mock backend failure".to_string(),
        })
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
