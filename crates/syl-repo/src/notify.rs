//! The notification sink seam.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Where user-facing outcomes go: toasts, error dialogs, confirmation prompts.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn success(&self, message: &str);

    async fn error(&self, message: &str);

    /// Ask the user to confirm a destructive action.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Logs every notification and answers every prompt with yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn success(&self, message: &str) {
        tracing::info!(message, "notification");
    }

    async fn error(&self, message: &str) {
        tracing::error!(message, "notification");
    }

    async fn confirm(&self, prompt: &str) -> bool {
        tracing::info!(prompt, "auto-confirming");
        true
    }
}

/// A notification as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum Notification {
    Success(String),
    Error(String),
    Confirm(String),
}

/// Keeps every notification in order and answers prompts with a fixed reply.
#[derive(Debug)]
pub struct RecordingSink {
    log: Mutex<Vec<Notification>>,
    answer: AtomicBool,
}

impl RecordingSink {
    #[must_use]
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            answer: AtomicBool::new(confirm_answer),
        }
    }

    pub fn set_confirm_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.log.lock().await.clone()
    }

    pub async fn errors(&self) -> Vec<String> {
        self.log
            .lock()
            .await
            .iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn success(&self, message: &str) {
        self.log
            .lock()
            .await
            .push(Notification::Success(message.to_string()));
    }

    async fn error(&self, message: &str) {
        self.log
            .lock()
            .await
            .push(Notification::Error(message.to_string()));
    }

    async fn confirm(&self, prompt: &str) -> bool {
        self.log
            .lock()
            .await
            .push(Notification::Confirm(prompt.to_string()));
        self.answer.load(Ordering::SeqCst)
    }
}
