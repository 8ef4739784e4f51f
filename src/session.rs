use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: Role,
    pub message: String,
}

/// The loaded document and its question/answer history for one session.
///
/// History is non-empty only while a document is loaded.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationState {
    id: String,
    document_text: Option<String>,
    document_label: Option<String>,
    history: Vec<ChatEntry>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document_text: None,
            document_label: None,
            history: Vec::new(),
        }
    }

    /// Replace the current document and restart the history with a greeting.
    pub fn load_document(&mut self, text: impl Into<String>, label: impl Into<String>) {
        let label = label.into();
        self.history = vec![ChatEntry {
            role: Role::Assistant,
            message: format!("'{}' loaded; ask me anything", label),
        }];
        self.document_text = Some(text.into());
        self.document_label = Some(label);
        debug!(session = %self.id, "document loaded");
    }

    /// Record a question and its answer, user first.
    pub fn append_exchange(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<()> {
        if self.document_text.is_none() {
            return Err(Error::NoDocument);
        }
        self.history.extend([
            ChatEntry {
                role: Role::User,
                message: question.into(),
            },
            ChatEntry {
                role: Role::Assistant,
                message: answer.into(),
            },
        ]);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.document_text = None;
        self.document_label = None;
        self.history.clear();
        debug!(session = %self.id, "session reset");
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_document(&self) -> bool {
        self.document_text.is_some()
    }

    pub fn document_text(&self) -> Option<&str> {
        self.document_text.as_deref()
    }

    pub fn document_label(&self) -> Option<&str> {
        self.document_label.as_deref()
    }

    pub fn history(&self) -> &[ChatEntry] {
        &self.history
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
