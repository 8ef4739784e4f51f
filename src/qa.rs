//! Document-grounded question answering.

use crate::error::Result;
use crate::llm::{ChatMessage, ChatModel, ChatRequest};
use tracing::{info, warn};

/// What the model is told to say when the document has no answer.
pub const NOT_IN_DOCUMENT: &str = "The document does not say.";

const MAX_ANSWER_TOKENS: u32 = 2048;

/// Fixed instruction template around the document and the question.
pub fn build_prompt(document_text: &str, question: &str) -> String {
    format!(
        "You are a careful assistant that analyses the administrative documents of a university.\n\
         Read the [Document] below thoroughly and answer the [Question] accurately.\n\
         Use only information found in the document. Do not guess; if the answer is not in the document, reply \"{NOT_IN_DOCUMENT}\"\n\
         Put important dates and requirements in **bold**.\n\
         \n\
         [Document]\n\
         {document_text}\n\
         \n\
         [Question]\n\
         {question}\n"
    )
}

/// Keep at most `max_chars` characters, cutting on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct QuestionAnswerer {
    model: Box<dyn ChatModel>,
    max_document_chars: Option<usize>,
}

impl QuestionAnswerer {
    pub fn new(model: Box<dyn ChatModel>) -> Self {
        Self {
            model,
            max_document_chars: None,
        }
    }

    /// Bound the document text embedded in each prompt. Unbounded by default.
    pub fn with_max_document_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_document_chars = max_chars;
        self
    }

    /// One deterministic model call; the model's text is returned untouched.
    pub async fn answer(&self, document_text: &str, question: &str) -> Result<String> {
        let context = match self.max_document_chars {
            Some(max) => {
                let cut = truncate_chars(document_text, max);
                if cut.len() < document_text.len() {
                    warn!(
                        "Document truncated to {} characters for the prompt (was {})",
                        max,
                        document_text.chars().count()
                    );
                }
                cut
            }
            None => document_text,
        };

        let request = ChatRequest {
            messages: vec![ChatMessage::user(build_prompt(context, question))],
            model: self.model.model().to_string(),
            temperature: 0.0,
            max_tokens: MAX_ANSWER_TOKENS,
        };

        info!(model = %request.model, "Asking model ({} prompt characters)", request.messages[0].content.len());
        let response = self.model.complete(&request).await?;
        info!("Model answered with {} characters", response.content.len());
        Ok(response.content)
    }
}
