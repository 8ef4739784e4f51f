use crate::error::{Error, Result};
use crate::qa::QuestionAnswerer;
use crate::session::ConversationState;
use tracing::info;

/// Answer a question about the loaded document and record the exchange.
///
/// Nothing is recorded when the model call fails.
pub async fn ask(
    answerer: &QuestionAnswerer,
    state: &mut ConversationState,
    question: &str,
) -> Result<String> {
    if question.trim().is_empty() {
        return Err(Error::InvalidInput("enter a question".into()));
    }
    let document_text = state.document_text().ok_or(Error::NoDocument)?;

    let answer = answerer.answer(document_text, question).await?;
    state.append_exchange(question, answer.clone())?;

    info!(session = %state.id(), "Recorded exchange ({} history entries)", state.history().len());
    Ok(answer)
}
