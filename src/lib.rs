pub mod commands;
pub mod document;
pub mod error;
pub mod fetch;
pub mod links;
pub mod llm;
pub mod qa;
pub mod session;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use error::{Error, FetchError, ParseError, Result};
pub use fetch::Fetcher;
pub use links::{extract_pdf_links, LinkEntry, LinkExtractor};
pub use qa::QuestionAnswerer;
pub use session::{ChatEntry, ConversationState, Role};
pub use settings::Settings;
