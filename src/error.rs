use crate::llm::LlmError;
use serde::Serialize;

/// Network failure while reaching a notice page or a PDF.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Content that could not be interpreted: a bad URL or an unreadable PDF.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("downloaded content is not a PDF")]
    NotPdf,
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("no text could be extracted from the PDF")]
    EmptyDocument,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("model call failed: {0}")]
    Model(#[source] LlmError),
    #[error("no document loaded; open a PDF first")]
    NoDocument,
    #[error("{0}")]
    InvalidInput(String),
}

impl From<LlmError> for Error {
    fn from(err: LlmError) -> Self {
        if err.is_auth() {
            Error::Auth(err.to_string())
        } else {
            Error::Model(err)
        }
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
