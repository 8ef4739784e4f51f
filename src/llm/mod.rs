pub mod claude;
pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
}

/// Anything that can turn a chat request into a single completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model id sent with each request, without the provider prefix.
    fn model(&self) -> &str;

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Unified LLM provider enum; dispatches to the OpenAI-compatible, Claude or Gemini backends.
#[derive(Debug, Clone)]
pub enum Provider {
    OpenAi(openai::OpenAiConfig),
    Claude(claude::ClaudeConfig),
    Ollama(openai::OpenAiConfig),
    Gemini(gemini::GeminiConfig),
}

pub const DEFAULT_MODEL: &str = "gemini/gemini-1.5-flash";

impl Provider {
    pub fn openai(api_key: String) -> Self {
        Provider::OpenAi(openai::OpenAiConfig {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    pub fn claude(api_key: String) -> Self {
        Provider::Claude(claude::ClaudeConfig {
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
        })
    }

    pub fn ollama(host: String) -> Self {
        Provider::Ollama(openai::OpenAiConfig {
            api_key: String::new(),
            base_url: format!("{}/v1", host),
        })
    }

    pub fn gemini(api_key: String) -> Self {
        Provider::Gemini(gemini::GeminiConfig {
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi(_) => "openai",
            Provider::Claude(_) => "claude",
            Provider::Ollama(_) => "ollama",
            Provider::Gemini(_) => "gemini",
        }
    }

    /// Ollama runs locally and is the only backend usable without a key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama(_))
    }

    fn api_key(&self) -> &str {
        match self {
            Provider::OpenAi(c) | Provider::Ollama(c) => &c.api_key,
            Provider::Claude(c) => &c.api_key,
            Provider::Gemini(c) => &c.api_key,
        }
    }

    /// Resolve a provider from a model string like "gemini/...", "openai/gpt-4o",
    /// "claude/..." or "ollama/llama3". A bare model id is treated as OpenAI.
    ///
    /// For Ollama `base_url` is the host (e.g. `http://localhost:11434`); for the
    /// others it replaces the provider's API root.
    pub fn resolve(
        model: &str,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> (Provider, String) {
        if let Some(model_id) = model.strip_prefix("ollama/") {
            let host = base_url.unwrap_or_else(|| "http://localhost:11434".to_string());
            return (Provider::ollama(host), model_id.to_string());
        }

        let api_key = api_key.unwrap_or_default();
        let (mut provider, model_id) = if let Some(model_id) = model.strip_prefix("claude/") {
            (Provider::claude(api_key), model_id)
        } else if let Some(model_id) = model.strip_prefix("gemini/") {
            (Provider::gemini(api_key), model_id)
        } else {
            let model_id = model.strip_prefix("openai/").unwrap_or(model);
            (Provider::openai(api_key), model_id)
        };

        if let Some(base_url) = base_url {
            match &mut provider {
                Provider::OpenAi(c) | Provider::Ollama(c) => c.base_url = base_url,
                Provider::Claude(c) => c.base_url = base_url,
                Provider::Gemini(c) => c.base_url = base_url,
            }
        }
        (provider, model_id.to_string())
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        if self.requires_api_key() && self.api_key().trim().is_empty() {
            return Err(LlmError::MissingApiKey(self.name().to_string()));
        }
        match self {
            Provider::OpenAi(config) | Provider::Ollama(config) => {
                openai::chat(config, request).await
            }
            Provider::Claude(config) => claude::chat(config, request).await,
            Provider::Gemini(config) => gemini::chat(config, request).await,
        }
    }
}

/// A provider bound to one model id.
#[derive(Debug, Clone)]
pub struct ProviderModel {
    pub provider: Provider,
    pub model: String,
}

impl ProviderModel {
    pub fn resolve(model: &str, api_key: Option<String>, base_url: Option<String>) -> Self {
        let (provider, model) = Provider::resolve(model, api_key, base_url);
        Self { provider, model }
    }
}

#[async_trait]
impl ChatModel for ProviderModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.provider.chat(request).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{0} API key not configured")]
    MissingApiKey(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("model returned no content")]
    EmptyResponse,
}

impl LlmError {
    /// Missing or rejected credentials, as opposed to any other model failure.
    pub fn is_auth(&self) -> bool {
        match self {
            LlmError::MissingApiKey(_) => true,
            LlmError::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}

/// Map a non-success response into `LlmError::Api`, keeping the body for context.
pub(crate) async fn api_error(resp: reqwest::Response) -> LlmError {
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    LlmError::Api { status, message }
}
