use crate::error::{Error, Result};
use crate::fetch::{Fetcher, DEFAULT_USER_AGENT};
use crate::links::{base_host_of, LinkExtractor, FALLBACK_ATTACHMENT_PREFIX};
use crate::llm::{ProviderModel, DEFAULT_MODEL};
use crate::qa::QuestionAnswerer;
use clap::Args;

/// Runtime configuration, from command-line flags or `NOTICE_QA_*` variables.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Model as "provider/model": gemini/..., openai/..., claude/... or ollama/...
    #[arg(long, env = "NOTICE_QA_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API key for the model provider
    #[arg(long, env = "NOTICE_QA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the provider's API root (the host for Ollama)
    #[arg(long, env = "NOTICE_QA_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// scheme://host used to resolve relative links; defaults to the page's own host
    #[arg(long, env = "NOTICE_QA_BASE_HOST")]
    pub base_host: Option<String>,

    /// Path joined in front of bare relative PDF links
    #[arg(long, env = "NOTICE_QA_FALLBACK_PREFIX", default_value = FALLBACK_ATTACHMENT_PREFIX)]
    pub fallback_prefix: String,

    /// User-Agent sent with page and PDF requests
    #[arg(long, env = "NOTICE_QA_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Cut the document text embedded in each prompt to this many characters
    #[arg(long, env = "NOTICE_QA_MAX_DOCUMENT_CHARS")]
    pub max_document_chars: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base_url: None,
            base_host: None,
            fallback_prefix: FALLBACK_ATTACHMENT_PREFIX.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_document_chars: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !self.fallback_prefix.starts_with('/') || !self.fallback_prefix.ends_with('/') {
            return Err(Error::InvalidInput(format!(
                "fallback prefix must start and end with '/': {}",
                self.fallback_prefix
            )));
        }
        if self.max_document_chars == Some(0) {
            return Err(Error::InvalidInput(
                "max document chars must be at least 1".to_string(),
            ));
        }
        if let Some(host) = &self.base_host {
            base_host_of(host)?;
        }
        Ok(())
    }

    /// API key for display, e.g. `AIza...x9Qk`.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|value| {
            let chars: Vec<char> = value.chars().collect();
            if chars.len() > 8 {
                let head: String = chars[..4].iter().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{}...{}", head, tail)
            } else {
                "*".repeat(chars.len())
            }
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn model(&self) -> ProviderModel {
        ProviderModel::resolve(&self.model, self.api_key.clone(), self.api_base_url.clone())
    }

    /// Fails early when the chosen provider needs a key and none is set.
    pub fn require_credentials(&self) -> Result<()> {
        let model = self.model();
        if model.provider.requires_api_key() && !self.has_api_key() {
            return Err(Error::Auth(format!(
                "{} API key not configured; pass --api-key or set NOTICE_QA_API_KEY",
                model.provider.name()
            )));
        }
        Ok(())
    }

    pub fn answerer(&self) -> QuestionAnswerer {
        QuestionAnswerer::new(Box::new(self.model()))
            .with_max_document_chars(self.max_document_chars)
    }

    pub fn fetcher(&self) -> Result<Fetcher> {
        Fetcher::new(&self.user_agent)
    }

    /// Link extractor for a page, using the configured base host if any.
    ///
    /// Either way the host is reduced to `scheme://host[:port]`, so resolved
    /// links are always absolute.
    pub fn link_extractor(&self, page_url: &str) -> Result<LinkExtractor> {
        let base_host = base_host_of(self.base_host.as_deref().unwrap_or(page_url))?;
        Ok(LinkExtractor::new(&base_host).with_fallback_prefix(self.fallback_prefix.clone()))
    }
}
