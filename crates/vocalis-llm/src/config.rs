// Configuration layer for provider-agnostic LLM client creation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the OpenAI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for OpenAI API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Whole-request deadline; `None` keeps the client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a config only when a non-blank key is present
    pub fn from_optional_key(api_key: Option<&str>) -> Option<Self> {
        api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_chat_client(config: OpenAIConfig) -> Result<Arc<dyn crate::traits::ChatClient>> {
        let timeout = config
            .timeout
            .unwrap_or(crate::openai::DEFAULT_REQUEST_TIMEOUT);
        let mut client = crate::openai::OpenAIClient::with_timeout(config.api_key, timeout)?;
        if let Some(base_url) = config.base_url {
            client = client.with_base_url(base_url);
        }
        Ok(Arc::new(client))
    }
}
