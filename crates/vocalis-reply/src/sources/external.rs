use std::sync::Arc;

use async_trait::async_trait;
use vocalis_llm::{ChatClient, ChatOptions, ChatRequest, Message};
use vocalis_types::GenerationConfig;

use super::{ReplySource, SourceKind};
use crate::error::Result;

/// Delegates to an external chat completion service
pub struct ExternalSource {
    client: Arc<dyn ChatClient>,
    config: GenerationConfig,
}

impl ExternalSource {
    pub fn new(client: Arc<dyn ChatClient>, config: GenerationConfig) -> Self {
        Self { client, config }
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        let mut options = ChatOptions::new();
        if let Some(temp) = self.config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            options = options.max_tokens(max_tokens);
        }

        ChatRequest::new(
            self.config.model.clone(),
            vec![
                Message::system(self.config.system_prompt.clone()),
                Message::human(text),
            ],
        )
        .with_options(options)
    }
}

#[async_trait]
impl ReplySource for ExternalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::External
    }

    async fn reply(&self, text: &str) -> Result<Option<String>> {
        let response = self.client.chat(self.build_request(text)).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Completion usage"
            );
        }
        Ok(response.text().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vocalis_llm::ChatResponse;

    struct RecordingClient {
        requests: Mutex<Vec<ChatRequest>>,
        content: Option<String>,
    }

    #[async_trait]
    impl ChatClient for RecordingClient {
        async fn chat(&self, request: ChatRequest) -> anyhow::Result<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(ChatResponse {
                content: self.content.clone(),
                usage: None,
                finish_reason: Some("stop".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_request_shape() {
        let client = Arc::new(RecordingClient {
            requests: Mutex::new(Vec::new()),
            content: Some(" Paris. ".to_string()),
        });
        let source = ExternalSource::new(client.clone(), GenerationConfig::default());

        let reply = source.reply("capital of France?").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Paris."));

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages[0].role(), "system");
        assert_eq!(request.messages[1], Message::human("capital of France?"));
        assert_eq!(request.options.temperature, Some(0.7));
        assert_eq!(request.options.max_tokens, Some(300));
    }

    #[tokio::test]
    async fn test_blank_completion_is_no_answer() {
        let client = Arc::new(RecordingClient {
            requests: Mutex::new(Vec::new()),
            content: Some("   ".to_string()),
        });
        let source = ExternalSource::new(client, GenerationConfig::default());
        assert_eq!(source.reply("hello").await.unwrap(), None);
    }
}
