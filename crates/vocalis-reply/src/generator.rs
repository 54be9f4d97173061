use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use vocalis_llm::ChatClient;
use vocalis_types::GenerationConfig;

use crate::clock::{Clock, SystemClock};
use crate::encyclopedia::Encyclopedia;
use crate::sources::{
    EncyclopediaSource, ExternalSource, FallbackSource, ReplySource, RuleSource, SourceKind,
    FALLBACK_REPLY,
};

pub const EMPTY_INPUT_REPLY: &str = "I didn't catch that. Please say something.";

/// How long one source may take before the chain moves on
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(20);

/// Produces a reply for every input by walking a chain of reply sources
///
/// The first source that yields non-blank text wins. Source errors and
/// sources that outlive `source_timeout` are logged and skipped, so
/// `generate_reply` never fails.
pub struct ReplyGenerator {
    sources: Vec<Arc<dyn ReplySource>>,
    source_timeout: Duration,
}

impl ReplyGenerator {
    pub fn builder() -> ReplyGeneratorBuilder {
        ReplyGeneratorBuilder::new()
    }

    /// Chain made of exactly these sources, in order
    pub fn from_sources(sources: Vec<Arc<dyn ReplySource>>) -> Self {
        Self {
            sources,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }

    pub fn source_kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|source| source.kind()).collect()
    }

    pub fn delegates_externally(&self) -> bool {
        self.sources
            .iter()
            .any(|source| source.kind() == SourceKind::External)
    }

    pub async fn generate_reply(&self, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        for source in &self.sources {
            match tokio::time::timeout(self.source_timeout, source.reply(text)).await {
                Ok(Ok(Some(reply))) if !reply.trim().is_empty() => {
                    info!(source = %source.kind(), "Reply generated");
                    return reply;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    warn!(source = %source.kind(), error = %e, "Reply source failed, falling back");
                }
                Err(_) => {
                    warn!(
                        source = %source.kind(),
                        timeout_ms = self.source_timeout.as_millis() as u64,
                        "Reply source timed out, falling back"
                    );
                }
            }
        }

        FALLBACK_REPLY.to_string()
    }
}

/// Assembles the source chain from whatever is configured
///
/// Order: external service (only with a chat client), rules, encyclopedia
/// (only when provided), fallback.
pub struct ReplyGeneratorBuilder {
    chat_client: Option<Arc<dyn ChatClient>>,
    generation: GenerationConfig,
    encyclopedia: Option<Arc<dyn Encyclopedia>>,
    summary_sentences: usize,
    clock: Arc<dyn Clock>,
    fallback: String,
    source_timeout: Duration,
}

impl ReplyGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            chat_client: None,
            generation: GenerationConfig::default(),
            encyclopedia: None,
            summary_sentences: 2,
            clock: Arc::new(SystemClock),
            fallback: FALLBACK_REPLY.to_string(),
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn chat_client(mut self, client: Option<Arc<dyn ChatClient>>) -> Self {
        self.chat_client = client;
        self
    }

    pub fn generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }

    pub fn encyclopedia(mut self, encyclopedia: Option<Arc<dyn Encyclopedia>>) -> Self {
        self.encyclopedia = encyclopedia;
        self
    }

    pub fn summary_sentences(mut self, sentences: usize) -> Self {
        self.summary_sentences = sentences;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = message.into();
        self
    }

    /// Deadline applied to each source in turn
    pub fn source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn build(self) -> ReplyGenerator {
        let mut sources: Vec<Arc<dyn ReplySource>> = Vec::new();

        if let Some(client) = self.chat_client {
            sources.push(Arc::new(ExternalSource::new(client, self.generation)));
        }
        sources.push(Arc::new(RuleSource::new(self.clock)));
        if let Some(encyclopedia) = self.encyclopedia {
            sources.push(Arc::new(
                EncyclopediaSource::new(encyclopedia).with_sentences(self.summary_sentences),
            ));
        }
        sources.push(Arc::new(FallbackSource::new(self.fallback)));

        ReplyGenerator::from_sources(sources).with_source_timeout(self.source_timeout)
    }
}

impl Default for ReplyGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
