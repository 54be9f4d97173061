use async_trait::async_trait;

use super::{ReplySource, SourceKind};
use crate::error::Result;

pub const FALLBACK_REPLY: &str = "I'm here to help. You can ask about the date, time, \
or say 'tell me about <topic>' for a quick Wikipedia summary.";

/// Always answers; terminates every chain
pub struct FallbackSource {
    message: String,
}

impl FallbackSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FallbackSource {
    fn default() -> Self {
        Self::new(FALLBACK_REPLY)
    }
}

#[async_trait]
impl ReplySource for FallbackSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Fallback
    }

    async fn reply(&self, _text: &str) -> Result<Option<String>> {
        Ok(Some(self.message.clone()))
    }
}
