use std::sync::Arc;

use async_trait::async_trait;

use super::{ReplySource, SourceKind};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good evening",
    "good afternoon",
];

pub const GREETING_REPLY: &str = "Hello! How can I assist you today?";

pub const WEATHER_REPLY: &str = "I can't fetch live weather without an API, but you can ask \
something like 'What's the weather in London?' and I will add that in the future.";

/// Canned answers for greetings, time, date and weather
pub struct RuleSource {
    clock: Arc<dyn Clock>,
}

impl RuleSource {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Match against the input; `None` when no rule applies.
    pub fn answer(&self, text: &str) -> Option<String> {
        let words = Words::new(text);

        if GREETINGS.iter().any(|greeting| words.contains_phrase(greeting)) {
            return Some(GREETING_REPLY.to_string());
        }

        if words.contains_phrase("time") {
            let now = self.clock.now().format("%I:%M %p");
            return Some(format!("The current time is {}.", now));
        }

        if words.contains_phrase("date") || words.contains_phrase("today") {
            let today = self.clock.now().format("%A, %B %d, %Y");
            return Some(format!("Today is {}.", today));
        }

        if words.contains_phrase("weather") {
            return Some(WEATHER_REPLY.to_string());
        }

        None
    }
}

impl Default for RuleSource {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl ReplySource for RuleSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Rules
    }

    async fn reply(&self, text: &str) -> Result<Option<String>> {
        Ok(self.answer(text))
    }
}

/// Lower-cased input split on anything that is not alphanumeric, so "hi"
/// does not match inside "this".
struct Words {
    padded: String,
}

impl Words {
    fn new(text: &str) -> Self {
        let joined = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            padded: format!(" {} ", joined),
        }
    }

    fn contains_phrase(&self, phrase: &str) -> bool {
        self.padded.contains(&format!(" {} ", phrase))
    }
}
