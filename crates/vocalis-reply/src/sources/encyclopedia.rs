use std::sync::Arc;

use async_trait::async_trait;

use super::{ReplySource, SourceKind};
use crate::encyclopedia::{Encyclopedia, PageKind};
use crate::error::Result;

const TRIGGERS: &[&str] = &["who is", "what is", "tell me about", "define", "explain"];

const CANDIDATES: usize = 3;

/// Answers with the opening sentences of an encyclopedia summary
pub struct EncyclopediaSource {
    encyclopedia: Arc<dyn Encyclopedia>,
    sentences: usize,
}

impl EncyclopediaSource {
    pub fn new(encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        Self {
            encyclopedia,
            sentences: 2,
        }
    }

    pub fn with_sentences(mut self, sentences: usize) -> Self {
        self.sentences = sentences.max(1);
        self
    }
}

/// Strip question phrasing ("who is", "tell me about", ...) from the input.
///
/// Falls back to the raw trimmed input when no trigger is present or
/// nothing is left after stripping.
pub fn search_term(text: &str) -> String {
    let lowered = text.to_lowercase();
    if !TRIGGERS.iter().any(|trigger| lowered.contains(trigger)) {
        return text.trim().to_string();
    }

    let mut query = lowered;
    for trigger in TRIGGERS {
        query = query.replace(trigger, "");
    }
    let query = query.trim_matches(|c: char| " ?!.,:".contains(c));
    if query.is_empty() {
        text.trim().to_string()
    } else {
        query.to_string()
    }
}

/// First `count` sentences of `text`.
fn first_sentences(text: &str, count: usize) -> &str {
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == count {
                    return &text[..idx + c.len_utf8()];
                }
            }
        }
    }
    text.trim_end()
}

#[async_trait]
impl ReplySource for EncyclopediaSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Encyclopedia
    }

    async fn reply(&self, text: &str) -> Result<Option<String>> {
        let term = search_term(text);
        let titles = self.encyclopedia.search(&term, CANDIDATES).await?;
        if titles.is_empty() {
            tracing::debug!(term = %term, "No encyclopedia match");
            return Ok(None);
        }

        let mut ambiguous = false;
        for title in &titles {
            let Some(summary) = self.encyclopedia.summary(title).await? else {
                continue;
            };
            match summary.kind {
                PageKind::Standard if !summary.extract.trim().is_empty() => {
                    return Ok(Some(
                        first_sentences(summary.extract.trim(), self.sentences).to_string(),
                    ));
                }
                PageKind::Disambiguation => ambiguous = true,
                _ => {}
            }
        }

        if ambiguous {
            return Ok(Some(format!(
                "That topic has multiple meanings. Please be more specific, for example: {}.",
                titles.join(", ")
            )));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_strips_triggers() {
        assert_eq!(search_term("Who is Ada Lovelace?"), "ada lovelace");
        assert_eq!(search_term("tell me about the Moon."), "the moon");
        assert_eq!(search_term("Explain photosynthesis!"), "photosynthesis");
    }

    #[test]
    fn test_search_term_without_trigger_uses_raw_input() {
        assert_eq!(search_term("  Alan Turing "), "Alan Turing");
    }

    #[test]
    fn test_search_term_only_trigger() {
        assert_eq!(search_term("what is?"), "what is?");
    }

    #[test]
    fn test_first_sentences() {
        let text = "Rust is a language. It is fast. It is safe.";
        assert_eq!(first_sentences(text, 2), "Rust is a language. It is fast.");
        assert_eq!(first_sentences(text, 1), "Rust is a language.");
        assert_eq!(first_sentences(text, 5), text);
    }

    #[test]
    fn test_first_sentences_ignores_inner_periods() {
        let text = "Version 1.5 shipped in 2021. Then more.";
        assert_eq!(first_sentences(text, 1), "Version 1.5 shipped in 2021.");
    }
}
