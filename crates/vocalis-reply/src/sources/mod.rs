//! Reply sources, tried in priority order by the generator.

mod encyclopedia;
mod external;
mod fallback;
mod rules;

use async_trait::async_trait;

use crate::error::Result;

pub use encyclopedia::{search_term, EncyclopediaSource};
pub use external::ExternalSource;
pub use fallback::{FallbackSource, FALLBACK_REPLY};
pub use rules::RuleSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    External,
    Rules,
    Encyclopedia,
    Fallback,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Rules => "rules",
            Self::Encyclopedia => "encyclopedia",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One strategy for producing a reply
///
/// `Ok(None)` means "no answer, try the next source". Errors are logged by
/// the generator and treated the same way.
#[async_trait]
pub trait ReplySource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn reply(&self, text: &str) -> Result<Option<String>>;
}
