pub mod clock;
pub mod encyclopedia;
pub mod error;
pub mod generator;
pub mod sources;

pub use clock::{Clock, FixedClock, SystemClock};
pub use encyclopedia::{Encyclopedia, PageKind, PageSummary, WikipediaClient, WikipediaConfig};
pub use error::ReplyError;
pub use generator::{
    ReplyGenerator, ReplyGeneratorBuilder, DEFAULT_SOURCE_TIMEOUT, EMPTY_INPUT_REPLY,
};
pub use sources::{
    EncyclopediaSource, ExternalSource, FallbackSource, ReplySource, RuleSource, SourceKind,
    FALLBACK_REPLY,
};
