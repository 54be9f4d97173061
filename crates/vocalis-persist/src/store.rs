use async_trait::async_trait;
use vocalis_types::{Exchange, NewExchange};

use crate::error::Result;

/// How many exchanges the history endpoint returns by default
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Append-only exchange persistence
///
/// Every call is an independent statement; nothing spans a transaction.
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    /// Insert one exchange; the store assigns `id` and `timestamp`.
    async fn insert(&self, exchange: NewExchange) -> Result<Exchange>;

    /// The `limit` most recent exchanges in chronological order (oldest first).
    async fn recent(&self, limit: usize) -> Result<Vec<Exchange>>;

    async fn count(&self) -> Result<u64>;

    /// Cheap liveness probe for health checks
    async fn ping(&self) -> Result<()>;
}
