use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use tracing::debug;
use vocalis_types::{Exchange, NewExchange};

use crate::db::Database;
use crate::error::Result;
use crate::store::ExchangeStore;

/// `ExchangeStore` backed by SQLite
///
/// rusqlite is blocking, so every operation runs on the blocking pool and
/// takes the connection lock only for its own statement.
#[derive(Clone, Debug)]
pub struct SqliteExchangeStore {
    db: Arc<Database>,
}

impl SqliteExchangeStore {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Database::in_memory()?))
    }

    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.with_conn(f)).await?
    }
}

fn row_to_exchange(row: &Row<'_>) -> rusqlite::Result<Exchange> {
    Ok(Exchange {
        id: row.get(0)?,
        user_input: row.get(1)?,
        assistant_reply: row.get(2)?,
        timestamp: row.get(3)?,
    })
}

fn insert_exchange(conn: &Connection, exchange: &NewExchange) -> Result<Exchange> {
    let stored = conn.query_row(
        "INSERT INTO conversations (user_input, assistant_reply)
         VALUES (?1, ?2)
         RETURNING id, user_input, assistant_reply, timestamp",
        params![exchange.user_input, exchange.assistant_reply],
        row_to_exchange,
    )?;
    Ok(stored)
}

fn recent_exchanges(conn: &Connection, limit: usize) -> Result<Vec<Exchange>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_input, assistant_reply, timestamp
         FROM conversations
         ORDER BY id DESC
         LIMIT ?1",
    )?;
    let mut exchanges = stmt
        .query_map(params![limit as i64], row_to_exchange)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    // Newest-first from the query; callers get oldest first.
    exchanges.reverse();
    Ok(exchanges)
}

#[async_trait]
impl ExchangeStore for SqliteExchangeStore {
    async fn insert(&self, exchange: NewExchange) -> Result<Exchange> {
        let stored = self.run(move |conn| insert_exchange(conn, &exchange)).await?;
        debug!(id = stored.id, "Stored exchange");
        Ok(stored)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Exchange>> {
        self.run(move |conn| recent_exchanges(conn, limit)).await
    }

    async fn count(&self) -> Result<u64> {
        self.run(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
