use std::path::PathBuf;

use crate::db::Database;
use crate::error::{PersistError, Result};
use crate::sqlite::SqliteExchangeStore;

/// Builds an exchange store from a file path or an in-memory database
pub struct StoreBuilder {
    path: Option<PathBuf>,
    in_memory: bool,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            path: None,
            in_memory: false,
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn build(self) -> Result<SqliteExchangeStore> {
        let db = if self.in_memory {
            Database::in_memory()?
        } else {
            let path = self
                .path
                .ok_or_else(|| PersistError::Internal("database path is required".to_string()))?;
            Database::open(&path)?
        };
        Ok(SqliteExchangeStore::new(db))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
