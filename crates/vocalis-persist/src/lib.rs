pub mod builder;
pub mod db;
pub mod error;
pub mod migrations;
pub mod sqlite;
pub mod store;

pub use builder::StoreBuilder;
pub use db::Database;
pub use error::PersistError;
pub use sqlite::SqliteExchangeStore;
pub use store::{ExchangeStore, DEFAULT_HISTORY_LIMIT};
