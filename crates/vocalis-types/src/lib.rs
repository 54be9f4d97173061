pub mod config;
pub mod exchange;
pub mod wire;

pub use config::GenerationConfig;
pub use exchange::{Exchange, NewExchange};
pub use wire::{ErrorResponse, HistoryResponse, ProcessRequest, ProcessResponse};
