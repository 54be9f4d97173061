use std::sync::Arc;

use vocalis_persist::ExchangeStore;
use vocalis_reply::ReplyGenerator;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The store handle is passed explicitly; handlers never reach for a
/// process-wide connection.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ExchangeStore>,
    pub generator: Arc<ReplyGenerator>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ExchangeStore>, generator: ReplyGenerator) -> Self {
        Self {
            config: Arc::new(config),
            store,
            generator: Arc::new(generator),
        }
    }
}
