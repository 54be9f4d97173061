use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted user-input/assistant-reply pair.
///
/// Rows are append-only: `id` and `timestamp` are assigned by the store on
/// insert and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Exchange {
    pub id: i64,
    pub user_input: String,
    pub assistant_reply: String,
    pub timestamp: DateTime<Utc>,
}

/// An exchange that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExchange {
    pub user_input: String,
    pub assistant_reply: String,
}

impl NewExchange {
    pub fn new(user_input: impl Into<String>, assistant_reply: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            assistant_reply: assistant_reply.into(),
        }
    }
}
