pub mod config;
pub mod openai;
pub mod traits;
pub mod types;

pub use config::{ClientFactory, OpenAIConfig};
pub use openai::OpenAIClient;
pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
pub use types::Message;
