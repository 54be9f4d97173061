mod client;

pub use client::{OpenAIClient, DEFAULT_REQUEST_TIMEOUT};
