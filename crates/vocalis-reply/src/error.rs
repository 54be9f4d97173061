use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("Upstream service error: {0}")]
    Upstream(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ReplyError>;
