use thiserror::Error;

/// Failure reported by the speech capture capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Microphone access denied")]
    PermissionDenied,

    #[error("No speech detected")]
    NoSpeech,

    #[error("Speech capture is not available: {0}")]
    Unavailable(String),

    #[error("Speech capture failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Already listening")]
    AlreadyListening,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
