//! Client side of the voice round trip.
//!
//! Speech capture, speech synthesis and rendering are capabilities supplied
//! by the host (browser, desktop shell, console). `VoiceController` drives
//! them together with a `ChatBackend`.

pub mod backend;
pub mod capture;
pub mod console;
pub mod controller;
pub mod error;
pub mod synthesis;
pub mod view;

pub use backend::{ChatBackend, HttpBackend};
pub use capture::{SpeechCapture, TranscriptEvent, TranscriptStream};
pub use controller::{MicState, VoiceController};
pub use error::{CaptureError, ClientError};
pub use synthesis::SpeechSynthesizer;
pub use view::ChatView;
