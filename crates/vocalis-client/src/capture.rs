use std::pin::Pin;

use futures::Stream;

use crate::error::CaptureError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// In-progress transcription; display only
    Interim(String),
    /// Completed utterance; triggers one server call
    Final(String),
    Error(CaptureError),
    /// Capture stopped without a final result
    Ended,
}

pub type TranscriptStream = Pin<Box<dyn Stream<Item = TranscriptEvent> + Send>>;

/// Speech-to-text capability
pub trait SpeechCapture: Send {
    /// Begin capturing; events arrive on the returned stream.
    fn start(&mut self) -> Result<TranscriptStream, CaptureError>;

    fn stop(&mut self);
}
