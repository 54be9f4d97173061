use crate::error::Result;

/// Text-to-speech capability
pub trait SpeechSynthesizer: Send {
    /// Queue an utterance.
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Silence anything currently speaking or queued.
    fn cancel(&mut self);
}
