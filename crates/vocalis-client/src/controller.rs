use futures::StreamExt;
use tracing::{debug, warn};

use crate::backend::ChatBackend;
use crate::capture::{SpeechCapture, TranscriptEvent};
use crate::error::{CaptureError, ClientError, Result};
use crate::synthesis::SpeechSynthesizer;
use crate::view::ChatView;

/// Microphone state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicState {
    Idle,
    Listening,
    Error,
}

/// Drives one listen → process → speak → refresh cycle at a time.
///
/// Runs on a single task; the only suspension points are the capture stream
/// and backend calls. Requests are not sequenced, so whatever response
/// lands last is what the view shows.
pub struct VoiceController<C, S, B, V> {
    capture: C,
    synthesizer: S,
    backend: B,
    view: V,
    state: MicState,
}

impl<C, S, B, V> VoiceController<C, S, B, V>
where
    C: SpeechCapture,
    S: SpeechSynthesizer,
    B: ChatBackend,
    V: ChatView,
{
    pub fn new(capture: C, synthesizer: S, backend: B, view: V) -> Self {
        Self {
            capture,
            synthesizer,
            backend,
            view,
            state: MicState::Idle,
        }
    }

    pub fn state(&self) -> MicState {
        self.state
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn set_state(&mut self, state: MicState) {
        self.state = state;
        self.view.show_state(state);
    }

    /// Surface a capture failure, then return to Idle so the user can retry.
    fn capture_failed(&mut self, error: &CaptureError) {
        warn!("Speech capture failed: {}", error);
        self.set_state(MicState::Error);
        self.view.show_error(&error.to_string());
        self.set_state(MicState::Idle);
    }

    /// Listen for one utterance and run the round trip for it.
    ///
    /// Returns the reply, or `None` if capture ended without a usable
    /// final result.
    pub async fn listen_once(&mut self) -> Result<Option<String>> {
        if self.state == MicState::Listening {
            return Err(ClientError::AlreadyListening);
        }

        let mut events = match self.capture.start() {
            Ok(events) => events,
            Err(e) => {
                self.capture_failed(&e);
                return Err(e.into());
            }
        };

        let outcome = {
            let mut session =
                ListenSession::begin(&mut self.capture, &mut self.view, &mut self.state);
            loop {
                match events.next().await {
                    Some(TranscriptEvent::Interim(text)) => {
                        session.view.show_transcript(&text, false);
                    }
                    Some(TranscriptEvent::Final(text)) => {
                        session.end(MicState::Idle);
                        session.view.show_transcript(&text, true);
                        break Ok(Some(text));
                    }
                    Some(TranscriptEvent::Error(e)) => {
                        session.close();
                        break Err(e);
                    }
                    Some(TranscriptEvent::Ended) | None => {
                        session.end(MicState::Idle);
                        break Ok(None);
                    }
                }
            }
        };

        match outcome {
            Ok(Some(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    debug!("Ignoring blank final transcript");
                    return Ok(None);
                }
                self.submit(text).await.map(Some)
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.capture_failed(&e);
                Err(e.into())
            }
        }
    }

    /// Send text to the server, speak the reply, then refresh history.
    pub async fn submit(&mut self, text: &str) -> Result<String> {
        let reply = match self.backend.process(text).await {
            Ok(reply) => reply,
            Err(e) => {
                self.view.show_error(&e.to_string());
                return Err(e);
            }
        };

        self.view.show_reply(&reply);

        // At most one utterance audible.
        self.synthesizer.cancel();
        if let Err(e) = self.synthesizer.speak(&reply) {
            warn!("Speech synthesis failed: {}", e);
            self.view.show_error(&e.to_string());
        }

        self.refresh_history().await;
        Ok(reply)
    }

    pub async fn refresh_history(&mut self) {
        match self.backend.history().await {
            Ok(exchanges) => self.view.show_history(&exchanges),
            Err(e) => {
                warn!("Failed to load history: {}", e);
                self.view.show_error(&e.to_string());
            }
        }
    }
}

/// A running capture.
///
/// If the listening future is dropped before the stream settles, the drop
/// stops capture and puts the controller back to Idle.
struct ListenSession<'a, C: SpeechCapture, V: ChatView> {
    capture: &'a mut C,
    view: &'a mut V,
    state: &'a mut MicState,
    open: bool,
}

impl<'a, C: SpeechCapture, V: ChatView> ListenSession<'a, C, V> {
    fn begin(capture: &'a mut C, view: &'a mut V, state: &'a mut MicState) -> Self {
        *state = MicState::Listening;
        view.show_state(MicState::Listening);
        Self {
            capture,
            view,
            state,
            open: true,
        }
    }

    fn close(&mut self) {
        if self.open {
            self.capture.stop();
            self.open = false;
        }
    }

    fn end(&mut self, state: MicState) {
        self.close();
        *self.state = state;
        self.view.show_state(state);
    }
}

impl<'a, C: SpeechCapture, V: ChatView> Drop for ListenSession<'a, C, V> {
    fn drop(&mut self) {
        if self.open {
            debug!("Listen cancelled, stopping capture");
            self.end(MicState::Idle);
        }
    }
}
