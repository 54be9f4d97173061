//! Console stand-ins for the host capabilities: stdin lines act as final
//! transcripts, stdout acts as speaker and display.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use vocalis_types::Exchange;

use crate::capture::{SpeechCapture, TranscriptEvent, TranscriptStream};
use crate::controller::MicState;
use crate::error::{CaptureError, ClientError, Result};
use crate::synthesis::SpeechSynthesizer;
use crate::view::ChatView;

/// Reads one line of stdin per `start()`.
pub struct StdinCapture {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
    exhausted: Arc<AtomicBool>,
}

impl StdinCapture {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
            exhausted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True once stdin reached EOF
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::SeqCst)
    }
}

impl Default for StdinCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechCapture for StdinCapture {
    fn start(&mut self) -> std::result::Result<TranscriptStream, CaptureError> {
        if self.is_exhausted() {
            return Err(CaptureError::Unavailable("stdin closed".to_string()));
        }

        let lines = Arc::clone(&self.lines);
        let exhausted = Arc::clone(&self.exhausted);

        let event = async move {
            match lines.lock().await.next_line().await {
                Ok(Some(line)) => TranscriptEvent::Final(line),
                Ok(None) => {
                    exhausted.store(true, Ordering::SeqCst);
                    TranscriptEvent::Ended
                }
                Err(e) => {
                    exhausted.store(true, Ordering::SeqCst);
                    TranscriptEvent::Error(CaptureError::Failed(e.to_string()))
                }
            }
        };

        Ok(Box::pin(futures::stream::once(event)))
    }

    fn stop(&mut self) {}
}

/// "Speaks" by printing to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSynthesizer;

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&mut self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "🔊 {}", text).map_err(|e| ClientError::Synthesis(e.to_string()))
    }

    // Printing is instantaneous; nothing to silence.
    fn cancel(&mut self) {}
}

#[derive(Debug, Default)]
pub struct ConsoleView;

impl ChatView for ConsoleView {
    fn show_state(&mut self, state: MicState) {
        tracing::debug!(?state, "Mic state");
        if state == MicState::Listening {
            print!("you> ");
            let _ = std::io::stdout().flush();
        }
    }

    fn show_transcript(&mut self, _text: &str, _is_final: bool) {}

    fn show_reply(&mut self, reply: &str) {
        println!("assistant> {}", reply);
    }

    fn show_history(&mut self, exchanges: &[Exchange]) {
        tracing::debug!(count = exchanges.len(), "History refreshed");
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("error: {}", message);
    }
}
