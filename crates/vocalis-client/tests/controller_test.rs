//! State machine tests for `VoiceController` with scripted capabilities.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;

use vocalis_client::{
    CaptureError, ChatBackend, ChatView, ClientError, MicState, SpeechCapture,
    SpeechSynthesizer, TranscriptEvent, TranscriptStream, VoiceController,
};
use vocalis_types::Exchange;

type Log = Arc<Mutex<Vec<String>>>;

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn count(log: &Log, prefix: &str) -> usize {
    entries(log).iter().filter(|e| e.starts_with(prefix)).count()
}

struct ScriptedCapture {
    sessions: VecDeque<TranscriptStream>,
    log: Log,
}

impl SpeechCapture for ScriptedCapture {
    fn start(&mut self) -> Result<TranscriptStream, CaptureError> {
        self.log.lock().unwrap().push("capture:start".to_string());
        self.sessions
            .pop_front()
            .ok_or(CaptureError::PermissionDenied)
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push("capture:stop".to_string());
    }
}

struct RecordingSynth {
    log: Log,
}

impl SpeechSynthesizer for RecordingSynth {
    fn speak(&mut self, text: &str) -> vocalis_client::error::Result<()> {
        self.log.lock().unwrap().push(format!("synth:speak:{}", text));
        Ok(())
    }

    fn cancel(&mut self) {
        self.log.lock().unwrap().push("synth:cancel".to_string());
    }
}

struct FakeBackend {
    fail: bool,
    log: Log,
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn process(&self, text: &str) -> vocalis_client::error::Result<String> {
        self.log.lock().unwrap().push(format!("backend:process:{}", text));
        if self.fail {
            return Err(ClientError::Server {
                status: 500,
                message: "Storage error".to_string(),
            });
        }
        Ok(format!("echo {}", text))
    }

    async fn history(&self) -> vocalis_client::error::Result<Vec<Exchange>> {
        self.log.lock().unwrap().push("backend:history".to_string());
        Ok(Vec::new())
    }
}

struct RecordingView {
    log: Log,
}

impl ChatView for RecordingView {
    fn show_state(&mut self, state: MicState) {
        self.log.lock().unwrap().push(format!("view:state:{:?}", state));
    }

    fn show_transcript(&mut self, text: &str, is_final: bool) {
        self.log
            .lock()
            .unwrap()
            .push(format!("view:transcript:{}:{}", is_final, text));
    }

    fn show_reply(&mut self, reply: &str) {
        self.log.lock().unwrap().push(format!("view:reply:{}", reply));
    }

    fn show_history(&mut self, exchanges: &[Exchange]) {
        self.log
            .lock()
            .unwrap()
            .push(format!("view:history:{}", exchanges.len()));
    }

    fn show_error(&mut self, message: &str) {
        self.log.lock().unwrap().push(format!("view:error:{}", message));
    }
}

type TestController = VoiceController<ScriptedCapture, RecordingSynth, FakeBackend, RecordingView>;

fn controller(sessions: Vec<Vec<TranscriptEvent>>, fail_backend: bool) -> (TestController, Log) {
    let streams = sessions
        .into_iter()
        .map(|events| Box::pin(stream::iter(events)) as TranscriptStream)
        .collect();
    controller_with_streams(streams, fail_backend)
}

fn controller_with_streams(
    sessions: Vec<TranscriptStream>,
    fail_backend: bool,
) -> (TestController, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let controller = VoiceController::new(
        ScriptedCapture {
            sessions: sessions.into(),
            log: log.clone(),
        },
        RecordingSynth { log: log.clone() },
        FakeBackend {
            fail: fail_backend,
            log: log.clone(),
        },
        RecordingView { log: log.clone() },
    );
    (controller, log)
}

fn interim(text: &str) -> TranscriptEvent {
    TranscriptEvent::Interim(text.to_string())
}

fn final_(text: &str) -> TranscriptEvent {
    TranscriptEvent::Final(text.to_string())
}

#[tokio::test]
async fn test_final_result_triggers_one_round_trip() {
    let (mut controller, log) = controller(
        vec![vec![interim("what"), interim("what time"), final_("what time is it")]],
        false,
    );

    let reply = controller.listen_once().await.unwrap();

    assert_eq!(reply.as_deref(), Some("echo what time is it"));
    assert_eq!(controller.state(), MicState::Idle);
    assert_eq!(count(&log, "backend:process"), 1);
    assert_eq!(count(&log, "view:transcript:false"), 2);
}

#[tokio::test]
async fn test_interim_results_never_reach_backend() {
    let (mut controller, log) = controller(
        vec![vec![interim("tell me"), interim("tell me about"), TranscriptEvent::Ended]],
        false,
    );

    let reply = controller.listen_once().await.unwrap();

    assert!(reply.is_none());
    assert_eq!(controller.state(), MicState::Idle);
    assert_eq!(count(&log, "backend:"), 0);
}

#[tokio::test]
async fn test_reply_ordering() {
    let (mut controller, log) = controller(vec![vec![final_("hello")]], false);

    controller.listen_once().await.unwrap();

    let log = entries(&log);
    let position = |needle: &str| log.iter().position(|e| e == needle).unwrap();

    assert!(position("capture:stop") < position("backend:process:hello"));
    assert!(position("backend:process:hello") < position("view:reply:echo hello"));
    assert!(position("view:reply:echo hello") < position("synth:cancel"));
    assert!(position("synth:cancel") < position("synth:speak:echo hello"));
    assert!(position("synth:speak:echo hello") < position("backend:history"));
    assert!(position("backend:history") < position("view:history:0"));
}

#[tokio::test]
async fn test_blank_final_is_ignored() {
    let (mut controller, log) = controller(vec![vec![final_("   ")]], false);

    let reply = controller.listen_once().await.unwrap();

    assert!(reply.is_none());
    assert_eq!(count(&log, "backend:process"), 0);
    assert_eq!(controller.state(), MicState::Idle);
}

#[tokio::test]
async fn test_only_first_final_is_processed() {
    let (mut controller, log) =
        controller(vec![vec![final_("first"), final_("second")]], false);

    controller.listen_once().await.unwrap();

    assert_eq!(count(&log, "backend:process"), 1);
    assert!(entries(&log).contains(&"backend:process:first".to_string()));
}

#[tokio::test]
async fn test_capture_error_returns_to_idle() {
    let (mut controller, log) = controller(
        vec![
            vec![TranscriptEvent::Error(CaptureError::NoSpeech)],
            vec![final_("hello")],
        ],
        false,
    );

    let err = controller.listen_once().await.unwrap_err();
    assert!(matches!(err, ClientError::Capture(CaptureError::NoSpeech)));
    assert_eq!(controller.state(), MicState::Idle);

    let log_now = entries(&log);
    let error_state = log_now.iter().position(|e| e == "view:state:Error").unwrap();
    let shown = log_now
        .iter()
        .position(|e| e == "view:error:No speech detected")
        .unwrap();
    assert!(error_state < shown);

    // Restart is allowed after an error.
    let reply = controller.listen_once().await.unwrap();
    assert_eq!(reply.as_deref(), Some("echo hello"));
}

#[tokio::test]
async fn test_start_failure_is_reported() {
    let (mut controller, log) = controller(Vec::new(), false);

    let err = controller.listen_once().await.unwrap_err();

    assert!(matches!(err, ClientError::Capture(CaptureError::PermissionDenied)));
    assert_eq!(controller.state(), MicState::Idle);
    assert_eq!(count(&log, "view:error:Microphone access denied"), 1);
}

#[tokio::test]
async fn test_server_error_is_shown_without_retry() {
    let (mut controller, log) = controller(vec![vec![final_("hello")]], true);

    let err = controller.listen_once().await.unwrap_err();

    assert!(matches!(err, ClientError::Server { status: 500, .. }));
    assert_eq!(count(&log, "backend:process"), 1);
    assert_eq!(count(&log, "synth:speak"), 0);
    assert_eq!(count(&log, "view:error:Server error (500): Storage error"), 1);
}

#[tokio::test]
async fn test_cancelled_listen_returns_to_idle() {
    let silent: TranscriptStream = Box::pin(stream::pending::<TranscriptEvent>());
    let spoken: TranscriptStream = Box::pin(stream::iter(vec![final_("hello")]));
    let (mut controller, log) = controller_with_streams(vec![silent, spoken], false);

    let cancelled = tokio::time::timeout(Duration::from_millis(50), controller.listen_once()).await;
    assert!(cancelled.is_err());

    assert_eq!(controller.state(), MicState::Idle);
    assert_eq!(count(&log, "capture:stop"), 1);
    assert_eq!(entries(&log).last().map(String::as_str), Some("view:state:Idle"));

    let reply = controller.listen_once().await.unwrap();
    assert_eq!(reply.as_deref(), Some("echo hello"));
    assert_eq!(count(&log, "capture:start"), 2);
}
