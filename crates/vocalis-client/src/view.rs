use vocalis_types::Exchange;

use crate::controller::MicState;

/// Rendering surface for the controller
///
/// Every call overwrites what was shown before.
pub trait ChatView: Send {
    fn show_state(&mut self, state: MicState);

    fn show_transcript(&mut self, text: &str, is_final: bool);

    fn show_reply(&mut self, reply: &str);

    fn show_history(&mut self, exchanges: &[Exchange]);

    fn show_error(&mut self, message: &str);
}
