use crate::types::Turn;

use super::context::RuntimeContext;
use super::frontend::UserInputEvent;

/// Chat-session behaviour driven by [`Runtime`](super::r#loop::Runtime).
pub trait RuntimeMode {
    /// A line typed by the user, either a message or a slash command.
    fn on_submit(&mut self, input: String, ctx: &mut RuntimeContext);

    /// The user picked the offered choice at `index`.
    fn on_choice(&mut self, index: usize, ctx: &mut RuntimeContext);

    /// A round-trip finished. `epoch` is the session epoch it was issued in.
    fn on_turn_settled(&mut self, epoch: u64, turn: Turn, ctx: &mut RuntimeContext);

    fn on_interrupt(&mut self, _ctx: &mut RuntimeContext) {}

    /// Editing and scrolling events that do not reach the conversation.
    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext);

    fn is_awaiting_reply(&self) -> bool;
}
