use crate::api::ApiClient;
use crate::config::{Config, Persona};
use crate::export::{write_transcript_html, DEFAULT_EXPORT_PATH};
use crate::runtime::context::RuntimeContext;
use crate::runtime::frontend::{HistoryViewport, ScrollAction, UserInputEvent};
use crate::runtime::mode::RuntimeMode;
use crate::runtime::r#loop::Runtime;
use crate::runtime::UiUpdate;
use crate::state::ConversationManager;
use crate::types::Turn;
use crate::ui::render::history_visual_rows;
use crate::ui::transcript::turn_lines;
use anyhow::Result;
use ratatui::text::Line;
use std::path::Path;
use tokio::sync::mpsc;

const HELP_TEXT: &str = "Enter send | Shift+Enter newline | Alt+1..9 pick choice | Tab starter prompt | F2 tips | F3 inspiration | Ctrl+L clear | /export [path] | Ctrl+C quit";
const IDLE_HINT: &str = "/help for keys";

#[derive(Default)]
struct HistoryState {
    lines: Vec<Line<'static>>,
    rendered_turns: usize,
    epoch: u64,
    scroll_from_bottom: usize,
}

/// Terminal view of one conversation.
///
/// Holds a rendered copy of the transcript that is brought up to date with
/// [`TuiMode::sync`] after every manager call.
pub struct TuiMode {
    persona: Persona,
    history_state: HistoryState,
    choices: Vec<String>,
    awaiting_reply: bool,
    status_note: Option<String>,
    quit_requested: bool,
}

impl TuiMode {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            history_state: HistoryState::default(),
            choices: Vec::new(),
            awaiting_reply: false,
            status_note: None,
            quit_requested: false,
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.persona.name
    }

    pub fn starter_prompts(&self) -> &[String] {
        &self.persona.starter_prompts
    }

    pub fn history_lines(&self) -> &[Line<'static>] {
        &self.history_state.lines
    }

    pub fn history_scroll_from_bottom(&self) -> usize {
        self.history_state.scroll_from_bottom
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Shown in place of the input while a reply is pending.
    pub fn input_placeholder(&self) -> Option<String> {
        self.awaiting_reply
            .then(|| format!("{} is typing...", self.persona.name))
    }

    pub fn status_line(&self) -> String {
        let state = if self.awaiting_reply { "thinking" } else { "ready" };
        let view = if self.history_state.scroll_from_bottom > 0 {
            "view:scrolled"
        } else {
            "view:following"
        };
        let note = self.status_note.as_deref().unwrap_or(IDLE_HINT);
        format!("{} | {state} | {view} | {note}", self.persona.name)
    }

    /// Brings the rendered history up to date. Turns already rendered are
    /// kept; a reset starts over.
    pub fn sync(&mut self, conversation: &ConversationManager) {
        let transcript = conversation.transcript();
        if conversation.epoch() != self.history_state.epoch
            || transcript.len() < self.history_state.rendered_turns
        {
            self.history_state = HistoryState {
                epoch: conversation.epoch(),
                ..HistoryState::default()
            };
        }

        let fresh = &transcript[self.history_state.rendered_turns..];
        if !fresh.is_empty() {
            for turn in fresh {
                self.history_state
                    .lines
                    .extend(turn_lines(turn, &self.persona.name));
            }
            self.history_state.rendered_turns = transcript.len();
            self.history_state.scroll_from_bottom = 0;
        }

        self.choices = conversation.choices().to_vec();
        self.awaiting_reply = conversation.is_awaiting_reply();
    }

    fn submit(&mut self, text: &str, ctx: &mut RuntimeContext) {
        if ctx.submit_text(text) {
            self.status_note = None;
        } else if ctx.conversation.is_awaiting_reply() {
            self.status_note = Some("still waiting for the last reply".to_string());
        }
    }

    fn handle_command(&mut self, line: &str, ctx: &mut RuntimeContext) {
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "/clear" => {
                ctx.conversation.reset();
                self.status_note = Some("conversation cleared".to_string());
            }
            "/tips" => {
                let prompt = self.persona.tips_prompt.clone();
                self.submit(&prompt, ctx);
            }
            "/inspire" => {
                let prompt = self.persona.inspiration_prompt.clone();
                self.submit(&prompt, ctx);
            }
            "/export" => {
                let path = if argument.is_empty() {
                    DEFAULT_EXPORT_PATH
                } else {
                    argument
                };
                self.export(Path::new(path), ctx);
            }
            "/help" => self.status_note = Some(HELP_TEXT.to_string()),
            "/quit" | "/exit" => self.quit_requested = true,
            other => self.status_note = Some(format!("unknown command {other}, try /help")),
        }
    }

    fn export(&mut self, path: &Path, ctx: &RuntimeContext) {
        let note = match write_transcript_html(path, ctx.conversation.transcript(), &self.persona.name) {
            Ok(()) => format!("transcript saved to {}", path.display()),
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "export failed");
                format!("export failed: {error:#}")
            }
        };
        self.status_note = Some(note);
    }

    fn apply_scroll(&mut self, action: ScrollAction, viewport: HistoryViewport) {
        let max = history_visual_rows(&self.history_state.lines, viewport.width)
            .saturating_sub(viewport.height);
        let current = self.history_state.scroll_from_bottom.min(max);
        self.history_state.scroll_from_bottom = match action {
            ScrollAction::LineUp => current.saturating_add(1),
            ScrollAction::LineDown => current.saturating_sub(1),
            ScrollAction::PageUp(step) => current.saturating_add(step.max(1)),
            ScrollAction::PageDown(step) => current.saturating_sub(step.max(1)),
            ScrollAction::Home => max,
            ScrollAction::End => 0,
        }
        .min(max);
    }
}

impl RuntimeMode for TuiMode {
    fn on_submit(&mut self, input: String, ctx: &mut RuntimeContext) {
        let input = input.trim();
        if input.starts_with('/') {
            self.handle_command(input, ctx);
        } else {
            self.submit(input, ctx);
        }
        self.sync(&ctx.conversation);
    }

    fn on_choice(&mut self, index: usize, ctx: &mut RuntimeContext) {
        if let Some(choice) = self.choices.get(index).cloned() {
            if ctx.submit_choice(&choice) {
                self.status_note = None;
            }
        }
        self.sync(&ctx.conversation);
    }

    fn on_turn_settled(&mut self, epoch: u64, turn: Turn, ctx: &mut RuntimeContext) {
        if ctx.conversation.complete_turn(epoch, turn).is_none() {
            tracing::debug!(epoch, "reply arrived after reset");
        }
        self.sync(&ctx.conversation);
    }

    fn on_interrupt(&mut self, _ctx: &mut RuntimeContext) {
        self.quit_requested = true;
    }

    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext) {
        match event {
            UserInputEvent::Text(input) => return self.on_submit(input, ctx),
            UserInputEvent::Choice(index) => return self.on_choice(index, ctx),
            UserInputEvent::Interrupt => return self.on_interrupt(ctx),
            UserInputEvent::Edited => ctx.conversation.note_typing(),
            UserInputEvent::Scroll { action, viewport } => self.apply_scroll(action, viewport),
        }
        self.sync(&ctx.conversation);
    }

    fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }
}

pub fn build_runtime(config: Config) -> Result<(Runtime<TuiMode>, RuntimeContext)> {
    let client = ApiClient::new(&config)?;
    let conversation = ConversationManager::new(client, &config.persona);

    let (update_tx, update_rx) = mpsc::unbounded_channel::<UiUpdate>();
    let ctx = RuntimeContext::new(conversation, update_tx);

    let mut mode = TuiMode::new(config.persona);
    mode.sync(&ctx.conversation);
    let runtime = Runtime::new(mode, update_rx);
    Ok((runtime, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClient;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup(client: MockApiClient) -> (TuiMode, RuntimeContext) {
        let (tx, _rx) = mpsc::unbounded_channel::<UiUpdate>();
        let persona = Persona::default();
        let conversation = ConversationManager::with_seed(
            Arc::new(client),
            persona.greeting.clone(),
            persona.initial_choices.clone(),
        );
        let ctx = RuntimeContext::new(conversation, tx);
        let mut mode = TuiMode::new(persona);
        mode.sync(&ctx.conversation);
        (mode, ctx)
    }

    fn viewport() -> HistoryViewport {
        HistoryViewport {
            width: 80,
            height: 4,
        }
    }

    #[test]
    fn test_initial_sync_renders_greeting_and_choices() {
        let (mode, _ctx) = setup(MockApiClient::default());

        assert!(!mode.history_lines().is_empty());
        assert_eq!(mode.choices().len(), 5);
        assert!(mode.status_line().contains("ready"));
        assert!(mode.input_placeholder().is_none());
    }

    #[tokio::test]
    async fn test_submit_locks_and_settled_reply_unlocks() {
        let (mut mode, mut ctx) = setup(MockApiClient::replying(&["Got it!"]));
        let before = mode.history_lines().len();

        mode.on_submit("gift for mom".to_string(), &mut ctx);
        assert!(mode.is_awaiting_reply());
        assert!(mode.choices().is_empty());
        assert!(mode.input_placeholder().is_some());
        assert!(mode.history_lines().len() > before);

        mode.on_turn_settled(0, Turn::assistant("Got it!"), &mut ctx);
        assert!(!mode.is_awaiting_reply());
        assert_eq!(
            ctx.conversation.transcript().last(),
            Some(&Turn::assistant("Got it!"))
        );
    }

    #[tokio::test]
    async fn test_second_submit_while_busy_sets_note() {
        let (mut mode, mut ctx) = setup(MockApiClient::replying(&["one"]));

        mode.on_submit("first".to_string(), &mut ctx);
        mode.on_submit("second".to_string(), &mut ctx);

        assert!(mode.status_line().contains("still waiting"));
        assert_eq!(ctx.conversation.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_command_discards_late_reply() {
        let (mut mode, mut ctx) = setup(MockApiClient::replying(&["late"]));
        let seeded_lines = mode.history_lines().len();

        mode.on_submit("a scarf".to_string(), &mut ctx);
        mode.on_submit("/clear".to_string(), &mut ctx);
        assert!(!mode.is_awaiting_reply());
        assert_eq!(mode.history_lines().len(), seeded_lines);

        mode.on_turn_settled(0, Turn::assistant("late"), &mut ctx);
        assert_eq!(ctx.conversation.transcript().len(), 1);
        assert_eq!(mode.history_lines().len(), seeded_lines);
    }

    #[tokio::test]
    async fn test_choice_event_submits_choice_text() {
        let (mut mode, mut ctx) = setup(MockApiClient::replying(&["Nice"]));
        let expected = mode.choices()[1].clone();

        mode.on_frontend_event(UserInputEvent::Choice(1), &mut ctx);

        assert!(mode.is_awaiting_reply());
        assert_eq!(
            ctx.conversation.transcript().last(),
            Some(&Turn::user(expected))
        );
    }

    #[test]
    fn test_out_of_range_choice_is_ignored() {
        let (mut mode, mut ctx) = setup(MockApiClient::default());
        mode.on_frontend_event(UserInputEvent::Choice(42), &mut ctx);
        assert!(!mode.is_awaiting_reply());
    }

    #[test]
    fn test_edit_event_hides_choices() {
        let (mut mode, mut ctx) = setup(MockApiClient::default());
        mode.on_frontend_event(UserInputEvent::Edited, &mut ctx);
        assert!(mode.choices().is_empty());
    }

    #[tokio::test]
    async fn test_tips_command_submits_tips_prompt() {
        let (mut mode, mut ctx) = setup(MockApiClient::replying(&["Tips!"]));
        mode.on_submit("/tips".to_string(), &mut ctx);

        let tips = Persona::default().tips_prompt;
        assert_eq!(
            ctx.conversation.transcript().last(),
            Some(&Turn::user(tips))
        );
    }

    #[test]
    fn test_export_command_writes_file() {
        let (mut mode, mut ctx) = setup(MockApiClient::default());
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("out.html");

        mode.on_submit(format!("/export {}", path.display()), &mut ctx);

        assert!(path.exists());
        assert!(mode.status_line().contains("transcript saved"));
    }

    #[test]
    fn test_unknown_and_quit_commands() {
        let (mut mode, mut ctx) = setup(MockApiClient::default());

        mode.on_submit("/bogus".to_string(), &mut ctx);
        assert!(mode.status_line().contains("unknown command /bogus"));
        assert!(!mode.quit_requested());

        mode.on_submit("/quit".to_string(), &mut ctx);
        assert!(mode.quit_requested());
    }

    #[test]
    fn test_scroll_is_clamped_to_history() {
        let (mut mode, mut ctx) = setup(MockApiClient::default());
        let total = history_visual_rows(mode.history_lines(), 80);
        let max = total.saturating_sub(4);

        mode.on_frontend_event(
            UserInputEvent::Scroll {
                action: ScrollAction::PageUp(1000),
                viewport: viewport(),
            },
            &mut ctx,
        );
        assert_eq!(mode.history_scroll_from_bottom(), max);

        mode.on_frontend_event(
            UserInputEvent::Scroll {
                action: ScrollAction::End,
                viewport: viewport(),
            },
            &mut ctx,
        );
        assert_eq!(mode.history_scroll_from_bottom(), 0);
    }

    #[test]
    fn test_interrupt_requests_quit() {
        let (mut mode, mut ctx) = setup(MockApiClient::default());
        mode.on_interrupt(&mut ctx);
        assert!(mode.quit_requested());
    }
}
