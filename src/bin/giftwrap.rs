use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use giftwrap::api::ApiClient;
use giftwrap::app::{build_runtime, TuiMode};
use giftwrap::config::{Config, Persona};
use giftwrap::export::{write_transcript_html, DEFAULT_EXPORT_PATH};
use giftwrap::logging::init_tracing;
use giftwrap::runtime::frontend::{FrontendAdapter, HistoryViewport, ScrollAction, UserInputEvent};
use giftwrap::runtime::mode::RuntimeMode;
use giftwrap::state::ConversationManager;
use giftwrap::terminal;
use giftwrap::ui::layout::split_chat_layout;
use giftwrap::ui::render::{
    choice_rows, input_visual_rows, render_choices, render_input, render_messages,
    render_status_line,
};
use ratatui::widgets::Clear;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const MAX_INPUT_PANE_ROWS: usize = 6;

/// Input line editor. Owns the buffer and cursor and turns key presses into
/// runtime events.
#[derive(Default)]
struct InputEditor {
    buffer: String,
    cursor: usize,
    starter_index: usize,
}

impl InputEditor {
    fn clamp_cursor_to_boundary_left(&self, mut idx: usize) -> usize {
        idx = idx.min(self.buffer.len());
        while idx > 0 && !self.buffer.is_char_boundary(idx) {
            idx -= 1;
        }
        idx
    }

    fn prev_char_boundary(&self, idx: usize) -> usize {
        let i = self.clamp_cursor_to_boundary_left(idx);
        if i == 0 {
            return 0;
        }
        let mut j = i - 1;
        while j > 0 && !self.buffer.is_char_boundary(j) {
            j -= 1;
        }
        j
    }

    fn next_char_boundary(&self, idx: usize) -> usize {
        let i = self.clamp_cursor_to_boundary_left(idx);
        if i >= self.buffer.len() {
            return self.buffer.len();
        }
        match self.buffer[i..].chars().next() {
            Some(ch) => i + ch.len_utf8(),
            None => self.buffer.len(),
        }
    }

    fn insert_str(&mut self, value: &str) {
        let cursor = self.clamp_cursor_to_boundary_left(self.cursor);
        self.buffer.insert_str(cursor, value);
        self.cursor = cursor + value.len();
    }

    fn backspace(&mut self) -> bool {
        let end = self.clamp_cursor_to_boundary_left(self.cursor);
        if end == 0 {
            return false;
        }
        let start = self.prev_char_boundary(end);
        self.buffer.replace_range(start..end, "");
        self.cursor = start;
        true
    }

    fn delete(&mut self) -> bool {
        let start = self.clamp_cursor_to_boundary_left(self.cursor);
        if start >= self.buffer.len() {
            return false;
        }
        let end = self.next_char_boundary(start);
        self.buffer.replace_range(start..end, "");
        self.cursor = start;
        true
    }

    fn replace(&mut self, value: &str) {
        self.buffer = value.to_string();
        self.cursor = self.buffer.len();
    }

    fn submit(&mut self) -> Option<String> {
        let value = self.buffer.trim().to_string();
        if value.is_empty() {
            return None;
        }
        self.buffer.clear();
        self.cursor = 0;
        Some(value)
    }

    fn next_starter(&mut self, starters: &[String]) -> bool {
        if starters.is_empty() {
            return false;
        }
        let prompt = &starters[self.starter_index % starters.len()];
        self.starter_index = self.starter_index.wrapping_add(1);
        self.replace(prompt);
        true
    }

    fn paste(&mut self, text: &str, busy: bool) -> Option<UserInputEvent> {
        if busy || text.is_empty() {
            return None;
        }
        self.insert_str(&text.replace("\r\n", "\n"));
        Some(UserInputEvent::Edited)
    }

    fn apply_key(
        &mut self,
        key: KeyEvent,
        busy: bool,
        starters: &[String],
        viewport: HistoryViewport,
    ) -> Option<UserInputEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let scroll = |action| Some(UserInputEvent::Scroll { action, viewport });
        let page = viewport.height.saturating_sub(1).max(1);

        match key.code {
            KeyCode::Char('c') if ctrl => return Some(UserInputEvent::Interrupt),
            KeyCode::Char('d') if ctrl => {
                return self
                    .buffer
                    .is_empty()
                    .then(|| UserInputEvent::Text("/quit".to_string()));
            }
            KeyCode::Char('l') if ctrl => return Some(UserInputEvent::Text("/clear".to_string())),
            KeyCode::F(1) => return Some(UserInputEvent::Text("/help".to_string())),
            KeyCode::PageUp => return scroll(ScrollAction::PageUp(page)),
            KeyCode::PageDown => return scroll(ScrollAction::PageDown(page)),
            KeyCode::Up => return scroll(ScrollAction::LineUp),
            KeyCode::Down => return scroll(ScrollAction::LineDown),
            KeyCode::Home if ctrl => return scroll(ScrollAction::Home),
            KeyCode::End if ctrl => return scroll(ScrollAction::End),
            _ => {}
        }

        if busy {
            return None;
        }

        let edited = match key.code {
            KeyCode::F(2) => return Some(UserInputEvent::Text("/tips".to_string())),
            KeyCode::F(3) => return Some(UserInputEvent::Text("/inspire".to_string())),
            KeyCode::Char(ch @ '1'..='9') if alt => {
                return Some(UserInputEvent::Choice(ch as usize - '1' as usize));
            }
            KeyCode::Char('j') if ctrl => {
                self.insert_str("\n");
                true
            }
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.insert_str("\n");
                true
            }
            KeyCode::Enter => return self.submit().map(UserInputEvent::Text),
            KeyCode::Tab => self.next_starter(starters),
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.buffer.len();
                false
            }
            KeyCode::Left => {
                self.cursor = self.prev_char_boundary(self.cursor);
                false
            }
            KeyCode::Right => {
                self.cursor = self.next_char_boundary(self.cursor);
                false
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char(ch) if !ctrl && !alt => {
                self.insert_str(&ch.to_string());
                true
            }
            _ => false,
        };

        edited.then_some(UserInputEvent::Edited)
    }
}

struct ManagedTuiFrontend {
    terminal: terminal::TerminalType,
    quit: bool,
    editor: InputEditor,
    history_viewport: HistoryViewport,
}

impl ManagedTuiFrontend {
    fn new() -> Result<Self> {
        let terminal = terminal::setup()?;
        Ok(Self {
            terminal,
            quit: false,
            editor: InputEditor::default(),
            history_viewport: HistoryViewport {
                width: 80,
                height: 20,
            },
        })
    }
}

impl Drop for ManagedTuiFrontend {
    fn drop(&mut self) {
        let _ = terminal::restore();
    }
}

impl FrontendAdapter<TuiMode> for ManagedTuiFrontend {
    fn poll_user_input(&mut self, mode: &TuiMode) -> Option<UserInputEvent> {
        if mode.quit_requested() {
            self.quit = true;
            return None;
        }

        let Ok(has_event) = event::poll(Duration::from_millis(16)) else {
            self.quit = true;
            return None;
        };
        if !has_event {
            return None;
        }

        let Ok(ev) = event::read() else {
            self.quit = true;
            return None;
        };

        let busy = mode.is_awaiting_reply();
        match ev {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return None;
                }
                self.editor
                    .apply_key(key, busy, mode.starter_prompts(), self.history_viewport)
            }
            Event::Paste(text) => self.editor.paste(&text, busy),
            _ => None,
        }
    }

    fn render(&mut self, mode: &TuiMode) {
        if mode.quit_requested() {
            self.quit = true;
        }
        let status = mode.status_line();
        let placeholder = mode.input_placeholder();
        let input = self.editor.buffer.as_str();
        let cursor = self.editor.cursor;
        let mut viewport = self.history_viewport;

        let _ = self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(Clear, area);
            let input_width = area.width.saturating_sub(2).max(1) as usize;
            let input_rows =
                input_visual_rows(input, input_width).clamp(1, MAX_INPUT_PANE_ROWS) as u16;
            let choices_height = choice_rows(mode.choices(), area.width as usize);
            let panes = split_chat_layout(area, choices_height, input_rows);

            render_status_line(frame, panes.header, &status);
            render_messages(
                frame,
                panes.history,
                mode.history_lines(),
                mode.history_scroll_from_bottom(),
            );
            render_choices(frame, panes.choices, mode.choices());
            render_input(frame, panes.input, input, cursor, placeholder.as_deref());

            viewport = HistoryViewport {
                width: panes.history.width as usize,
                height: panes.history.height as usize,
            };
        });
        self.history_viewport = viewport;
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

fn print_choices(out: &mut impl Write, choices: &[String]) -> Result<()> {
    if choices.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = choices
        .iter()
        .enumerate()
        .map(|(index, choice)| format!("[{}] {choice}", index + 1))
        .collect();
    writeln!(out, "{}", listed.join("  "))?;
    Ok(())
}

/// Plain stdin/stdout conversation for pipes and scripts. A line holding
/// only a choice number selects that choice.
async fn run_line_mode(config: Config) -> Result<()> {
    let persona = config.persona.clone();
    let client = ApiClient::new(&config)?;
    let mut conversation = ConversationManager::new(client, &persona);
    let stdin = BufReader::new(tokio::io::stdin());
    run_line_session(&mut conversation, &persona, stdin, &mut std::io::stdout()).await
}

/// Reads one message per line from `input` and writes replies to `out`.
async fn run_line_session<R, W>(
    conversation: &mut ConversationManager,
    persona: &Persona,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Some(greeting) = &persona.greeting {
        writeln!(out, "{}: {greeting}", persona.name)?;
    }
    print_choices(out, conversation.choices())?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));
        let reply = match command {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                conversation.reset();
                writeln!(out, "(conversation cleared)")?;
                print_choices(out, conversation.choices())?;
                continue;
            }
            "/export" => {
                let path = match argument.trim() {
                    "" => DEFAULT_EXPORT_PATH,
                    path => path,
                };
                match write_transcript_html(Path::new(path), conversation.transcript(), &persona.name)
                {
                    Ok(()) => writeln!(out, "(transcript saved to {path})")?,
                    Err(err) => {
                        tracing::warn!(error = %err, "transcript export failed");
                        writeln!(out, "(export failed: {err:#})")?;
                    }
                }
                out.flush()?;
                continue;
            }
            "/tips" => conversation.submit_user_text(&persona.tips_prompt).await,
            "/inspire" => conversation.submit_user_text(&persona.inspiration_prompt).await,
            _ => match line.parse::<usize>() {
                Ok(number) if (1..=conversation.choices().len()).contains(&number) => {
                    let choice = conversation.choices()[number - 1].clone();
                    conversation.select_choice(&choice).await
                }
                _ => conversation.submit_user_text(line).await,
            },
        };

        if let Some(reply) = reply {
            writeln!(out, "{}: {}", persona.name, reply.text())?;
        }
        print_choices(out, conversation.choices())?;
        out.flush()?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let config = Config::load()?;
    config.validate()?;
    tracing::info!(
        model = %config.model,
        local = config.is_local_endpoint(),
        "starting giftwrap"
    );

    if !terminal::is_interactive() {
        return run_line_mode(config).await;
    }

    let (mut runtime, mut ctx) = build_runtime(config)?;
    let mut frontend = ManagedTuiFrontend::new()?;
    runtime.run(&mut frontend, &mut ctx).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use giftwrap::api::MockApiClient;
    use giftwrap::types::Turn;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn viewport() -> HistoryViewport {
        HistoryViewport {
            width: 80,
            height: 10,
        }
    }

    fn type_text(editor: &mut InputEditor, text: &str) {
        for ch in text.chars() {
            editor.apply_key(key(KeyCode::Char(ch), KeyModifiers::NONE), false, &[], viewport());
        }
    }

    #[test]
    fn test_enter_submits_trimmed_buffer() {
        let mut editor = InputEditor::default();
        type_text(&mut editor, " a mug ");

        let event = editor.apply_key(key(KeyCode::Enter, KeyModifiers::NONE), false, &[], viewport());
        assert_eq!(event, Some(UserInputEvent::Text("a mug".to_string())));
        assert!(editor.buffer.is_empty());
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut editor = InputEditor::default();
        type_text(&mut editor, "a");
        let event = editor.apply_key(key(KeyCode::Enter, KeyModifiers::SHIFT), false, &[], viewport());
        assert_eq!(event, Some(UserInputEvent::Edited));
        assert_eq!(editor.buffer, "a\n");
    }

    #[test]
    fn test_alt_digit_selects_choice() {
        let mut editor = InputEditor::default();
        let event = editor.apply_key(key(KeyCode::Char('3'), KeyModifiers::ALT), false, &[], viewport());
        assert_eq!(event, Some(UserInputEvent::Choice(2)));
    }

    #[test]
    fn test_busy_editor_ignores_typing_but_scrolls() {
        let mut editor = InputEditor::default();
        let typed = editor.apply_key(key(KeyCode::Char('x'), KeyModifiers::NONE), true, &[], viewport());
        assert_eq!(typed, None);
        assert!(editor.buffer.is_empty());

        let scrolled = editor.apply_key(key(KeyCode::PageUp, KeyModifiers::NONE), true, &[], viewport());
        assert_eq!(
            scrolled,
            Some(UserInputEvent::Scroll {
                action: ScrollAction::PageUp(9),
                viewport: viewport(),
            })
        );
    }

    #[test]
    fn test_tab_cycles_starter_prompts() {
        let starters = vec!["first".to_string(), "second".to_string()];
        let mut editor = InputEditor::default();

        editor.apply_key(key(KeyCode::Tab, KeyModifiers::NONE), false, &starters, viewport());
        assert_eq!(editor.buffer, "first");
        editor.apply_key(key(KeyCode::Tab, KeyModifiers::NONE), false, &starters, viewport());
        assert_eq!(editor.buffer, "second");
        editor.apply_key(key(KeyCode::Tab, KeyModifiers::NONE), false, &starters, viewport());
        assert_eq!(editor.buffer, "first");
    }

    #[test]
    fn test_shortcut_keys_map_to_commands() {
        let mut editor = InputEditor::default();
        let cases = [
            (key(KeyCode::F(2), KeyModifiers::NONE), "/tips"),
            (key(KeyCode::F(3), KeyModifiers::NONE), "/inspire"),
            (key(KeyCode::Char('l'), KeyModifiers::CONTROL), "/clear"),
            (key(KeyCode::Char('d'), KeyModifiers::CONTROL), "/quit"),
        ];
        for (pressed, command) in cases {
            assert_eq!(
                editor.apply_key(pressed, false, &[], viewport()),
                Some(UserInputEvent::Text(command.to_string()))
            );
        }
    }

    #[test]
    fn test_ctrl_d_with_text_does_not_quit() {
        let mut editor = InputEditor::default();
        type_text(&mut editor, "hi");
        let event = editor.apply_key(key(KeyCode::Char('d'), KeyModifiers::CONTROL), false, &[], viewport());
        assert_eq!(event, None);
    }

    #[test]
    fn test_backspace_respects_multibyte_chars() {
        let mut editor = InputEditor::default();
        type_text(&mut editor, "🎁x");
        editor.apply_key(key(KeyCode::Backspace, KeyModifiers::NONE), false, &[], viewport());
        editor.apply_key(key(KeyCode::Backspace, KeyModifiers::NONE), false, &[], viewport());
        assert!(editor.buffer.is_empty());
        assert_eq!(editor.cursor, 0);
    }

    #[test]
    fn test_print_choices_numbers_entries() {
        let mut out = Vec::new();
        print_choices(&mut out, &["Mom".to_string(), "Dad".to_string()]).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "[1] Mom  [2] Dad\n");
    }

    async fn run_lines(client: &MockApiClient, input: &str) -> (ConversationManager, String) {
        let persona = Persona::default();
        let mut conversation = ConversationManager::new(client.clone(), &persona);
        let mut out = Vec::new();
        run_line_session(&mut conversation, &persona, input.as_bytes(), &mut out)
            .await
            .expect("line session");
        (conversation, String::from_utf8(out).expect("utf8"))
    }

    #[tokio::test]
    async fn test_line_mode_failed_export_keeps_session_running() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("missing").join("chat.html");
        let client = MockApiClient::replying(&["Lovely, who is it for?"]);

        let input = format!("/export {}\nA scarf\n", target.display());
        let (conversation, output) = run_lines(&client, &input).await;

        assert!(output.contains("(export failed:"));
        assert!(output.contains("GiftWrap Genius: Lovely, who is it for?"));
        assert_eq!(conversation.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_line_mode_number_selects_offered_choice() {
        let client = MockApiClient::replying(&["Books are easy!\nChoices: Classic | Fun"]);

        let (conversation, output) = run_lines(&client, "2\n").await;

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].last().map(Turn::text), Some("Clothes / Fabric"));
        assert_eq!(conversation.choices(), ["Classic", "Fun"]);
        assert!(output.ends_with("[1] Classic  [2] Fun\n"));
    }

    #[tokio::test]
    async fn test_line_mode_out_of_range_number_is_sent_as_text() {
        let client = MockApiClient::replying(&["Nine what?"]);

        run_lines(&client, "9\n/quit\nignored\n").await;

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].last().map(Turn::text), Some("9"));
    }
}
