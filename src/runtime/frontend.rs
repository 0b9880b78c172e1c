use super::mode::RuntimeMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    LineUp,
    LineDown,
    PageUp(usize),
    PageDown(usize),
    Home,
    End,
}

/// Size of the history pane when a scroll key was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryViewport {
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserInputEvent {
    /// A submitted line: a message or a slash command.
    Text(String),
    /// Zero-based index into the suggested choices.
    Choice(usize),
    /// The input buffer changed.
    Edited,
    Scroll {
        action: ScrollAction,
        viewport: HistoryViewport,
    },
    Interrupt,
}

pub trait FrontendAdapter<M: RuntimeMode> {
    fn poll_user_input(&mut self, mode: &M) -> Option<UserInputEvent>;
    fn render(&mut self, mode: &M);
    fn should_quit(&self) -> bool;
}
