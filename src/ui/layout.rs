use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatLayout {
    pub header: Rect,
    pub history: Rect,
    pub choices: Rect,
    pub input: Rect,
}

/// Header row, history, suggested-choices row(s), input pane.
pub fn split_chat_layout(area: Rect, choice_rows: u16, input_rows: u16) -> ChatLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(choice_rows),
            Constraint::Length(input_rows.max(1)),
        ])
        .split(area);

    ChatLayout {
        header: chunks[0],
        history: chunks[1],
        choices: chunks[2],
        input: chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_splits_into_four_panes() {
        let area = Rect::new(0, 0, 80, 20);
        let panes = split_chat_layout(area, 2, 3);

        assert_eq!(panes.header.height, 1);
        assert_eq!(panes.history.height, 14);
        assert_eq!(panes.choices.height, 2);
        assert_eq!(panes.input.height, 3);
        assert_eq!(panes.history.y, 1);
        assert_eq!(panes.choices.y, 15);
        assert_eq!(panes.input.y, 17);
    }

    #[test]
    fn layout_collapses_empty_choice_row() {
        let area = Rect::new(0, 0, 80, 12);
        let panes = split_chat_layout(area, 0, 0);

        assert_eq!(panes.choices.height, 0);
        assert_eq!(panes.input.height, 1);
        assert_eq!(panes.history.height, 10);
    }
}
