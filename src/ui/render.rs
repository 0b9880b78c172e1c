use crate::ui::input_metrics::{
    char_display_width, cursor_row_col, truncate_to_display_width, wrap_input_lines,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn input_visual_rows(input: &str, width: usize) -> usize {
    wrap_input_lines(input, width).len().max(1)
}

pub fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &str,
    cursor_byte: usize,
    placeholder: Option<&str>,
) {
    if area.height == 0 || area.width <= 2 {
        return;
    }
    let inner = area;
    let style = Style::default()
        .fg(Color::Gray)
        .bg(Color::Rgb(24, 24, 24))
        .add_modifier(Modifier::DIM);

    if let Some(placeholder) = placeholder.filter(|_| input.is_empty()) {
        frame.render_widget(
            Paragraph::new(format!("  {placeholder}"))
                .style(style.add_modifier(Modifier::ITALIC)),
            inner,
        );
        return;
    }

    let input_width = inner.width.saturating_sub(2).max(1) as usize;
    let lines = wrap_input_lines(input, input_width);
    let (cursor_row, cursor_col) = cursor_row_col(input, cursor_byte, input_width);
    let visible_rows = inner.height as usize;
    let window_start = cursor_row.saturating_add(1).saturating_sub(visible_rows);

    let mut rendered = Vec::with_capacity(visible_rows);
    for offset in 0..visible_rows {
        let row_index = window_start + offset;
        let prefix = if row_index == 0 { "> " } else { "  " };
        let line = lines.get(row_index).cloned().unwrap_or_default();
        rendered.push(Line::from(format!("{prefix}{line}")));
    }

    frame.render_widget(
        Paragraph::new(rendered)
            .style(style)
            .wrap(Wrap { trim: false }),
        inner,
    );

    let cursor_y = inner
        .y
        .saturating_add(cursor_row.saturating_sub(window_start) as u16);
    let cursor_x = inner
        .x
        .saturating_add(2 + cursor_col as u16)
        .min(inner.x.saturating_add(inner.width.saturating_sub(1)));
    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Rows the history occupies once wrapped to `width` columns.
pub fn history_visual_rows(lines: &[Line<'_>], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum()
}

/// First visible row for a history viewport scrolled `from_bottom` rows up.
pub fn history_scroll_top(
    lines: &[Line<'_>],
    width: usize,
    height: usize,
    from_bottom: usize,
) -> usize {
    let max_top = history_visual_rows(lines, width).saturating_sub(height);
    max_top.saturating_sub(from_bottom)
}

pub fn render_messages(
    frame: &mut Frame<'_>,
    area: Rect,
    lines: &[Line<'static>],
    scroll_from_bottom: usize,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let top = history_scroll_top(
        lines,
        area.width as usize,
        area.height as usize,
        scroll_from_bottom,
    );

    let paragraph = Paragraph::new(lines.to_vec())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .scroll((top.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

fn choice_spans(choices: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (index, choice) in choices.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("[{}]", index + 1),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            format!(" {choice}"),
            Style::default().fg(Color::LightMagenta),
        ));
    }
    spans
}

/// Rows needed for the choices row; zero when nothing is offered.
pub fn choice_rows(choices: &[String], width: usize) -> u16 {
    if choices.is_empty() {
        return 0;
    }
    let line = Line::from(choice_spans(choices));
    line.width().div_ceil(width.max(1)).clamp(1, 3) as u16
}

pub fn render_choices(frame: &mut Frame<'_>, area: Rect, choices: &[String]) {
    if area.height == 0 || area.width == 0 || choices.is_empty() {
        return;
    }
    frame.render_widget(
        Paragraph::new(Line::from(choice_spans(choices))).wrap(Wrap { trim: true }),
        area,
    );
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let text = truncate_line(status, area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn truncate_line(input: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    let mut used = 0usize;
    let mut truncated = false;

    for ch in input.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > width {
            truncated = true;
            break;
        }
        out.push(ch);
        used += ch_width;
    }

    if truncated && width >= 4 {
        out = truncate_to_display_width(&out, width - 3);
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_rows_account_for_wrapping() {
        let lines = vec![Line::from("x".repeat(25)), Line::default(), Line::from("short")];
        assert_eq!(history_visual_rows(&lines, 10), 3 + 1 + 1);
    }

    #[test]
    fn test_history_scroll_top_follows_bottom_and_clamps() {
        let lines: Vec<Line<'static>> = (0..20).map(|i| Line::from(format!("row {i}"))).collect();
        assert_eq!(history_scroll_top(&lines, 40, 5, 0), 15);
        assert_eq!(history_scroll_top(&lines, 40, 5, 4), 11);
        assert_eq!(history_scroll_top(&lines, 40, 5, 100), 0);
        assert_eq!(history_scroll_top(&lines, 40, 50, 0), 0);
    }

    #[test]
    fn test_choice_rows() {
        assert_eq!(choice_rows(&[], 80), 0);
        let choices = vec!["Birthday".to_string(), "Wedding".to_string()];
        assert_eq!(choice_rows(&choices, 80), 1);
        assert_eq!(choice_rows(&choices, 10), 3);
    }

    #[test]
    fn test_truncate_line_adds_ellipsis() {
        assert_eq!(truncate_line("GiftWrap Genius | ready", 10), "GiftWra...");
        assert_eq!(truncate_line("short", 10), "short");
    }
}
