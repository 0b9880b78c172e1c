use crate::markup::{self, Block, Document, Inline};
use crate::types::{Speaker, Turn};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const CODE_STYLE: Style = Style::new().fg(Color::LightGreen);
const HEADING_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Lines for one transcript turn: a speaker label, the body, a spacer.
pub fn turn_lines(turn: &Turn, assistant_name: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match turn.speaker() {
        Speaker::User => {
            lines.push(Line::styled(
                "You",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            lines.extend(turn.text().lines().map(|line| Line::from(line.to_string())));
        }
        Speaker::Assistant => {
            lines.push(Line::styled(
                assistant_name.to_string(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
            lines.extend(document_lines(&markup::parse(turn.text())));
        }
    }
    lines.push(Line::default());
    lines
}

pub fn document_lines(document: &Document) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for block in &document.blocks {
        match block {
            Block::Text(content) => lines.push(inline_line(Vec::new(), content, Style::default())),
            Block::Heading { level, content } => {
                let style = if *level == 1 {
                    HEADING_STYLE.add_modifier(Modifier::UNDERLINED)
                } else {
                    HEADING_STYLE
                };
                lines.push(inline_line(Vec::new(), content, style));
            }
            Block::List { start, items } => {
                for (number, item) in (start.unwrap_or(1)..).zip(items) {
                    let marker = match start {
                        Some(_) => format!("  {number}. "),
                        None => "  • ".to_string(),
                    };
                    lines.push(inline_line(vec![Span::raw(marker)], item, Style::default()));
                }
            }
            Block::Code { lang, code } => {
                if let Some(lang) = lang {
                    lines.push(Line::styled(
                        format!("  [{lang}]"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                lines.extend(
                    code.split('\n')
                        .map(|line| Line::from(Span::styled(format!("  {line}"), CODE_STYLE))),
                );
            }
        }
    }
    lines
}

fn inline_line(mut spans: Vec<Span<'static>>, inlines: &[Inline], style: Style) -> Line<'static> {
    push_spans(&mut spans, inlines, style);
    Line::from(spans)
}

fn push_spans(spans: &mut Vec<Span<'static>>, inlines: &[Inline], style: Style) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => spans.push(Span::styled(text.clone(), style)),
            Inline::Code(code) => spans.push(Span::styled(code.clone(), style.patch(CODE_STYLE))),
            Inline::Bold(children) => push_spans(spans, children, style.add_modifier(Modifier::BOLD)),
            Inline::Italic(children) => {
                push_spans(spans, children, style.add_modifier(Modifier::ITALIC))
            }
        }
    }
}
