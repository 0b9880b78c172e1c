//! Restricted markdown used by assistant replies.
//!
//! Text is parsed into a small block/inline tree. [`render`] turns that tree
//! into HTML for export; the terminal view walks the same tree with
//! [`parse`] so both surfaces agree on the grammar.

mod block;
mod html;
mod inline;

pub use html::{escape_html, to_html};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// One source line. An empty line is kept only between two text lines.
    Text(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    /// `start` is the first number of an ordered list, `None` for bullets.
    List {
        start: Option<u64>,
        items: Vec<Vec<Inline>>,
    },
    Code { lang: Option<String>, code: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
}

impl Block {
    fn is_blank(&self) -> bool {
        matches!(self, Block::Text(content) if content.is_empty())
    }
}

/// Parses `text` without escaping it.
pub fn parse(text: &str) -> Document {
    Document {
        blocks: block::parse_blocks(text),
    }
}

/// Renders `text` as an HTML fragment. Raw `&`, `<` and `>` are escaped
/// before any markup is recognised, so the output never carries input tags.
pub fn render(text: &str) -> String {
    to_html(&parse(&escape_html(text)))
}
