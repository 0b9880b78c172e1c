use super::{Block, Document, Inline};

/// Escapes the characters that would otherwise open markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialises an already-escaped document.
pub fn to_html(document: &Document) -> String {
    let mut out = String::new();
    let mut previous_was_text = false;

    for block in &document.blocks {
        match block {
            Block::Text(content) => {
                if previous_was_text {
                    out.push_str("<br>");
                }
                push_inlines(&mut out, content);
            }
            Block::Heading { level, content } => {
                out.push_str(&format!("<h{level}>"));
                push_inlines(&mut out, content);
                out.push_str(&format!("</h{level}>"));
            }
            Block::List { start, items } => {
                match start {
                    Some(1) => out.push_str("<ol>"),
                    Some(start) => out.push_str(&format!("<ol start=\"{start}\">")),
                    None => out.push_str("<ul>"),
                }
                for item in items {
                    out.push_str("<li>");
                    push_inlines(&mut out, item);
                    out.push_str("</li>");
                }
                out.push_str(if start.is_some() { "</ol>" } else { "</ul>" });
            }
            Block::Code { lang, code } => {
                match lang {
                    Some(lang) => out.push_str(&format!("<pre><code class=\"language-{lang}\">")),
                    None => out.push_str("<pre><code>"),
                }
                out.push_str(code);
                out.push_str("</code></pre>");
            }
        }
        previous_was_text = matches!(block, Block::Text(_));
    }

    out
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => {
                out.push_str("<code>");
                out.push_str(code);
                out.push_str("</code>");
            }
            Inline::Bold(children) => {
                out.push_str("<strong>");
                push_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Italic(children) => {
                out.push_str("<em>");
                push_inlines(out, children);
                out.push_str("</em>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_handles_markup_characters() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("plain 🎁"), "plain 🎁");
    }
}
