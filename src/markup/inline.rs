use super::Inline;

const CODE_TICK: char = '`';

/// Parses one line: code spans first, then `**bold**`, then `*italic*`.
pub(super) fn parse_inline(text: &str) -> Vec<Inline> {
    let tokens = split_code_spans(text);
    let tokens = wrap_delimited(tokens, "**", Inline::Bold);
    wrap_delimited(tokens, "*", Inline::Italic)
}

fn split_code_spans(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(CODE_TICK) {
        let after = &rest[open + 1..];
        let Some(close) = after.find(CODE_TICK) else {
            break;
        };
        push_text(&mut out, &rest[..open]);
        if close == 0 {
            push_text(&mut out, "``");
        } else {
            out.push(Inline::Code(after[..close].to_string()));
        }
        rest = &after[close + 1..];
    }

    push_text(&mut out, rest);
    out
}

enum Piece {
    Node(Inline),
    Marker,
}

fn wrap_delimited(tokens: Vec<Inline>, delim: &str, wrap: fn(Vec<Inline>) -> Inline) -> Vec<Inline> {
    let mut pieces = Vec::new();
    for token in tokens {
        match token {
            Inline::Text(text) => {
                let mut segments = text.split(delim);
                if let Some(first) = segments.next() {
                    push_piece_text(&mut pieces, first);
                }
                for segment in segments {
                    pieces.push(Piece::Marker);
                    push_piece_text(&mut pieces, segment);
                }
            }
            Inline::Bold(children) => {
                pieces.push(Piece::Node(Inline::Bold(wrap_delimited(children, delim, wrap))));
            }
            Inline::Italic(children) => {
                pieces.push(Piece::Node(Inline::Italic(wrap_delimited(
                    children, delim, wrap,
                ))));
            }
            code @ Inline::Code(_) => pieces.push(Piece::Node(code)),
        }
    }

    let mut out = Vec::new();
    let mut pieces = pieces.into_iter();
    while let Some(piece) = pieces.next() {
        if let Piece::Node(node) = piece {
            push_node(&mut out, node);
            continue;
        }

        let mut inner = Vec::new();
        let mut closed = false;
        for candidate in pieces.by_ref() {
            match candidate {
                Piece::Marker => {
                    closed = true;
                    break;
                }
                Piece::Node(node) => push_node(&mut inner, node),
            }
        }

        if closed && !inner.is_empty() {
            out.push(wrap(inner));
            continue;
        }

        push_text(&mut out, delim);
        for node in inner {
            push_node(&mut out, node);
        }
        if closed {
            push_text(&mut out, delim);
        }
    }

    out
}

fn push_piece_text(pieces: &mut Vec<Piece>, text: &str) {
    if !text.is_empty() {
        pieces.push(Piece::Node(Inline::Text(text.to_string())));
    }
}

fn push_node(out: &mut Vec<Inline>, node: Inline) {
    match node {
        Inline::Text(text) => push_text(out, &text),
        other => out.push(other),
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::Text(text.to_string()));
    }
}
