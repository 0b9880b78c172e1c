use super::inline::parse_inline;
use super::Block;

const FENCE: &str = "```";

pub(super) fn parse_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut blocks = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        index += 1;

        if let Some(rest) = line.trim_start().strip_prefix(FENCE) {
            let close = lines[index..]
                .iter()
                .position(|candidate| candidate.trim() == FENCE);
            if let Some(offset) = close {
                let (lang, first_line) = fence_opening(rest);
                let code = first_line
                    .into_iter()
                    .chain(lines[index..index + offset].iter().copied())
                    .collect::<Vec<_>>()
                    .join("\n");
                blocks.push(Block::Code { lang, code });
                index += offset + 1;
                continue;
            }
        }

        blocks.push(parse_line(line));
    }

    normalize(blocks)
}

fn parse_line(line: &str) -> Block {
    if line.trim().is_empty() {
        return Block::Text(Vec::new());
    }
    if let Some((level, content)) = heading(line) {
        return Block::Heading {
            level,
            content: parse_inline(content),
        };
    }

    let trimmed = line.trim_start();
    if let Some(item) = bullet_item(trimmed) {
        return Block::List {
            start: None,
            items: vec![parse_inline(item)],
        };
    }
    if let Some((number, item)) = numbered_item(trimmed) {
        return Block::List {
            start: Some(number),
            items: vec![parse_inline(item)],
        };
    }

    Block::Text(parse_inline(line))
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    let content = line[level..].strip_prefix(' ')?.trim();
    if content.is_empty() {
        return None;
    }
    Some((level as u8, content))
}

fn bullet_item(line: &str) -> Option<&str> {
    let item = line.strip_prefix("- ")?.trim();
    (!item.is_empty()).then_some(item)
}

fn numbered_item(line: &str) -> Option<(u64, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let number = line[..digits].parse().ok()?;
    let item = line[digits..].strip_prefix(". ")?.trim();
    (!item.is_empty()).then_some((number, item))
}

/// Splits the text after an opening fence into a language tag and an
/// optional first code line. The tag must follow the backticks directly.
fn fence_opening(rest: &str) -> (Option<String>, Option<&str>) {
    let rest = rest.trim_end();
    let (word, extra) = if rest.starts_with(char::is_whitespace) {
        ("", rest)
    } else {
        rest.split_once(char::is_whitespace).unwrap_or((rest, ""))
    };
    let lang: String = word
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        .collect();
    let extra = extra.trim_start();
    (
        (!lang.is_empty()).then_some(lang),
        (!extra.is_empty()).then_some(extra),
    )
}

/// Drops blank lines that do not sit between two text lines and merges
/// neighbouring list items of the same kind.
fn normalize(blocks: Vec<Block>) -> Vec<Block> {
    let mut out: Vec<Block> = Vec::with_capacity(blocks.len());
    let mut blanks = 0usize;

    for block in blocks {
        if block.is_blank() {
            if matches!(out.last(), Some(Block::Text(_))) {
                blanks += 1;
            }
            continue;
        }

        if let Block::List { start, items } = block {
            blanks = 0;
            if let Some(Block::List {
                start: previous,
                items: previous_items,
            }) = out.last_mut()
            {
                if previous.is_some() == start.is_some() {
                    previous_items.extend(items);
                    continue;
                }
            }
            out.push(Block::List { start, items });
            continue;
        }

        if matches!(block, Block::Text(_)) && matches!(out.last(), Some(Block::Text(_))) {
            out.extend(std::iter::repeat_with(|| Block::Text(Vec::new())).take(blanks));
        }
        blanks = 0;
        out.push(block);
    }

    out
}
