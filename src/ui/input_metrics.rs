use unicode_width::UnicodeWidthChar;

/// Where the next glyph of the input pane lands.
struct Pen {
    width: usize,
    row: usize,
    col: usize,
}

impl Pen {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            row: 0,
            col: 0,
        }
    }

    /// Moves past `ch`. Returns false for characters that take no cell.
    fn place(&mut self, ch: char) -> bool {
        match ch {
            '\r' => false,
            '\n' => {
                self.row += 1;
                self.col = 0;
                false
            }
            _ => {
                let ch_width = char_display_width(ch);
                if self.col + ch_width > self.width && self.col > 0 {
                    self.row += 1;
                    self.col = 0;
                }
                self.col += ch_width;
                true
            }
        }
    }
}

/// Soft-wraps the draft message to the pane width, counting wide glyphs
/// such as emoji as two columns.
pub fn wrap_input_lines(input: &str, width: usize) -> Vec<String> {
    let mut pen = Pen::new(width);
    let mut lines = vec![String::new()];
    for ch in input.chars() {
        let placed = pen.place(ch);
        lines.resize_with(pen.row + 1, String::new);
        if placed {
            lines[pen.row].push(ch);
        }
    }
    lines
}

/// Row and column of the cursor inside the wrapped draft.
pub fn cursor_row_col(input: &str, cursor_byte: usize, width: usize) -> (usize, usize) {
    let cursor_byte = clamp_to_char_boundary_left(input, cursor_byte);
    let mut pen = Pen::new(width);
    for ch in input[..cursor_byte].chars() {
        pen.place(ch);
    }
    if pen.col >= pen.width {
        (pen.row + 1, 0)
    } else {
        (pen.row, pen.col)
    }
}

pub fn truncate_to_display_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > max_width && used > 0 {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn clamp_to_char_boundary_left(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while cursor > 0 && !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}
