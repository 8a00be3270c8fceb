//! Word wrapping and box layout for `show_boxed`.
//!
//! Layout is an estimate: every glyph is assumed to be
//! `size * average_char_width` wide, so the line length is a character count
//! rather than a measured width.

/// A line placed inside a text box, with its baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxedLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Result of laying out text in a box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxedText {
    pub lines: Vec<BoxedLine>,
    /// Characters of the lines that fell below the bottom of the box.
    pub overflow_chars: usize,
}

/// Geometry of the box and the font it is set in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    /// Baseline distance as a multiple of `font_size`.
    pub leading: f64,
    /// Estimated glyph width as a multiple of `font_size`.
    pub average_char_width: f64,
}

impl TextBox {
    /// How many characters fit on one line; never less than one.
    pub fn chars_per_line(&self) -> usize {
        let glyph = self.font_size * self.average_char_width;
        if glyph <= 0.0 || !glyph.is_finite() {
            return 1;
        }
        let count = (self.width / glyph).floor();
        if count.is_finite() && count >= 1.0 {
            count as usize
        } else {
            1
        }
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * self.leading
    }

    /// Wrap `text` and assign baselines top-down.
    ///
    /// The first baseline sits one line height below `top`. Lines whose
    /// baseline would fall below `top - height` are not placed and count
    /// towards [`BoxedText::overflow_chars`].
    pub fn layout(&self, text: &str) -> BoxedText {
        let line_height = self.line_height();
        let bottom = self.top - self.height;
        let mut out = BoxedText::default();
        let mut full = false;
        for (i, line) in wrap_lines(text, self.chars_per_line()).into_iter().enumerate() {
            let y = self.top - line_height * (i as f64 + 1.0);
            full = full || y < bottom;
            if full {
                out.overflow_chars += line.chars().count();
                continue;
            }
            out.lines.push(BoxedLine {
                text: line,
                x: self.left,
                y,
            });
        }
        out
    }
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Explicit `\n` breaks are kept, runs of whitespace collapse to a single
/// space, and words longer than a line are split.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed <= max_chars {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(word.iter());
                current_len += word.len();
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            while word.len() > max_chars {
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            current_len = word.len();
            current = word.into_iter().collect();
        }
        lines.push(current);
    }
    // A trailing newline does not open an extra empty line.
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}
