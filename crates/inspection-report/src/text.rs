//! Greedy word wrapping against font metrics

use crate::metrics::Font;

/// One wrapped output line
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Natural width in points
    pub width: f32,
    /// Stretch to the full column width when drawn
    pub justify: bool,
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Newlines are hard breaks; runs of other whitespace collapse to a single
/// space. A word wider than the column is broken between characters. When
/// `justify` is set every line except the last of each hard-broken paragraph
/// is marked for justification.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32, justify: bool) -> Vec<TextLine> {
    let space = font.text_width(" ", size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let start = lines.len();
        let mut current = String::new();
        let mut current_width = 0.0f32;

        for word in paragraph.split_whitespace() {
            for piece in split_long_word(word, font, size, max_width) {
                let piece_width = font.text_width(&piece, size);
                if current.is_empty() {
                    current = piece;
                    current_width = piece_width;
                } else if current_width + space + piece_width <= max_width {
                    current.push(' ');
                    current.push_str(&piece);
                    current_width += space + piece_width;
                } else {
                    lines.push(TextLine {
                        text: std::mem::take(&mut current),
                        width: current_width,
                        justify,
                    });
                    current = piece;
                    current_width = piece_width;
                }
            }
        }

        lines.push(TextLine {
            text: current,
            width: current_width,
            justify: false,
        });

        // Only lines that were broken by wrapping get stretched
        for line in &mut lines[start..] {
            line.justify = line.justify && line.text.contains(' ');
        }
    }

    lines
}

fn split_long_word(word: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    if font.text_width(word, size) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0f32;
    for c in word.chars() {
        let w = f32::from(font.char_units(c)) * size / 1000.0;
        if !current.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
