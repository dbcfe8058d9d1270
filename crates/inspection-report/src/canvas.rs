//! Backend-neutral drawing operations for one finished page

use crate::metrics::Font;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        text: String,
        /// Extra space added to each ASCII space (PDF `Tw`)
        word_spacing: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    /// Stroked, unfilled rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// A decorated page ready for a PDF backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCanvas {
    pub number: usize,
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl PageCanvas {
    pub fn new(number: usize, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            font,
            size,
            x,
            y,
            text: text.into(),
            word_spacing: 0.0,
        });
    }

    /// Draw text horizontally centered on `center_x`
    pub fn text_centered(&mut self, font: Font, size: f32, center_x: f32, y: f32, text: impl Into<String>) {
        let text = text.into();
        let x = center_x - font.text_width(&text, size) / 2.0;
        self.text(font, size, x, y, text);
    }

    pub fn justified_text(&mut self, font: Font, size: f32, x: f32, y: f32, text: impl Into<String>, word_spacing: f32) {
        self.ops.push(DrawOp::Text {
            font,
            size,
            x,
            y,
            text: text.into(),
            word_spacing,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Rect { x, y, width, height });
    }

    /// Text strings drawn on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_text_position() {
        let mut page = PageCanvas::new(1, 612.0, 792.0);
        page.text_centered(Font::TimesRoman, 10.0, 306.0, 43.2, "ab");
        match &page.ops[0] {
            DrawOp::Text { x, .. } => {
                let width = Font::TimesRoman.text_width("ab", 10.0);
                assert!((x + width / 2.0 - 306.0).abs() < 0.001);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_texts_skips_shapes() {
        let mut page = PageCanvas::new(1, 612.0, 792.0);
        page.line(0.0, 0.0, 1.0, 1.0);
        page.text(Font::TimesBold, 9.0, 1.0, 1.0, "I");
        page.rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["I"]);
        assert!(page.contains_text("I"));
        assert!(!page.contains_text("NI"));
    }
}
