//! Page geometry and paragraph styles
//!
//! All dimensions are PDF points (1/72 inch) with the origin at the bottom
//! left of the page.

use crate::metrics::Font;

pub const INCH: f32 = 72.0;

/// Fixed page geometry of the report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Enlarged to leave a gutter for the status checkboxes
    pub margin_left: f32,
    pub margin_right: f32,
    /// Inset of the content frame inside the margins
    pub frame_padding: f32,
}

impl PageGeometry {
    /// US Letter portrait with the form's header, footer and checkbox gutter
    pub const LETTER: PageGeometry = PageGeometry {
        width: 8.5 * INCH,
        height: 11.0 * INCH,
        margin_top: 1.25 * INCH,
        margin_bottom: 0.75 * INCH,
        margin_left: 1.75 * INCH,
        margin_right: 0.75 * INCH,
        frame_padding: 6.0,
    };

    /// Left edge of the content column
    pub fn frame_left(&self) -> f32 {
        self.margin_left + self.frame_padding
    }

    /// Top edge of the content column
    pub fn frame_top(&self) -> f32 {
        self.height - self.margin_top - self.frame_padding
    }

    pub fn frame_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right - 2.0 * self.frame_padding
    }

    pub fn frame_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom - 2.0 * self.frame_padding
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Typography and spacing of one kind of text block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font: Font,
    pub size: f32,
    /// Baseline-to-baseline distance
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub left_indent: f32,
    pub justify: bool,
}

pub const SECTION_HEADING: ParagraphStyle = ParagraphStyle {
    font: Font::TimesBold,
    size: 12.0,
    leading: 14.0,
    space_before: 18.0,
    space_after: 12.0,
    left_indent: 0.0,
    justify: false,
};

pub const LINE_ITEM_HEADING: ParagraphStyle = ParagraphStyle {
    font: Font::TimesBold,
    size: 11.0,
    leading: 13.0,
    space_before: 12.0,
    space_after: 8.0,
    left_indent: 0.0,
    justify: false,
};

pub const COMMENT_LABEL: ParagraphStyle = ParagraphStyle {
    font: Font::TimesBold,
    size: 10.0,
    leading: 12.0,
    space_before: 0.0,
    space_after: 4.0,
    left_indent: 0.25 * INCH,
    justify: false,
};

pub const COMMENT_BODY: ParagraphStyle = ParagraphStyle {
    font: Font::TimesRoman,
    size: 10.0,
    leading: 12.0,
    space_before: 0.0,
    space_after: 10.0,
    left_indent: 0.5 * INCH,
    justify: true,
};

pub const MEDIA_NOTE: ParagraphStyle = ParagraphStyle {
    font: Font::TimesItalic,
    size: 9.0,
    leading: 11.0,
    space_before: 0.0,
    space_after: 8.0,
    left_indent: 0.5 * INCH,
    justify: false,
};

/// Gap closing each line item's keep-together group
pub const ITEM_GAP: f32 = 0.1 * INCH;

/// Gap after the last line item of a section
pub const SECTION_GAP: f32 = 0.2 * INCH;
