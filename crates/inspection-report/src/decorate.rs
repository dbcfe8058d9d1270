//! Page decoration
//!
//! Pass two of rendering. Runs over the finished [`Layout`] so every footer
//! can print the true page total, and draws the body text together with the
//! header, footer and per-heading status checkboxes.

use serde::{Deserialize, Serialize};

use crate::canvas::PageCanvas;
use crate::layout::{LaidOutPage, Layout, PlacedBlock, PlacedLine};
use crate::metrics::Font;
use crate::model::{InspectionStatus, ReportMetadata};
use crate::style::INCH;

const PAGE_LEFT: f32 = 0.5 * INCH;
const PAGE_RIGHT: f32 = 8.0 * INCH;
const PAGE_CENTER: f32 = 4.25 * INCH;

const HEADER_Y: f32 = 10.5 * INCH;
const HEADER_RULE_Y: f32 = 10.4 * INCH;
const LEGEND_Y: f32 = 10.25 * INCH;
const LEGEND_COLUMN: f32 = 1.75 * INCH;
const STRIP_LABEL_Y: f32 = 10.05 * INCH;
/// Center of each strip label, relative to the left page margin
const STRIP_LABEL_OFFSETS: [f32; 4] = [0.15 * INCH, 0.4 * INCH, 0.7 * INCH, INCH];

const PAGE_NUMBER_Y: f32 = 0.6 * INCH;
const REVISION_Y: f32 = 0.4 * INCH;
const ATTRIBUTION_Y: f32 = 0.25 * INCH;

const CHECKBOX_SIZE: f32 = 10.0;
const CHECKBOX_SPACING: f32 = 0.25 * INCH;
/// Offset of the first checkbox from the content column
const CHECKBOX_OFFSET: f32 = 1.25 * INCH;
/// Distance from the heading baseline down to the checkbox bottom
const CHECKBOX_DROP: f32 = 2.0;

/// Printed identity of the form a report is rendered as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProfile {
    /// Document title written to the PDF metadata
    pub title: String,
    /// Form revision citation printed bottom left
    pub revision: String,
    /// Regulatory attribution printed bottom center; omitted when empty
    pub attribution: String,
    /// Prefix of generated file names
    pub file_prefix: String,
}

impl FormProfile {
    /// Texas Real Estate Commission property inspection report (REI 7-6)
    pub fn trec() -> Self {
        Self {
            title: "Property Inspection Report".to_string(),
            revision: "REI 7-6 (8/9/21)".to_string(),
            attribution: "Promulgated by the Texas Real Estate Commission - (512) 936-3000 - www.trec.texas.gov"
                .to_string(),
            file_prefix: "trec".to_string(),
        }
    }

    /// Buyer's Inspection Notice and Seller's Response
    pub fn binsr() -> Self {
        Self {
            title: "Buyer's Inspection Notice and Seller's Response".to_string(),
            revision: "BINSR".to_string(),
            attribution: String::new(),
            file_prefix: "binsr".to_string(),
        }
    }
}

impl Default for FormProfile {
    fn default() -> Self {
        Self::trec()
    }
}

/// Draw every laid-out page with its header, footer and checkboxes
pub fn decorate(layout: &Layout, metadata: &ReportMetadata, form: &FormProfile) -> Vec<PageCanvas> {
    let total = layout.page_count();
    layout
        .pages
        .iter()
        .map(|page| decorate_page(layout, page, total, metadata, form))
        .collect()
}

fn decorate_page(
    layout: &Layout,
    page: &LaidOutPage,
    total: usize,
    metadata: &ReportMetadata,
    form: &FormProfile,
) -> PageCanvas {
    let geometry = &layout.geometry;
    let mut canvas = PageCanvas::new(page.number, geometry.width, geometry.height);

    draw_header(&mut canvas, metadata);
    for block in &page.blocks {
        draw_block(&mut canvas, block);
        if let Some(status) = block.status {
            if let Some(baseline) = block.first_baseline() {
                draw_checkboxes(&mut canvas, geometry.frame_left(), baseline, status);
            }
        }
    }
    draw_footer(&mut canvas, page.number, total, form);

    canvas
}

fn draw_header(canvas: &mut PageCanvas, metadata: &ReportMetadata) {
    canvas.text(
        Font::TimesRoman,
        10.0,
        PAGE_LEFT,
        HEADER_Y,
        format!("Report Identification: {}", metadata.report_id),
    );
    canvas.line(PAGE_LEFT, HEADER_RULE_Y, PAGE_RIGHT, HEADER_RULE_Y);

    for (i, status) in InspectionStatus::COLUMNS.iter().enumerate() {
        canvas.text(
            Font::TimesBold,
            10.0,
            PAGE_LEFT + LEGEND_COLUMN * i as f32,
            LEGEND_Y,
            status.legend(),
        );
    }

    canvas.rect(
        PAGE_LEFT - 0.05 * INCH,
        STRIP_LABEL_Y - 0.05 * INCH,
        PAGE_RIGHT - PAGE_LEFT,
        0.15 * INCH,
    );
    for (status, offset) in InspectionStatus::COLUMNS.iter().zip(STRIP_LABEL_OFFSETS) {
        canvas.text_centered(Font::TimesBold, 9.0, PAGE_LEFT + offset, STRIP_LABEL_Y, status.code());
    }
}

fn draw_footer(canvas: &mut PageCanvas, number: usize, total: usize, form: &FormProfile) {
    canvas.text_centered(
        Font::TimesRoman,
        10.0,
        PAGE_CENTER,
        PAGE_NUMBER_Y,
        format!("Page {} of {}", number, total),
    );
    canvas.text(Font::TimesRoman, 8.0, PAGE_LEFT, REVISION_Y, form.revision.as_str());
    if !form.attribution.is_empty() {
        canvas.text_centered(Font::TimesRoman, 8.0, PAGE_CENTER, ATTRIBUTION_Y, form.attribution.as_str());
    }
}

fn draw_block(canvas: &mut PageCanvas, block: &PlacedBlock) {
    let style = &block.style;
    for line in &block.lines {
        if line.text.is_empty() {
            continue;
        }
        canvas.justified_text(
            style.font,
            style.size,
            line.x,
            line.baseline,
            line.text.as_str(),
            word_spacing(line),
        );
    }
}

/// Extra space per word gap needed to stretch a line to its column
fn word_spacing(line: &PlacedLine) -> f32 {
    let Some(column) = line.justify_to else {
        return 0.0;
    };
    let gaps = line.text.matches(' ').count();
    if gaps == 0 {
        return 0.0;
    }
    ((column - line.width) / gaps as f32).max(0.0)
}

fn draw_checkboxes(canvas: &mut PageCanvas, frame_left: f32, baseline: f32, status: InspectionStatus) {
    let marked = status.column();
    let y = baseline - CHECKBOX_DROP;
    for column in 0..InspectionStatus::COLUMNS.len() {
        let x = frame_left - CHECKBOX_OFFSET + column as f32 * CHECKBOX_SPACING;
        canvas.rect(x, y, CHECKBOX_SIZE, CHECKBOX_SIZE);
        if marked == Some(column) {
            canvas.line(x, y, x + CHECKBOX_SIZE, y + CHECKBOX_SIZE);
            canvas.line(x + CHECKBOX_SIZE, y, x, y + CHECKBOX_SIZE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawOp;
    use crate::content::{Block, StoryItem};
    use crate::layout::paginate;
    use crate::style::PageGeometry;

    fn story_with(status: InspectionStatus) -> Vec<StoryItem> {
        vec![
            StoryItem::Block(Block::SectionHeading("I. ROOF".into())),
            StoryItem::KeepTogether(vec![
                Block::LineItemHeading {
                    text: "A. Covering".into(),
                    status,
                },
                Block::CommentBody("Shingles are worn.".into()),
            ]),
        ]
    }

    fn lines(page: &PageCanvas) -> Vec<(f32, f32, f32, f32)> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { x1, y1, x2, y2 } => Some((*x1, *y1, *x2, *y2)),
                _ => None,
            })
            .collect()
    }

    fn rects(page: &PageCanvas) -> Vec<(f32, f32)> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_header_and_footer_on_every_page() {
        let story = vec![StoryItem::Block(Block::CommentBody(
            (0..120).map(|i| i.to_string()).collect::<Vec<_>>().join("\n"),
        ))];
        let layout = paginate(&story, &PageGeometry::LETTER);
        let pages = decorate(&layout, &ReportMetadata::new("R-42"), &FormProfile::trec());

        assert_eq!(pages.len(), 3);
        for (i, page) in pages.iter().enumerate() {
            assert!(page.contains_text("Report Identification: R-42"));
            assert!(page.contains_text(&format!("Page {} of 3", i + 1)));
            assert!(page.contains_text("REI 7-6 (8/9/21)"));
            assert!(page.contains_text("Texas Real Estate Commission"));
            for legend in ["I=Inspected", "NI=Not Inspected", "NP=Not Present", "D=Deficient"] {
                assert!(page.contains_text(legend));
            }
        }
    }

    #[test]
    fn test_checkbox_marks_status_column() {
        let layout = paginate(&story_with(InspectionStatus::NotPresent), &PageGeometry::LETTER);
        let pages = decorate(&layout, &ReportMetadata::default(), &FormProfile::trec());
        let page = &pages[0];

        let heading = &layout.pages[0].blocks[1];
        let y = heading.first_baseline().unwrap() - 2.0;
        let boxes: Vec<_> = rects(page).into_iter().filter(|(_, by)| *by == y).collect();
        assert_eq!(boxes, vec![(42.0, y), (60.0, y), (78.0, y), (96.0, y)]);

        // Header rule plus the two diagonals of the NP box
        let marks = lines(page);
        assert_eq!(marks.len(), 3);
        assert!(marks.contains(&(78.0, y, 88.0, y + 10.0)));
        assert!(marks.contains(&(88.0, y, 78.0, y + 10.0)));
    }

    #[test]
    fn test_unknown_status_leaves_boxes_empty() {
        let layout = paginate(&story_with(InspectionStatus::Unknown), &PageGeometry::LETTER);
        let pages = decorate(&layout, &ReportMetadata::default(), &FormProfile::trec());
        // Header strip plus four empty boxes, header rule only
        assert_eq!(rects(&pages[0]).len(), 5);
        assert_eq!(lines(&pages[0]).len(), 1);
    }

    #[test]
    fn test_binsr_profile_citations() {
        let layout = paginate(&story_with(InspectionStatus::Deficient), &PageGeometry::LETTER);
        let pages = decorate(&layout, &ReportMetadata::default(), &FormProfile::binsr());
        assert!(pages[0].contains_text("BINSR"));
        assert!(!pages[0].contains_text("REI 7-6"));
        assert!(pages[0].contains_text("Report Identification: N/A"));
        assert!(!pages[0].contains_text("Texas Real Estate Commission"));
        // Page number and revision only
        let footer_texts = pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Text { y, .. } if *y < 50.0))
            .count();
        assert_eq!(footer_texts, 2);
    }

    #[test]
    fn test_word_spacing_fills_column() {
        let line = PlacedLine {
            text: "a b c".into(),
            x: 0.0,
            baseline: 0.0,
            width: 100.0,
            justify_to: Some(120.0),
        };
        assert_eq!(word_spacing(&line), 10.0);
        let ragged = PlacedLine {
            justify_to: None,
            ..line
        };
        assert_eq!(word_spacing(&ragged), 0.0);
    }
}
