//! Paginating layout engine
//!
//! Pass one of rendering: places the story onto fixed-size pages and records
//! every line's position. Nothing is drawn here; the decorator runs once the
//! final page count is known.
//!
//! Placement rules:
//! - space before a block is dropped at the top of a page
//! - spacers at the top of a page, or that do not fit, are dropped
//! - text blocks split between lines across pages
//! - keep-together groups move to a fresh page when they do not fit the
//!   remaining space; groups taller than a whole page are placed block by block

use tracing::debug;

use crate::content::{Block, StoryItem};
use crate::model::InspectionStatus;
use crate::style::{PageGeometry, ParagraphStyle};
use crate::text::{wrap_text, TextLine};

/// Tolerance for floating point fit checks
const FIT_EPSILON: f32 = 0.001;

/// A line of text at its final position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
    /// Column width to stretch to, for justified lines
    pub justify_to: Option<f32>,
}

/// A text block (or the part of one) placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub style: ParagraphStyle,
    /// Checkbox status, for line item headings
    pub status: Option<InspectionStatus>,
    /// Top edge of the block's first line box
    pub top: f32,
    pub lines: Vec<PlacedLine>,
    /// True when this is the continuation of a block split across pages
    pub continued: bool,
}

impl PlacedBlock {
    pub fn first_baseline(&self) -> Option<f32> {
        self.lines.first().map(|l| l.baseline)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    /// 1-based page number
    pub number: usize,
    pub blocks: Vec<PlacedBlock>,
}

impl LaidOutPage {
    fn new(number: usize) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }
}

/// Result of the layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub geometry: PageGeometry,
    pub pages: Vec<LaidOutPage>,
    /// Keep-together groups too tall for any page, placed block by block
    pub oversized_groups: usize,
}

impl Layout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All placed blocks in document order
    pub fn blocks(&self) -> impl Iterator<Item = (&LaidOutPage, &PlacedBlock)> {
        self.pages
            .iter()
            .flat_map(|page| page.blocks.iter().map(move |block| (page, block)))
    }
}

/// A block with its text already wrapped to the column
#[derive(Debug, Clone)]
pub(crate) enum Measured {
    Text {
        style: ParagraphStyle,
        status: Option<InspectionStatus>,
        lines: Vec<TextLine>,
    },
    Spacer(f32),
}

impl Measured {
    pub(crate) fn new(block: &Block, geometry: &PageGeometry) -> Self {
        match (block.style(), block.text()) {
            (Some(style), Some(text)) => {
                let width = geometry.frame_width() - style.left_indent;
                Measured::Text {
                    style: *style,
                    status: block.status(),
                    lines: wrap_text(text, style.font, style.size, width, style.justify),
                }
            }
            _ => match block {
                Block::Spacer(height) => Measured::Spacer(*height),
                _ => Measured::Spacer(0.0),
            },
        }
    }

    /// Height needed to place the whole block, excluding space after
    fn height(&self, at_top: bool) -> f32 {
        match self {
            Measured::Text { style, lines, .. } => {
                let before = if at_top { 0.0 } else { style.space_before };
                before + lines.len() as f32 * style.leading
            }
            Measured::Spacer(height) => {
                if at_top {
                    0.0
                } else {
                    *height
                }
            }
        }
    }

    fn space_after(&self) -> f32 {
        match self {
            Measured::Text { style, .. } => style.space_after,
            Measured::Spacer(_) => 0.0,
        }
    }
}

/// Successful atomic placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub page: usize,
    pub height: f32,
}

/// Why a keep-together group could not be placed where the cursor is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Does not fit the remaining space but fits an empty page
    NeedsFreshPage,
    /// Taller than an empty page
    Oversized,
}

/// Height of a group placed starting at the given cursor state
fn group_height(group: &[Measured], at_top: bool) -> f32 {
    let mut total = 0.0;
    let mut top = at_top;
    for (i, measured) in group.iter().enumerate() {
        let h = measured.height(top);
        total += h;
        if i + 1 < group.len() {
            total += measured.space_after();
        }
        if h > 0.0 {
            top = false;
        }
    }
    total
}

struct Paginator {
    geometry: PageGeometry,
    pages: Vec<LaidOutPage>,
    current: LaidOutPage,
    /// Distance consumed from the frame top on the current page
    used: f32,
    oversized_groups: usize,
}

impl Paginator {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: LaidOutPage::new(1),
            used: 0.0,
            oversized_groups: 0,
        }
    }

    fn remaining(&self) -> f32 {
        (self.geometry.frame_height() - self.used).max(0.0)
    }

    fn at_top(&self) -> bool {
        self.used <= 0.0
    }

    fn break_page(&mut self) {
        let next = LaidOutPage::new(self.current.number + 1);
        let finished = std::mem::replace(&mut self.current, next);
        self.pages.push(finished);
        self.used = 0.0;
    }

    fn advance(&mut self, amount: f32) {
        self.used = (self.used + amount).min(self.geometry.frame_height());
    }

    /// Place a whole group on the current page, or report why it cannot be.
    fn try_place_atomic(&mut self, group: &[Measured]) -> Result<Placed, Overflow> {
        let needed = group_height(group, self.at_top());
        if needed <= self.remaining() + FIT_EPSILON {
            let page = self.current.number;
            for measured in group {
                self.place(measured);
            }
            return Ok(Placed {
                page,
                height: needed,
            });
        }

        if group_height(group, true) <= self.geometry.frame_height() + FIT_EPSILON {
            Err(Overflow::NeedsFreshPage)
        } else {
            Err(Overflow::Oversized)
        }
    }

    fn place_group(&mut self, group: &[Measured]) {
        let outcome = match self.try_place_atomic(group) {
            Err(Overflow::NeedsFreshPage) => {
                self.break_page();
                self.try_place_atomic(group)
            }
            other => other,
        };

        match outcome {
            Ok(placed) => {
                debug!(page = placed.page, height = placed.height, "placed keep-together group");
            }
            Err(overflow) => {
                debug!(
                    page = self.current.number,
                    ?overflow,
                    blocks = group.len(),
                    "keep-together group exceeds a page, placing blocks individually"
                );
                self.oversized_groups += 1;
                for measured in group {
                    self.place(measured);
                }
            }
        }
    }

    /// Place one block, splitting text across pages as needed
    fn place(&mut self, measured: &Measured) {
        match measured {
            Measured::Spacer(height) => {
                if self.at_top() {
                    return;
                }
                if *height > self.remaining() + FIT_EPSILON {
                    self.break_page();
                } else {
                    self.advance(*height);
                }
            }
            Measured::Text {
                style,
                status,
                lines,
            } => self.place_text(style, *status, lines),
        }
    }

    fn place_text(&mut self, style: &ParagraphStyle, status: Option<InspectionStatus>, lines: &[TextLine]) {
        let geometry = self.geometry;
        let x = geometry.frame_left() + style.left_indent;
        let column = geometry.frame_width() - style.left_indent;
        let mut pending = lines;
        let mut continued = false;

        while !pending.is_empty() {
            let before = if self.at_top() || continued {
                0.0
            } else {
                style.space_before
            };
            let available = self.remaining() - before;
            let mut fit = ((available + FIT_EPSILON) / style.leading).floor().max(0.0) as usize;
            if fit == 0 {
                if !self.at_top() {
                    self.break_page();
                    continue;
                }
                // A line taller than the frame still has to go somewhere
                fit = 1;
            }
            let take = fit.min(pending.len());
            let (now, rest) = pending.split_at(take);

            let top = geometry.frame_top() - self.used - before;
            let placed_lines = now
                .iter()
                .enumerate()
                .map(|(i, line)| PlacedLine {
                    text: line.text.clone(),
                    x,
                    baseline: top - style.size - i as f32 * style.leading,
                    width: line.width,
                    justify_to: line.justify.then_some(column),
                })
                .collect();

            self.current.blocks.push(PlacedBlock {
                style: *style,
                status: if continued { None } else { status },
                top,
                lines: placed_lines,
                continued,
            });
            self.advance(before + take as f32 * style.leading);

            pending = rest;
            if pending.is_empty() {
                self.advance(style.space_after);
            } else {
                self.break_page();
                continued = true;
            }
        }
    }

    fn finish(mut self) -> Layout {
        if !self.current.blocks.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        Layout {
            geometry: self.geometry,
            pages: self.pages,
            oversized_groups: self.oversized_groups,
        }
    }
}

/// Lay the story out onto pages
pub fn paginate(story: &[StoryItem], geometry: &PageGeometry) -> Layout {
    let mut paginator = Paginator::new(*geometry);

    for item in story {
        match item {
            StoryItem::Block(block) => paginator.place(&Measured::new(block, geometry)),
            StoryItem::KeepTogether(blocks) => {
                let group: Vec<Measured> = blocks.iter().map(|b| Measured::new(b, geometry)).collect();
                paginator.place_group(&group);
            }
        }
    }

    let layout = paginator.finish();
    debug!(
        pages = layout.page_count(),
        oversized_groups = layout.oversized_groups,
        "layout complete"
    );
    layout
}
