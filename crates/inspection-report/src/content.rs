//! Normalized records → ordered story of renderable blocks

use crate::model::{InspectionStatus, LineItem, Section};
use crate::numbering::{item_label, section_label};
use crate::style::{self, ParagraphStyle};

/// A renderable unit of the report body
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    SectionHeading(String),
    LineItemHeading {
        text: String,
        status: InspectionStatus,
    },
    CommentLabel(String),
    CommentBody(String),
    MediaNote(String),
    /// Vertical gap in points
    Spacer(f32),
}

impl Block {
    /// Paragraph style for text blocks; `None` for spacers
    pub fn style(&self) -> Option<&'static ParagraphStyle> {
        match self {
            Block::SectionHeading(_) => Some(&style::SECTION_HEADING),
            Block::LineItemHeading { .. } => Some(&style::LINE_ITEM_HEADING),
            Block::CommentLabel(_) => Some(&style::COMMENT_LABEL),
            Block::CommentBody(_) => Some(&style::COMMENT_BODY),
            Block::MediaNote(_) => Some(&style::MEDIA_NOTE),
            Block::Spacer(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Block::SectionHeading(text)
            | Block::LineItemHeading { text, .. }
            | Block::CommentLabel(text)
            | Block::CommentBody(text)
            | Block::MediaNote(text) => Some(text),
            Block::Spacer(_) => None,
        }
    }

    /// Status to mark in the checkbox gutter, for line item headings
    pub fn status(&self) -> Option<InspectionStatus> {
        match self {
            Block::LineItemHeading { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Top-level unit handed to the layout engine
#[derive(Debug, Clone, PartialEq)]
pub enum StoryItem {
    Block(Block),
    /// Blocks to place on one page when they fit on one page
    KeepTogether(Vec<Block>),
}

impl StoryItem {
    pub fn blocks(&self) -> &[Block] {
        match self {
            StoryItem::Block(block) => std::slice::from_ref(block),
            StoryItem::KeepTogether(blocks) => blocks,
        }
    }
}

/// Build the report story from sorted sections
pub fn build_story(sections: &[Section]) -> Vec<StoryItem> {
    let mut story = Vec::new();

    for (section_index, section) in sections.iter().enumerate() {
        let label = section_label(section_index, section.number.as_deref());
        story.push(StoryItem::Block(Block::SectionHeading(format!(
            "{}. {}",
            label,
            section.name.to_uppercase()
        ))));

        for (item_index, item) in section.line_items.iter().enumerate() {
            story.push(StoryItem::KeepTogether(line_item_blocks(item_index, item)));
        }

        story.push(StoryItem::Block(Block::Spacer(style::SECTION_GAP)));
    }

    story
}

fn line_item_blocks(index: usize, item: &LineItem) -> Vec<Block> {
    let mut blocks = vec![Block::LineItemHeading {
        text: format!("{}. {}", item_label(index), item.name),
        status: item.status,
    }];

    for comment in &item.comments {
        if let Some(heading) = comment.heading() {
            blocks.push(Block::CommentLabel(heading));
        }
        if !comment.text.is_empty() {
            blocks.push(Block::CommentBody(comment.text.clone()));
        }
        if let Some(note) = comment.media_note() {
            blocks.push(Block::MediaNote(note));
        }
    }

    blocks.push(Block::Spacer(style::ITEM_GAP));
    blocks
}
