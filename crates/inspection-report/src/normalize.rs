//! Raw records → normalized, ordered report records

use crate::input::{RawComment, RawLineItem, RawSection};
use crate::model::{Comment, InspectionStatus, LineItem, Section};

/// Derive the inspection status of a line item.
///
/// First match wins:
/// 1. explicit `inspectionStatus` that is one of I / NI / NP / D
/// 2. `isDeficient`
/// 3. a comment of type "deficient" or flagged
/// 4. any comment at all → Inspected
/// 5. otherwise Unknown
pub fn derive_status(item: &RawLineItem) -> InspectionStatus {
    if let Some(status) = item
        .inspection_status
        .as_deref()
        .and_then(InspectionStatus::from_code)
    {
        return status;
    }

    if item.is_deficient {
        return InspectionStatus::Deficient;
    }

    let flagged = item
        .comments
        .iter()
        .any(|c| c.kind.as_deref() == Some("deficient") || c.is_flagged);
    if flagged {
        return InspectionStatus::Deficient;
    }

    if !item.comments.is_empty() {
        return InspectionStatus::Inspected;
    }

    InspectionStatus::Unknown
}

/// First non-empty of `text`, `content`, `commentText`, `value`, entity-decoded
pub fn comment_text(comment: &RawComment) -> String {
    [
        &comment.text,
        &comment.content,
        &comment.comment_text,
        &comment.value,
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
    .map(|s| html_escape::decode_html_entities(s).into_owned())
    .unwrap_or_default()
}

pub fn media_count(comment: &RawComment) -> usize {
    comment.photos.len() + comment.videos.len()
}

/// Normalize and order all sections.
///
/// Sections, line items and comments are each sorted by their order key.
/// The sort is stable, so equal keys keep input order.
pub fn normalize_sections(raw: &[RawSection]) -> Vec<Section> {
    let mut sections: Vec<Section> = raw.iter().map(normalize_section).collect();
    sort_by_order(&mut sections, |s| s.order);
    sections
}

fn normalize_section(raw: &RawSection) -> Section {
    let mut line_items: Vec<LineItem> = raw.line_items.iter().map(normalize_line_item).collect();
    sort_by_order(&mut line_items, |i| i.order);

    Section {
        order: raw.order,
        name: raw.name.clone().unwrap_or_default(),
        number: raw.section_number.clone(),
        line_items,
    }
}

fn normalize_line_item(raw: &RawLineItem) -> LineItem {
    let mut comments: Vec<Comment> = raw.comments.iter().map(normalize_comment).collect();
    sort_by_order(&mut comments, |c| c.order);

    LineItem {
        order: raw.order,
        name: raw
            .name
            .clone()
            .or_else(|| raw.title.clone())
            .unwrap_or_default(),
        status: derive_status(raw),
        comments,
    }
}

fn normalize_comment(raw: &RawComment) -> Comment {
    Comment {
        order: raw.order,
        label: raw.label.clone(),
        number: raw.comment_number.clone(),
        text: comment_text(raw),
        media_count: media_count(raw),
    }
}

fn sort_by_order<T>(items: &mut [T], key: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| key(a).total_cmp(&key(b)));
}
