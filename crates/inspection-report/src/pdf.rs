//! lopdf backend: decorated pages to a PDF document
//!
//! Fonts are the non-embedded standard Times faces with WinAnsiEncoding.
//! No timestamps or random IDs are written, so identical pages produce
//! identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::canvas::{DrawOp, PageCanvas};
use crate::error::{ReportError, Result};
use crate::metrics::{encode_win_ansi, Font};

/// Document-level info written to the trailer's Info dictionary
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
    pub author: Option<String>,
}

/// Serialize decorated pages into PDF bytes
pub fn write_pdf(pages: &[PageCanvas], info: &DocumentInfo) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), Object::Reference(font_id));
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        kids.push(add_page(&mut doc, page, pages_id, resources_id)?);
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut info_dict = dictionary! {
        "Title" => text_string(&info.title),
        "Subject" => text_string(&info.subject),
        "Producer" => text_string("inspection-report"),
    };
    if let Some(author) = &info.author {
        info_dict.set("Author", text_string(author));
    }
    let info_id = doc.add_object(info_dict);
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| ReportError::Pdf(format!("Failed to save PDF: {}", e)))?;
    Ok(output)
}

/// PDF text string: literal when ASCII, otherwise UTF-16BE with a byte order mark
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(value.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn add_page(doc: &mut Document, page: &PageCanvas, pages_id: ObjectId, resources_id: ObjectId) -> Result<ObjectId> {
    let content = Content {
        operations: page_operations(page),
    };
    let encoded = content
        .encode()
        .map_err(|e| ReportError::Pdf(format!("Failed to encode page {}: {}", page.number, e)))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real(page.width),
            Object::Real(page.height),
        ],
        "Resources" => Object::Reference(resources_id),
        "Contents" => Object::Reference(content_id),
    }))
}

fn page_operations(page: &PageCanvas) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new("w", vec![Object::Real(1.0)]),
    ];
    let mut word_spacing = 0.0f32;

    for op in &page.ops {
        match op {
            DrawOp::Text {
                font,
                size,
                x,
                y,
                text,
                word_spacing: spacing,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font.resource_name().as_bytes().to_vec()), Object::Real(*size)],
                ));
                if *spacing != word_spacing {
                    ops.push(Operation::new("Tw", vec![Object::Real(*spacing)]));
                    word_spacing = *spacing;
                }
                ops.push(Operation::new("Td", vec![Object::Real(*x), Object::Real(*y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Line { x1, y1, x2, y2 } => {
                ops.push(Operation::new("m", vec![Object::Real(*x1), Object::Real(*y1)]));
                ops.push(Operation::new("l", vec![Object::Real(*x2), Object::Real(*y2)]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Rect { x, y, width, height } => {
                ops.push(Operation::new(
                    "re",
                    vec![
                        Object::Real(*x),
                        Object::Real(*y),
                        Object::Real(*width),
                        Object::Real(*height),
                    ],
                ));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }

    ops.push(Operation::new("Q", vec![]));
    ops
}
