//! Cover page filling
//!
//! Overlays report metadata as text on the first page of a blank form
//! template. The template's own drawing is wrapped in `q`/`Q` so the overlay
//! starts from a clean graphics state.

use chrono::{DateTime, NaiveDate};
use inspection_report::metrics::{encode_win_ansi, Font};
use inspection_report::ReportMetadata;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AssemblyError, Result};
use crate::merge::inherited_attribute;

/// Resource name of the overlay font, chosen to avoid clashing with template fonts
const COVER_FONT: &str = "FCover";
const COVER_FONT_FACE: Font = Font::TimesRoman;

/// Metadata value printed in a cover field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverKey {
    ClientName,
    PropertyAddress,
    /// Inspector name with license number when known
    Inspector,
    InspectionDate,
    ReportId,
}

impl CoverKey {
    fn value(&self, metadata: &ReportMetadata) -> Option<String> {
        let value = match self {
            CoverKey::ClientName => metadata.client_name.clone(),
            CoverKey::PropertyAddress => metadata.property_address.clone(),
            CoverKey::Inspector => match (&metadata.inspector_name, &metadata.inspector_license) {
                (Some(name), Some(license)) => Some(format!("{} - License #{}", name, license)),
                (Some(name), None) => Some(name.clone()),
                (None, Some(license)) => Some(format!("License #{}", license)),
                (None, None) => None,
            },
            CoverKey::InspectionDate => metadata.inspection_date.as_deref().map(format_date),
            CoverKey::ReportId => Some(metadata.report_id.clone()),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    fn name(&self) -> &'static str {
        match self {
            CoverKey::ClientName => "clientName",
            CoverKey::PropertyAddress => "propertyAddress",
            CoverKey::Inspector => "inspectorName",
            CoverKey::InspectionDate => "inspectionDate",
            CoverKey::ReportId => "reportId",
        }
    }
}

/// A text position on the cover page, in PDF points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverField {
    pub key: CoverKey,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Fail instead of leaving the blank empty
    #[serde(default)]
    pub required: bool,
}

impl CoverField {
    pub fn new(key: CoverKey, x: f32, y: f32) -> Self {
        Self {
            key,
            x,
            y,
            size: 10.0,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLayout {
    pub fields: Vec<CoverField>,
}

impl CoverLayout {
    /// Blanks of the REI 7-6 first page: Prepared For, Concerning, By, Date
    pub fn trec() -> Self {
        Self {
            fields: vec![
                CoverField::new(CoverKey::ClientName, 126.0, 664.0),
                CoverField::new(CoverKey::PropertyAddress, 126.0, 634.0).required(),
                CoverField::new(CoverKey::Inspector, 126.0, 604.0),
                CoverField::new(CoverKey::InspectionDate, 462.0, 604.0),
            ],
        }
    }
}

impl Default for CoverLayout {
    fn default() -> Self {
        Self::trec()
    }
}

/// Normalize a date for the cover: ISO dates and timestamps become MM/DD/YYYY,
/// anything else is printed as given
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%m/%d/%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%m/%d/%Y").to_string();
    }
    if let Ok(stamp) = raw.parse::<i64>() {
        // Millisecond epochs are what JavaScript producers send
        let parsed = if stamp.abs() >= 100_000_000_000 {
            DateTime::from_timestamp_millis(stamp)
        } else {
            DateTime::from_timestamp(stamp, 0)
        };
        if let Some(dt) = parsed {
            return dt.format("%m/%d/%Y").to_string();
        }
    }
    raw.to_string()
}

/// Overlay metadata onto page 1 of `template` and return the whole document
pub fn fill_cover_fields(template: &[u8], metadata: &ReportMetadata, layout: &CoverLayout) -> Result<Vec<u8>> {
    let mut entries = Vec::with_capacity(layout.fields.len());
    for field in &layout.fields {
        match field.key.value(metadata) {
            Some(text) => entries.push((field, text)),
            None if field.required => {
                return Err(AssemblyError::MissingField(field.key.name().to_string()));
            }
            None => {}
        }
    }

    let mut doc = Document::load_mem(template).map_err(|e| AssemblyError::ParseError(e.to_string()))?;
    let page_id = doc
        .get_pages()
        .get(&1)
        .copied()
        .ok_or_else(|| AssemblyError::OperationError("Template has no pages".into()))?;
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| AssemblyError::OperationError(format!("Invalid template page: {}", e)))?
        .clone();

    let mut resources = resolve_dict(&doc, inherited_attribute(&doc, &page, b"Resources"));
    let mut fonts = resolve_dict(&doc, resources.get(b"Font").ok().cloned());
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => COVER_FONT_FACE.base_font(),
        "Encoding" => "WinAnsiEncoding",
    });
    fonts.set(COVER_FONT, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let mut overlay = vec![Operation::new("Q", vec![]), Operation::new("q", vec![])];
    for (field, text) in &entries {
        overlay.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(COVER_FONT.as_bytes().to_vec()), Object::Real(field.size)],
            ),
            Operation::new("Td", vec![Object::Real(field.x), Object::Real(field.y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }
    overlay.push(Operation::new("Q", vec![]));
    let overlay = Content { operations: overlay }
        .encode()
        .map_err(|e| AssemblyError::OperationError(format!("Failed to encode overlay: {}", e)))?;

    let mut contents = vec![Object::Reference(
        doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec())),
    )];
    match page.get(b"Contents") {
        Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
            _ => contents.push(Object::Reference(*id)),
        },
        _ => {}
    }
    contents.push(Object::Reference(doc.add_object(Stream::new(Dictionary::new(), overlay))));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| AssemblyError::OperationError(format!("Invalid template page: {}", e)))?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));

    debug!(fields = entries.len(), "filled cover page");

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AssemblyError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}

/// Dereference a dictionary-valued attribute, or start an empty one
fn resolve_dict(doc: &Document, value: Option<Object>) -> Dictionary {
    match value {
        Some(Object::Dictionary(dict)) => dict,
        Some(Object::Reference(id)) => doc
            .get_object(id)
            .and_then(Object::as_dict)
            .ok()
            .cloned()
            .unwrap_or_default(),
        _ => Dictionary::new(),
    }
}
