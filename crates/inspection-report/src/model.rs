//! Normalized report records
//!
//! These are produced by [`crate::normalize`] from the loosely-typed input
//! records and stay read-only for the rest of the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inspection status of a single line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InspectionStatus {
    Inspected,
    NotInspected,
    NotPresent,
    Deficient,
    /// No status could be derived; no checkbox is marked
    Unknown,
}

impl InspectionStatus {
    /// The four checkbox columns, in the order they are drawn
    pub const COLUMNS: [InspectionStatus; 4] = [
        InspectionStatus::Inspected,
        InspectionStatus::NotInspected,
        InspectionStatus::NotPresent,
        InspectionStatus::Deficient,
    ];

    /// Form code ("I", "NI", "NP", "D"); empty for Unknown
    pub fn code(&self) -> &'static str {
        match self {
            InspectionStatus::Inspected => "I",
            InspectionStatus::NotInspected => "NI",
            InspectionStatus::NotPresent => "NP",
            InspectionStatus::Deficient => "D",
            InspectionStatus::Unknown => "",
        }
    }

    /// Parse a form code, case-insensitive. Anything else is rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "I" => Some(InspectionStatus::Inspected),
            "NI" => Some(InspectionStatus::NotInspected),
            "NP" => Some(InspectionStatus::NotPresent),
            "D" => Some(InspectionStatus::Deficient),
            _ => None,
        }
    }

    /// Human-readable legend text, e.g. "NP=Not Present"
    pub fn legend(&self) -> &'static str {
        match self {
            InspectionStatus::Inspected => "I=Inspected",
            InspectionStatus::NotInspected => "NI=Not Inspected",
            InspectionStatus::NotPresent => "NP=Not Present",
            InspectionStatus::Deficient => "D=Deficient",
            InspectionStatus::Unknown => "",
        }
    }

    /// Index of this status in [`Self::COLUMNS`], if it marks a box
    pub fn column(&self) -> Option<usize> {
        Self::COLUMNS.iter().position(|s| s == self)
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Report-level metadata
///
/// Deserializes through [`crate::input::RawMetadata`], which accepts the
/// legacy `report_id` key alongside `reportId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "crate::input::RawMetadata")]
pub struct ReportMetadata {
    pub report_id: String,
    pub inspection_date: Option<String>,
    pub property_address: Option<String>,
    pub inspector_name: Option<String>,
    pub inspector_license: Option<String>,
    pub client_name: Option<String>,
}

pub(crate) fn default_report_id() -> String {
    "N/A".to_string()
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self {
            report_id: default_report_id(),
            inspection_date: None,
            property_address: None,
            inspector_name: None,
            inspector_license: None,
            client_name: None,
        }
    }
}

impl ReportMetadata {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub order: f64,
    pub name: String,
    /// Explicit label overriding the generated Roman numeral
    pub number: Option<String>,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub order: f64,
    pub name: String,
    pub status: InspectionStatus,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub order: f64,
    pub label: Option<String>,
    pub number: Option<String>,
    /// Entity-decoded text; empty when the input carried none
    pub text: String,
    /// Attached photos plus videos
    pub media_count: usize,
}

impl Comment {
    /// Heading line shown above the comment text, if the comment has a label
    pub fn heading(&self) -> Option<String> {
        let label = self.label.as_deref()?;
        Some(match self.number.as_deref() {
            Some(number) => format!("{}. {}", number, label),
            None => label.to_string(),
        })
    }

    /// Media reference sentence, if anything is attached
    pub fn media_note(&self) -> Option<String> {
        match self.media_count {
            0 => None,
            1 => Some("See attached media (1 item)".to_string()),
            n => Some(format!("See attached media ({} items)", n)),
        }
    }
}
