//! Raw input records as they arrive from JSON
//!
//! Upstream producers are inconsistent: order keys arrive as numbers or
//! numeric strings, comment numbers as integers or strings, lists as `null`.
//! Every field here is optional and tolerant; [`crate::normalize`] turns these
//! into the strict [`crate::model`] types.

use serde::Deserialize;

use crate::model::ReportMetadata;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSection {
    #[serde(deserialize_with = "loose::order")]
    pub order: f64,
    #[serde(deserialize_with = "loose::string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub section_number: Option<String>,
    #[serde(alias = "line_items", deserialize_with = "loose::seq")]
    pub line_items: Vec<RawLineItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(deserialize_with = "loose::order")]
    pub order: f64,
    /// Present even when empty; `title` is only consulted when absent
    #[serde(deserialize_with = "loose::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub inspection_status: Option<String>,
    #[serde(deserialize_with = "loose::flag")]
    pub is_deficient: bool,
    #[serde(deserialize_with = "loose::seq")]
    pub comments: Vec<RawComment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawComment {
    #[serde(deserialize_with = "loose::order")]
    pub order: f64,
    #[serde(deserialize_with = "loose::string")]
    pub label: Option<String>,
    #[serde(deserialize_with = "loose::comment_number")]
    pub comment_number: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub text: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub content: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub comment_text: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub value: Option<String>,
    #[serde(rename = "type", deserialize_with = "loose::string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "loose::flag")]
    pub is_flagged: bool,
    #[serde(deserialize_with = "loose::seq")]
    pub photos: Vec<serde_json::Value>,
    #[serde(deserialize_with = "loose::seq")]
    pub videos: Vec<serde_json::Value>,
}

/// Report metadata keys as they arrive; see [`ReportMetadata`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMetadata {
    #[serde(deserialize_with = "loose::string")]
    pub report_id: Option<String>,
    #[serde(rename = "report_id", deserialize_with = "loose::string")]
    pub legacy_report_id: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub inspection_date: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub property_address: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub inspector_name: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub inspector_license: Option<String>,
    #[serde(deserialize_with = "loose::string")]
    pub client_name: Option<String>,
}

impl From<RawMetadata> for ReportMetadata {
    fn from(raw: RawMetadata) -> Self {
        let report_id = [raw.report_id, raw.legacy_report_id]
            .into_iter()
            .flatten()
            .find(|id| !id.trim().is_empty())
            .unwrap_or_else(crate::model::default_report_id);

        Self {
            report_id,
            inspection_date: raw.inspection_date,
            property_address: raw.property_address,
            inspector_name: raw.inspector_name,
            inspector_license: raw.inspector_license,
            client_name: raw.client_name,
        }
    }
}

/// Whole-report JSON document: a `sections` list plus metadata keys alongside
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportInput {
    #[serde(default, deserialize_with = "loose::seq")]
    pub sections: Vec<RawSection>,
    #[serde(flatten)]
    pub metadata: ReportMetadata,
}

/// Lenient field deserializers shared by the raw records
pub(crate) mod loose {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Numeric order key; strings are parsed, anything unusable becomes 0
    pub fn order<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        Ok(if value.is_finite() { value } else { 0.0 })
    }

    /// Scalar rendered as text; empty strings and non-scalars become `None`
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Truthy flag: booleans, non-zero numbers, "true"/"yes"/"1"
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1"
            ),
            _ => false,
        })
    }

    /// List that may be missing or `null`
    pub fn seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }

    /// Like [`string`], but an empty string is kept as present
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            other => string(other).unwrap_or(None),
        })
    }

    /// Comment number; zero and `false` mean no number
    pub fn comment_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Bool(false) => None,
            other => string(other).unwrap_or(None),
        })
    }
}
