//! Report rendering entry points

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::canvas::PageCanvas;
use crate::config::RenderOptions;
use crate::content::build_story;
use crate::decorate::decorate;
use crate::error::{ReportError, Result};
use crate::input::{RawSection, ReportInput};
use crate::layout::{paginate, Layout};
use crate::model::{ReportMetadata, Section};
use crate::normalize::normalize_sections;

/// A fully laid out and decorated report, before PDF encoding
#[derive(Debug, Clone)]
pub struct ComposedReport {
    pub sections: Vec<Section>,
    pub layout: Layout,
    pub pages: Vec<PageCanvas>,
}

impl ComposedReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Parse a whole-report JSON root: a `sections` list with metadata keys alongside
pub fn parse_report(root: &Value) -> Result<ReportInput> {
    if !root.is_object() {
        return Err(ReportError::Validation(
            "report JSON must be an object with a `sections` list".to_string(),
        ));
    }
    Ok(ReportInput::deserialize(root)?)
}

/// Normalize, paginate and decorate without encoding
pub fn compose_report(
    sections: &[RawSection],
    metadata: &ReportMetadata,
    options: &RenderOptions,
) -> Result<ComposedReport> {
    if sections.is_empty() {
        return Err(ReportError::Validation(
            "`sections` must contain at least one section".to_string(),
        ));
    }

    let sections = normalize_sections(sections);
    let story = build_story(&sections);
    debug!(sections = sections.len(), story_items = story.len(), "built report story");

    let layout = paginate(&story, &options.geometry);
    let pages = decorate(&layout, metadata, &options.form);

    Ok(ComposedReport {
        sections,
        layout,
        pages,
    })
}

/// Render a report to PDF bytes in memory
pub fn render_to_bytes(sections: &[RawSection], metadata: &ReportMetadata, options: &RenderOptions) -> Result<Vec<u8>> {
    let composed = compose_report(sections, metadata, options)?;
    encode(&composed, metadata, options)
}

/// Render a report and write it to `destination`.
///
/// Missing parent directories are created. The PDF is written to a temporary
/// file in the destination directory and moved into place, so a failed render
/// never leaves a file at `destination`.
pub fn render_inspection_report(
    sections: &[RawSection],
    metadata: &ReportMetadata,
    options: &RenderOptions,
    destination: impl AsRef<Path>,
) -> Result<PathBuf> {
    let destination = destination.as_ref();
    let composed = compose_report(sections, metadata, options)?;
    let bytes = encode(&composed, metadata, options)?;

    write_atomic(destination, &bytes)?;

    info!(
        path = %destination.display(),
        pages = composed.page_count(),
        bytes = bytes.len(),
        report_id = %metadata.report_id,
        "rendered inspection report"
    );
    Ok(destination.to_path_buf())
}

/// Render from a whole-report JSON root.
///
/// Metadata comes from the root's own keys unless supplied separately.
pub fn render_report_from_json(
    root: &Value,
    metadata: Option<&ReportMetadata>,
    options: &RenderOptions,
    destination: impl AsRef<Path>,
) -> Result<PathBuf> {
    let input = parse_report(root)?;
    let metadata = metadata.unwrap_or(&input.metadata);
    render_inspection_report(&input.sections, metadata, options, destination)
}

/// Write `bytes` to `destination` through a temporary file in the same
/// directory, creating missing parent directories
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| ReportError::io(dir, e))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| ReportError::io(file.path(), e))?;
    file.persist(destination)
        .map_err(|e| ReportError::io(destination, e.error))?;
    Ok(())
}

#[cfg(feature = "pdf")]
fn encode(composed: &ComposedReport, metadata: &ReportMetadata, options: &RenderOptions) -> Result<Vec<u8>> {
    let info = crate::pdf::DocumentInfo {
        title: options.form.title.clone(),
        subject: format!("Report Identification: {}", metadata.report_id),
        author: metadata.inspector_name.clone(),
    };
    crate::pdf::write_pdf(&composed.pages, &info)
}

#[cfg(not(feature = "pdf"))]
fn encode(_composed: &ComposedReport, _metadata: &ReportMetadata, _options: &RenderOptions) -> Result<Vec<u8>> {
    Err(ReportError::BackendUnavailable(
        "built without the `pdf` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_root() -> Value {
        json!({
            "reportId": "R-100",
            "inspectorName": "Pat Inspector",
            "sections": [
                {
                    "order": 2,
                    "name": "Electrical Systems",
                    "lineItems": [
                        {"order": 1, "name": "Service Entrance", "inspectionStatus": "D",
                         "comments": [{"label": "Panel", "commentNumber": 1,
                                       "text": "Double tap &amp; missing cover.", "photos": [{}]}]}
                    ]
                },
                {
                    "order": 1,
                    "name": "Structural Systems",
                    "lineItems": [
                        {"order": 1, "name": "Foundations", "isDeficient": true, "comments": []},
                        {"order": 0, "name": "Grading", "comments": []}
                    ]
                }
            ]
        })
    }

    fn sample_sections() -> Vec<RawSection> {
        parse_report(&sample_root()).unwrap().sections
    }

    #[test]
    fn test_empty_sections_is_validation_error() {
        let err = compose_report(&[], &ReportMetadata::default(), &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_missing_sections_key_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");
        let err = render_report_from_json(&json!({"reportId": "x"}), None, &RenderOptions::default(), &dest)
            .unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = parse_report(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
        let err = parse_report(&json!({"sections": "nope"})).unwrap_err();
        assert!(matches!(err, ReportError::Input(_)));
    }

    #[test]
    fn test_compose_orders_sections_and_uses_metadata() {
        let root = sample_root();
        let input = parse_report(&root).unwrap();
        let composed = compose_report(&input.sections, &input.metadata, &RenderOptions::default()).unwrap();

        assert_eq!(composed.sections[0].name, "Structural Systems");
        assert_eq!(composed.sections[0].line_items[0].name, "Grading");
        assert_eq!(composed.page_count(), 1);

        let page = &composed.pages[0];
        assert!(page.contains_text("Report Identification: R-100"));
        assert!(page.contains_text("I. STRUCTURAL SYSTEMS"));
        assert!(page.contains_text("II. ELECTRICAL SYSTEMS"));
        assert!(page.contains_text("B. Foundations"));
        assert!(page.contains_text("1. Panel"));
        assert!(page.contains_text("Double tap & missing cover."));
        assert!(page.contains_text("See attached media (1 item)"));
        assert!(page.contains_text("Page 1 of 1"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_render_creates_directories_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("deeper").join("report.pdf");
        let path = render_inspection_report(
            &sample_sections(),
            &ReportMetadata::new("R-1"),
            &RenderOptions::default(),
            &dest,
        )
        .unwrap();

        assert_eq!(path, dest);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        // Only the final file remains in the directory
        let entries = std::fs::read_dir(dest.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_render_is_deterministic() {
        let sections = sample_sections();
        let metadata = ReportMetadata::new("R-2");
        let options = RenderOptions::default();
        let first = render_to_bytes(&sections, &metadata, &options).unwrap();
        let second = render_to_bytes(&sections, &metadata, &options).unwrap();
        assert_eq!(first, second);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_failed_render_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("report.pdf");
        let result = render_inspection_report(&[], &ReportMetadata::default(), &RenderOptions::default(), &dest);
        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_backend_unavailable_without_pdf_feature() {
        let err = render_to_bytes(&sample_sections(), &ReportMetadata::default(), &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, ReportError::BackendUnavailable(_)));
    }
}
