//! Complete report assembly: filled cover + sample pages + detail report

use inspection_report::ReportMetadata;
use tracing::{debug, info};

use crate::error::Result;
use crate::extract::extract_pages;
use crate::fill::{fill_cover_fields, CoverLayout};
use crate::get_page_count;
use crate::merge::merge_documents;

/// Everything needed to build a complete report
#[derive(Debug, Clone)]
pub struct AssemblyInputs<'a> {
    /// Blank form; its first page becomes the filled cover
    pub template: &'a [u8],
    /// Optional pre-filled form supplying the standard pages after the cover
    pub sample: Option<&'a [u8]>,
    /// 1-based pages taken from `sample`; pages past its end are skipped
    pub sample_pages: Vec<u32>,
    /// Generated detail report
    pub detail: &'a [u8],
    pub metadata: &'a ReportMetadata,
    pub cover: &'a CoverLayout,
}

impl<'a> AssemblyInputs<'a> {
    pub fn new(template: &'a [u8], detail: &'a [u8], metadata: &'a ReportMetadata, cover: &'a CoverLayout) -> Self {
        Self {
            template,
            sample: None,
            sample_pages: vec![2, 3, 4],
            detail,
            metadata,
            cover,
        }
    }

    pub fn with_sample(mut self, sample: &'a [u8], pages: Vec<u32>) -> Self {
        self.sample = Some(sample);
        self.sample_pages = pages;
        self
    }
}

/// Build cover page 1, then the sample pages, then the detail report
pub fn assemble_complete_report(inputs: &AssemblyInputs<'_>) -> Result<Vec<u8>> {
    let filled = fill_cover_fields(inputs.template, inputs.metadata, inputs.cover)?;
    let mut parts = vec![extract_pages(&filled, &[1])?];

    if let Some(sample) = inputs.sample {
        let available = get_page_count(sample)?;
        let pages: Vec<u32> = inputs
            .sample_pages
            .iter()
            .copied()
            .filter(|&p| p >= 1 && p <= available)
            .collect();
        if pages.is_empty() {
            debug!(available, requested = ?inputs.sample_pages, "no sample pages in range");
        } else {
            parts.push(extract_pages(sample, &pages)?);
        }
    }

    parts.push(inputs.detail.to_vec());
    let sections = parts.len();
    let assembled = merge_documents(parts)?;

    info!(
        parts = sections,
        pages = get_page_count(&assembled)?,
        report_id = %inputs.metadata.report_id,
        "assembled complete report"
    );
    Ok(assembled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;
    use crate::testing::{create_test_pdf, page_texts};

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            property_address: Some("12 Oak Lane".into()),
            ..ReportMetadata::new("R-9")
        }
    }

    #[test]
    fn test_cover_then_detail() {
        let template = create_test_pdf(4, "Blank");
        let detail = create_test_pdf(3, "Detail");
        let metadata = metadata();
        let cover = CoverLayout::trec();

        let inputs = AssemblyInputs::new(&template, &detail, &metadata, &cover);
        let assembled = assemble_complete_report(&inputs).unwrap();

        let texts = page_texts(&assembled);
        assert_eq!(texts.len(), 4);
        assert!(texts[0].contains("Blank-Page-1"));
        assert!(texts[0].contains("(12 Oak Lane)"));
        assert!(texts[1].contains("Detail-Page-1"));
        assert!(texts[3].contains("Detail-Page-3"));
    }

    #[test]
    fn test_sample_pages_inserted_after_cover() {
        let template = create_test_pdf(4, "Blank");
        let sample = create_test_pdf(6, "Sample");
        let detail = create_test_pdf(2, "Detail");
        let metadata = metadata();
        let cover = CoverLayout::trec();

        let inputs =
            AssemblyInputs::new(&template, &detail, &metadata, &cover).with_sample(&sample, vec![2, 3, 4]);
        let texts = page_texts(&assemble_complete_report(&inputs).unwrap());

        assert_eq!(texts.len(), 1 + 3 + 2);
        assert!(texts[1].contains("Sample-Page-2"));
        assert!(texts[3].contains("Sample-Page-4"));
        assert!(texts[4].contains("Detail-Page-1"));
    }

    #[test]
    fn test_short_sample_is_clipped() {
        let template = create_test_pdf(1, "Blank");
        let sample = create_test_pdf(2, "Sample");
        let detail = create_test_pdf(1, "Detail");
        let metadata = metadata();
        let cover = CoverLayout::trec();

        let inputs =
            AssemblyInputs::new(&template, &detail, &metadata, &cover).with_sample(&sample, vec![2, 3, 4]);
        let texts = page_texts(&assemble_complete_report(&inputs).unwrap());
        assert_eq!(texts.len(), 3);
        assert!(texts[1].contains("Sample-Page-2"));
    }

    #[test]
    fn test_missing_address_fails() {
        let template = create_test_pdf(1, "Blank");
        let detail = create_test_pdf(1, "Detail");
        let metadata = ReportMetadata::new("R-10");
        let cover = CoverLayout::trec();

        let inputs = AssemblyInputs::new(&template, &detail, &metadata, &cover);
        assert!(matches!(
            assemble_complete_report(&inputs),
            Err(AssemblyError::MissingField(_))
        ));
    }
}
