//! Post-processing for finished inspection report PDFs
//!
//! Fills the cover page of a blank form template, extracts sample pages,
//! and merges everything with the generated detail report using lopdf.

pub mod assemble;
pub mod error;
pub mod extract;
pub mod fill;
pub mod merge;

#[cfg(test)]
pub(crate) mod testing;

pub use assemble::{assemble_complete_report, AssemblyInputs};
pub use error::{AssemblyError, Result};
pub use extract::extract_pages;
pub use fill::{fill_cover_fields, CoverField, CoverKey, CoverLayout};
pub use merge::merge_documents;

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32> {
    let doc =
        lopdf::Document::load_mem(bytes).map_err(|e| AssemblyError::ParseError(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}

/// Parse a page range string like "2-4" or "1, 3-5" into sorted unique
/// 1-based page numbers
pub fn parse_ranges(input: &str) -> Result<Vec<u32>> {
    use std::collections::BTreeSet;

    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page(start)?, parse_page(end)?),
            None => {
                let page = parse_page(part)?;
                (page, page)
            }
        };

        if start > end {
            return Err(AssemblyError::InvalidRange(format!(
                "Start {} > end {}",
                start, end
            )));
        }
        pages.extend(start..=end);
    }

    Ok(pages.into_iter().collect())
}

fn parse_page(text: &str) -> Result<u32> {
    match text.trim().parse::<u32>() {
        Ok(0) => Err(AssemblyError::InvalidRange("Page numbers must be >= 1".into())),
        Ok(page) => Ok(page),
        Err(_) => Err(AssemblyError::InvalidRange(format!("Invalid page: {}", text.trim()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_single_range() {
        assert_eq!(parse_ranges("2-4").unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_parse_mixed_ranges_dedupes() {
        assert_eq!(parse_ranges("5, 1-3, 2").unwrap(), vec![1, 2, 3, 5]);
        assert_eq!(parse_ranges("").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_parse_rejects_bad_ranges() {
        assert!(matches!(parse_ranges("4-2"), Err(AssemblyError::InvalidRange(_))));
        assert!(matches!(parse_ranges("0"), Err(AssemblyError::InvalidRange(_))));
        assert!(matches!(parse_ranges("a-b"), Err(AssemblyError::InvalidRange(_))));
    }

    proptest! {
        #[test]
        fn parsed_ranges_cover_every_page(start in 1u32..500, len in 0u32..50) {
            let end = start + len;
            let pages = parse_ranges(&format!("{}-{}", start, end)).unwrap();
            prop_assert_eq!(pages.len() as u32, len + 1);
            prop_assert_eq!(pages.first().copied(), Some(start));
            prop_assert_eq!(pages.last().copied(), Some(end));
        }
    }

    #[test]
    fn test_page_count() {
        let pdf = testing::create_test_pdf(3, "Count");
        assert_eq!(get_page_count(&pdf).unwrap(), 3);
        assert!(matches!(get_page_count(b"not a pdf"), Err(AssemblyError::ParseError(_))));
    }
}
