//! Page extraction
//!
//! Builds a copy of a document holding only the requested pages.

use std::collections::BTreeSet;

use lopdf::Document;
use tracing::debug;

use crate::error::{AssemblyError, Result};

/// Extract the given 1-based pages, keeping document order.
///
/// Every other page is deleted from a copy of the document, then objects no
/// longer reachable are pruned.
pub fn extract_pages(bytes: &[u8], pages: &[u32]) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(AssemblyError::InvalidRange("No pages specified".into()));
    }
    if pages.contains(&0) {
        return Err(AssemblyError::InvalidRange(
            "Page numbers must be >= 1".into(),
        ));
    }

    let mut doc = Document::load_mem(bytes).map_err(|e| AssemblyError::ParseError(e.to_string()))?;
    let page_count = doc.get_pages().len() as u32;

    if let Some(&page) = pages.iter().find(|&&p| p > page_count) {
        return Err(AssemblyError::InvalidRange(format!(
            "Page {} does not exist (document has {} pages)",
            page, page_count
        )));
    }

    let keep: BTreeSet<u32> = pages.iter().copied().collect();
    // Highest first so the remaining page numbers stay valid
    let delete: Vec<u32> = (1..=page_count).rev().filter(|p| !keep.contains(p)).collect();
    for page in &delete {
        doc.delete_pages(&[*page]);
    }

    doc.prune_objects();
    doc.compress();
    debug!(kept = keep.len(), deleted = delete.len(), "extracted pages");

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AssemblyError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}
