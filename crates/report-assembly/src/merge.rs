//! PDF Merge algorithm
//!
//! Combines multiple PDFs into a single document.

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::{AssemblyError, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Merge multiple PDFs into one, pages in argument order
///
/// The algorithm:
/// 1. If empty, return error
/// 2. If single document, return it as-is
/// 3. Copy inherited page attributes onto every page, since pages are
///    re-parented under one flat page tree
/// 4. Use the first document as the destination; for each other document:
///    a. Offset its object IDs past the destination's to avoid conflicts
///    b. Import all objects with remapped references
///    c. Append its pages to the destination page list
/// 5. Rebuild the page tree, drop unreachable objects, compress
pub fn merge_documents(documents: Vec<Vec<u8>>) -> Result<Vec<u8>> {
    if documents.is_empty() {
        return Err(AssemblyError::OperationError("No documents to merge".into()));
    }

    if documents.len() == 1 {
        return Ok(documents.into_iter().next().unwrap_or_default());
    }

    let mut loaded_docs = Vec::with_capacity(documents.len());
    for (i, doc_bytes) in documents.iter().enumerate() {
        let mut doc = Document::load_mem(doc_bytes).map_err(|e| {
            AssemblyError::ParseError(format!("Failed to load document {}: {}", i, e))
        })?;
        materialize_inherited(&mut doc);
        loaded_docs.push(doc);
    }

    let mut dest = loaded_docs.remove(0);
    let mut dest_max_id = dest.max_id;
    let mut dest_page_refs = page_references(&dest);

    for source in loaded_docs {
        let source_pages = page_references(&source);
        let id_offset = dest_max_id;

        for (old_id, object) in source.objects {
            let new_id = (old_id.0 + id_offset, old_id.1);
            dest.objects.insert(new_id, remap_object_refs(object, id_offset));
        }

        dest_page_refs.extend(
            source_pages
                .into_iter()
                .map(|(num, gen)| (num + id_offset, gen)),
        );

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
    }

    dest.max_id = dest_max_id;
    let page_count = dest_page_refs.len();
    update_page_tree(&mut dest, dest_page_refs)?;

    dest.prune_objects();
    dest.compress();
    debug!(documents = documents.len(), pages = page_count, "merged documents");

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| AssemblyError::OperationError(format!("Failed to save merged PDF: {}", e)))?;

    Ok(buffer)
}

/// All page object references, in page order
fn page_references(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Look up an inheritable attribute on the page or its nearest ancestor
pub(crate) fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    if let Ok(value) = page.get(key) {
        return Some(value.clone());
    }

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Bounded walk in case of a cyclic page tree
    for _ in 0..64 {
        let node = doc.get_object(parent?).and_then(Object::as_dict).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Copy inherited attributes onto each page dictionary
fn materialize_inherited(doc: &mut Document) {
    for page_id in page_references(doc) {
        let Ok(page) = doc.get_object(page_id).and_then(Object::as_dict) else {
            continue;
        };
        let missing: Vec<(&[u8], Object)> = INHERITABLE
            .iter()
            .filter(|key| !page.has(key))
            .filter_map(|key| inherited_attribute(doc, page, key).map(|value| (*key, value)))
            .collect();

        if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
            for (key, value) in missing {
                page.set(key.to_vec(), value);
            }
        }
    }
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(dict) => Object::Dictionary(remap_dict(dict, offset)),
        Object::Stream(mut stream) => {
            stream.dict = remap_dict(stream.dict, offset);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dict(dict: Dictionary, offset: u32) -> Dictionary {
    dict.into_iter()
        .map(|(key, value)| (key.clone(), remap_object_refs(value.clone(), offset)))
        .collect()
}

/// Point the destination's root page node at `page_refs` and re-parent them
fn update_page_tree(doc: &mut Document, page_refs: Vec<ObjectId>) -> Result<()> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| AssemblyError::OperationError("No Root reference in trailer".into()))?;

    let pages_id = doc
        .get_object(catalog_id)
        .and_then(Object::as_dict)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| AssemblyError::OperationError("No Pages reference in catalog".into()))?;

    for page_id in &page_refs {
        if let Ok(page) = doc.get_object_mut(*page_id).and_then(Object::as_dict_mut) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let pages_dict = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| AssemblyError::OperationError("Invalid pages dictionary".into()))?;

    pages_dict.set("Count", Object::Integer(page_refs.len() as i64));
    pages_dict.set(
        "Kids",
        Object::Array(page_refs.into_iter().map(Object::Reference).collect()),
    );

    Ok(())
}
