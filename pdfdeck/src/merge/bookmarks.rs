//! Bookmark (outline) generation for exported documents.
//!
//! One bookmark is created per run of consecutive output pages taken from
//! the same source document, titled with the source name.

use crate::error::{PdfDeckError, Result};
use crate::merge::metadata::text_string;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// A bookmark to create: title and destination page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Text shown in the outline.
    pub title: String,
    /// Page the bookmark jumps to.
    pub page_id: ObjectId,
}

/// Manager for PDF bookmarks (outlines).
pub struct BookmarkManager;

impl BookmarkManager {
    /// Create a new bookmark manager.
    pub fn new() -> Self {
        Self
    }

    /// Collapse per-page labels into one entry per run of equal labels.
    ///
    /// `pages` pairs each output page, in order, with a run key and the title
    /// for that run. A new entry starts whenever the key changes.
    pub fn entries_for_runs<K: PartialEq>(
        &self,
        pages: impl IntoIterator<Item = (K, String, ObjectId)>,
    ) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        let mut current: Option<K> = None;

        for (key, title, page_id) in pages {
            if current.as_ref() != Some(&key) {
                entries.push(OutlineEntry { title, page_id });
                current = Some(key);
            }
        }

        entries
    }

    /// Write an outline with `entries` into `doc` and link it from the catalog.
    ///
    /// Returns the number of bookmarks added.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no catalog.
    pub fn add_outline(&self, doc: &mut Document, entries: &[OutlineEntry]) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let outline_id = doc.new_object_id();
        let item_ids: Vec<ObjectId> = entries.iter().map(|_| doc.new_object_id()).collect();

        for (idx, entry) in entries.iter().enumerate() {
            let dest = vec![
                Object::Reference(entry.page_id),
                Object::Name(b"XYZ".to_vec()),
                Object::Null,
                Object::Null,
                Object::Null,
            ];

            let mut item = Dictionary::new();
            item.set("Title", text_string(&entry.title));
            item.set("Parent", Object::Reference(outline_id));
            item.set("Dest", Object::Array(dest));
            if idx > 0 {
                item.set("Prev", Object::Reference(item_ids[idx - 1]));
            }
            if let Some(next) = item_ids.get(idx + 1) {
                item.set("Next", Object::Reference(*next));
            }

            doc.objects.insert(item_ids[idx], Object::Dictionary(item));
        }

        let mut outline = Dictionary::new();
        outline.set("Type", Object::Name(b"Outlines".to_vec()));
        outline.set("Count", Object::Integer(item_ids.len() as i64));
        outline.set("First", Object::Reference(item_ids[0]));
        outline.set("Last", Object::Reference(item_ids[item_ids.len() - 1]));
        doc.objects.insert(outline_id, Object::Dictionary(outline));

        let catalog = doc
            .catalog_mut()
            .map_err(|e| PdfDeckError::other(format!("Failed to get catalog: {e}")))?;
        catalog.set("Outlines", Object::Reference(outline_id));
        catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

        Ok(item_ids.len())
    }

    /// Check if a document has bookmarks.
    pub fn has_bookmarks(&self, doc: &Document) -> bool {
        doc.catalog().is_ok_and(|catalog| catalog.has(b"Outlines"))
    }
}

impl Default for BookmarkManager {
    fn default() -> Self {
        Self::new()
    }
}
