//! The ordered page collection and its selection.
//!
//! [`PageCollection`] owns the page sequence that defines the output order
//! together with the set of selected page ids. Every operation that removes
//! pages also removes them from the selection, so the selection can never
//! refer to a page that is no longer in the collection.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::collection::PageCollection;
//!
//! # fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut collection = PageCollection::new();
//! collection.load(bytes, "report.pdf")?;
//!
//! // Move the last page to the front and rotate it.
//! let last = collection.len() - 1;
//! collection.reorder(last, 0)?;
//! let first = collection.id_at(0).unwrap();
//! collection.toggle_select(first);
//! collection.rotate_selected();
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{PdfDeckError, Result};
use crate::page::{PageId, PagePreview, PageRecord, Rotation};
use crate::source::SourceDocument;

/// One row of the page table, suitable for display or JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// One-based position in the collection.
    pub position: usize,
    /// Record id.
    pub id: PageId,
    /// Source document name.
    pub source: String,
    /// One-based page number within the source.
    pub source_page: usize,
    /// Rotation accumulated in this session.
    pub rotation: Rotation,
    /// Whether the page is selected.
    pub selected: bool,
    /// Displayed size in points, after rotation.
    pub preview: Option<PagePreview>,
}

/// Ordered sequence of pages plus the current selection.
#[derive(Debug, Default)]
pub struct PageCollection {
    pages: Vec<PageRecord>,
    selection: BTreeSet<PageId>,
    next_id: u64,
}

impl PageCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `bytes` and append one record per page, in source order.
    ///
    /// Returns the newly appended records.
    ///
    /// # Errors
    ///
    /// Returns a load error if the bytes are not a well-formed document. Nothing
    /// is appended in that case.
    pub fn load(
        &mut self,
        bytes: impl Into<Arc<[u8]>>,
        source_name: impl Into<String>,
    ) -> Result<&[PageRecord]> {
        let source = SourceDocument::from_bytes(source_name, bytes)?;
        Ok(self.append_source(source))
    }

    /// Append every page of an already parsed source document.
    pub fn append_source(&mut self, source: SourceDocument) -> &[PageRecord] {
        let source = Arc::new(source);
        let start = self.pages.len();

        self.pages.reserve(source.page_count());
        for index in 0..source.page_count() {
            let id = self.allocate_id();
            self.pages.push(PageRecord::new(id, Arc::clone(&source), index));
        }

        log::info!(
            "appended {} page(s) from {} ({} total)",
            source.page_count(),
            source.name(),
            self.pages.len()
        );

        &self.pages[start..]
    }

    fn allocate_id(&mut self) -> PageId {
        self.next_id += 1;
        PageId(self.next_id)
    }

    /// Move the page at `from` so that it ends up at position `to`.
    ///
    /// The page is removed first, which shifts later pages down by one, then
    /// reinserted. `reorder(i, j)` followed by `reorder(j, i)` restores the
    /// original order.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::IndexOutOfBounds`] if either position is not
    /// smaller than [`len`](Self::len).
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.pages.len();
        if from >= len {
            return Err(PdfDeckError::index_out_of_bounds(from, len));
        }
        if to >= len {
            return Err(PdfDeckError::index_out_of_bounds(to, len));
        }
        if from == to {
            return Ok(());
        }

        let record = self.pages.remove(from);
        log::debug!("moving page {} from {} to {}", record.id(), from, to);
        self.pages.insert(to, record);
        Ok(())
    }

    /// Flip the selection state of `id`.
    ///
    /// Ids that are not in the collection are ignored.
    pub fn toggle_select(&mut self, id: PageId) {
        if !self.contains(id) {
            log::debug!("ignoring selection toggle for unknown page {id}");
            return;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Select every page.
    pub fn select_all(&mut self) {
        self.selection = self.pages.iter().map(PageRecord::id).collect();
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Rotate every selected page a quarter turn clockwise.
    ///
    /// Returns the number of pages rotated.
    pub fn rotate_selected(&mut self) -> usize {
        let mut rotated = 0;
        for record in self.pages.iter_mut() {
            if self.selection.contains(&record.id()) {
                record.rotate_clockwise();
                rotated += 1;
            }
        }
        rotated
    }

    /// Remove every selected page and clear the selection.
    ///
    /// Returns the number of pages removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }

        let before = self.pages.len();
        let selection = std::mem::take(&mut self.selection);
        self.pages.retain(|record| !selection.contains(&record.id()));

        let removed = before - self.pages.len();
        log::debug!("deleted {removed} page(s), {} remaining", self.pages.len());
        removed
    }

    /// Remove all pages and clear the selection.
    ///
    /// Ids are not reused after clearing.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.selection.clear();
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the collection has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in output order.
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// Iterate over pages in output order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.pages.iter()
    }

    /// Whether a page with this id is in the collection.
    pub fn contains(&self, id: PageId) -> bool {
        self.position(id).is_some()
    }

    /// Look up a page by id.
    pub fn get(&self, id: PageId) -> Option<&PageRecord> {
        self.pages.iter().find(|record| record.id() == id)
    }

    /// Zero-based position of a page.
    pub fn position(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|record| record.id() == id)
    }

    /// Id of the page at a zero-based position.
    pub fn id_at(&self, position: usize) -> Option<PageId> {
        self.pages.get(position).map(PageRecord::id)
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: PageId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected ids in ascending id order.
    pub fn selected_ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.selection.iter().copied()
    }

    /// Number of selected pages.
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Copy of the current page sequence.
    ///
    /// Records share source bytes with the collection, so this is cheap.
    pub fn snapshot(&self) -> Vec<PageRecord> {
        self.pages.clone()
    }

    /// Table rows describing the current state.
    pub fn page_summaries(&self) -> Vec<PageSummary> {
        self.pages
            .iter()
            .enumerate()
            .map(|(idx, record)| PageSummary {
                position: idx + 1,
                id: record.id(),
                source: record.source().name().to_string(),
                source_page: record.source_page_index() + 1,
                rotation: record.rotation(),
                selected: self.is_selected(record.id()),
                preview: record.preview(1.0),
            })
            .collect()
    }
}
