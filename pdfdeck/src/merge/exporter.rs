//! Building one output document from a page collection.
//!
//! The exporter walks a snapshot of the collection, groups its pages by
//! source document so that each source is reparsed once, copies every page
//! into a fresh document and lays them out in collection order.

use lopdf::{Document, ObjectId, dictionary};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::collection::PageCollection;
use crate::config::{CompressionLevel, Config, Metadata};
use crate::error::{PdfDeckError, Result};
use crate::io::format_file_size;
use crate::merge::bookmarks::BookmarkManager;
use crate::merge::metadata::MetadataManager;
use crate::merge::pages::PageCopier;
use crate::page::PageRecord;
use crate::source::{SourceDocument, SourceId};

/// Post-processing applied to the exported document.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Add one bookmark per run of pages from the same source.
    pub bookmarks: bool,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Metadata to set on the output document.
    pub metadata: Metadata,
}

impl ExportOptions {
    /// Take export settings from a session configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            bookmarks: config.bookmarks,
            compression: config.compression,
            metadata: config.metadata.clone(),
        }
    }
}

/// Statistics about an export.
#[derive(Debug, Clone)]
pub struct ExportStatistics {
    /// Number of distinct source documents pages were taken from.
    pub sources: usize,

    /// Number of pages in the output.
    pub total_pages: usize,

    /// Number of bookmarks added.
    pub bookmarks_added: usize,

    /// Whether stream compression was applied.
    pub compressed: bool,

    /// Size of the serialized output.
    pub output_size: u64,

    /// Time taken to build and serialize the output.
    pub export_time: Duration,
}

impl ExportStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Serialized output plus statistics.
#[derive(Debug)]
pub struct ExportResult {
    /// The output PDF.
    pub bytes: Vec<u8>,

    /// Statistics about the export.
    pub statistics: ExportStatistics,
}

/// Pages of one source together with their output positions.
struct SourceGroup<'a> {
    source: Arc<SourceDocument>,
    pages: Vec<(usize, &'a PageRecord)>,
}

/// Combines the pages of a collection into a single document.
pub struct MergeExporter {
    options: ExportOptions,
    page_copier: PageCopier,
    bookmark_manager: BookmarkManager,
    metadata_manager: MetadataManager,
}

impl MergeExporter {
    /// Create an exporter with the given options.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            page_copier: PageCopier::new(),
            bookmark_manager: BookmarkManager::new(),
            metadata_manager: MetadataManager::new(),
        }
    }

    /// Export options in use.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export the current contents of `collection`.
    ///
    /// The collection is snapshotted and the export runs on the blocking
    /// pool.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::EmptyCollection`] if there are no pages, or
    /// [`PdfDeckError::Export`] if any source fails to reparse or lacks a
    /// referenced page. No partial output is produced.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfdeck::collection::PageCollection;
    /// # use pdfdeck::merge::{ExportOptions, MergeExporter};
    /// # async fn example(collection: PageCollection) -> Result<(), Box<dyn std::error::Error>> {
    /// let exporter = MergeExporter::new(ExportOptions::default());
    /// let result = exporter.export(&collection).await?;
    /// println!("{} pages, {}", result.statistics.total_pages,
    ///          result.statistics.format_output_size());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn export(&self, collection: &PageCollection) -> Result<ExportResult> {
        if collection.is_empty() {
            return Err(PdfDeckError::EmptyCollection);
        }

        let snapshot = collection.snapshot();
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || MergeExporter::new(options).export_snapshot(&snapshot))
            .await
            .map_err(|e| PdfDeckError::other(format!("Export task failed: {e}")))?
    }

    /// Export a sequence of page records synchronously.
    pub fn export_snapshot(&self, pages: &[PageRecord]) -> Result<ExportResult> {
        let start = Instant::now();

        if pages.is_empty() {
            return Err(PdfDeckError::EmptyCollection);
        }

        let version = pages
            .iter()
            .map(|record| record.source().version())
            .max()
            .unwrap_or("1.5");
        let mut output = Document::with_version(version);
        let pages_id = output.new_object_id();

        let groups = group_by_source(pages);
        let mut slots: Vec<Option<ObjectId>> = vec![None; pages.len()];

        for group in groups.values() {
            self.copy_group(&mut output, pages_id, group, &mut slots)?;
        }

        let kids = slots
            .into_iter()
            .collect::<Option<Vec<ObjectId>>>()
            .ok_or_else(|| PdfDeckError::other("Export left an output position unfilled"))?;

        self.page_copier.write_page_tree(&mut output, pages_id, &kids);
        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        let bookmarks_added = if self.options.bookmarks {
            let entries = self.bookmark_manager.entries_for_runs(
                pages
                    .iter()
                    .zip(&kids)
                    .map(|(record, id)| (record.source().id(), record.source().name().to_string(), *id)),
            );
            self.bookmark_manager.add_outline(&mut output, &entries)?
        } else {
            0
        };

        self.metadata_manager
            .set_metadata(&mut output, &self.options.metadata)?;

        match self.options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => output.compress(),
            CompressionLevel::Maximum => {
                output.compress();
                let pruned = output.prune_objects();
                log::debug!("pruned {} unreachable object(s)", pruned.len());
            }
        }

        output.renumber_objects();

        let mut bytes = Vec::new();
        output
            .save_to(&mut bytes)
            .map_err(|e| PdfDeckError::other(format!("Failed to serialize output: {e}")))?;

        let statistics = ExportStatistics {
            sources: groups.len(),
            total_pages: kids.len(),
            bookmarks_added,
            compressed: self.options.compression != CompressionLevel::None,
            output_size: bytes.len() as u64,
            export_time: start.elapsed(),
        };

        log::info!(
            "exported {} page(s) from {} source(s), {}",
            statistics.total_pages,
            statistics.sources,
            statistics.format_output_size()
        );

        Ok(ExportResult { bytes, statistics })
    }

    /// Reparse one source and copy its pages into their output slots.
    fn copy_group(
        &self,
        output: &mut Document,
        pages_id: ObjectId,
        group: &SourceGroup<'_>,
        slots: &mut [Option<ObjectId>],
    ) -> Result<()> {
        let source = &group.source;
        let mut doc = source.open()?;
        doc.renumber_objects_with(output.max_id + 1);

        let source_pages = doc.get_pages();
        let placed = group
            .pages
            .iter()
            .map(|&(dest, record)| {
                let page_number = record.source_page_index() as u32 + 1;
                source_pages
                    .get(&page_number)
                    .map(|&page_id| (dest, record, page_id))
                    .ok_or_else(|| {
                        PdfDeckError::export(
                            source.name(),
                            format!(
                                "page {page_number} not found (document has {} pages)",
                                source_pages.len()
                            ),
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let exported: BTreeSet<ObjectId> = placed.iter().map(|&(_, _, id)| id).collect();

        for (dest, record, page_id) in placed {
            let copied = self
                .page_copier
                .copy_page(output, &doc, page_id, pages_id, record.rotation(), &exported)
                .map_err(|e| PdfDeckError::export(source.name(), e.to_string()))?;
            slots[dest] = Some(copied);
        }

        output.max_id = output.max_id.max(doc.max_id);
        log::debug!(
            "copied {} page(s) from {}",
            group.pages.len(),
            source.name()
        );

        Ok(())
    }
}

impl Default for MergeExporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

fn group_by_source(pages: &[PageRecord]) -> BTreeMap<SourceId, SourceGroup<'_>> {
    let mut groups: BTreeMap<SourceId, SourceGroup<'_>> = BTreeMap::new();
    for (dest, record) in pages.iter().enumerate() {
        groups
            .entry(record.source().id())
            .or_insert_with(|| SourceGroup {
                source: Arc::clone(record.source()),
                pages: Vec::new(),
            })
            .pages
            .push((dest, record));
    }
    groups
}
