//! Reading source documents from disk.
//!
//! This module provides:
//! - Async file reads with parsing moved onto the blocking pool
//! - Bounded concurrent batch reads that keep input order
//! - Appending a batch into a [`PageCollection`] with error recovery
//! - Detailed load statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::collection::PageCollection;
//! use pdfdeck::io::reader::SourceReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = SourceReader::new();
//! let mut collection = PageCollection::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let report = reader.load_into(&mut collection, &paths, 4, false).await?;
//! println!("{} pages loaded", report.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::collection::PageCollection;
use crate::error::{PdfDeckError, Result};
use crate::io::format_file_size;
use crate::source::SourceDocument;

/// A source document read from disk.
#[derive(Debug)]
pub struct LoadedSource {
    /// The parsed document.
    pub source: SourceDocument,

    /// Path the document was read from.
    pub path: PathBuf,

    /// Time taken to read and parse the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedSource {
    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.source.page_count()
    }
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedSource>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone, Default)]
pub struct LoadStatistics {
    /// Number of documents successfully loaded.
    pub success_count: usize,

    /// Number of documents that failed to load.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Average time per successful load.
    pub average_time: Duration,

    /// Total size of successfully loaded files.
    pub total_size: u64,

    /// Total number of pages loaded.
    pub total_pages: usize,
}

impl LoadStatistics {
    /// Create statistics from load results.
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut stats = Self {
            total_time,
            ..Self::default()
        };
        let mut total_load_time = Duration::ZERO;

        for result in results {
            match result {
                Ok(loaded) => {
                    stats.success_count += 1;
                    stats.total_size += loaded.file_size;
                    stats.total_pages += loaded.page_count();
                    total_load_time += loaded.load_time;
                }
                Err(_) => stats.failure_count += 1,
            }
        }

        if stats.success_count > 0 {
            stats.average_time = total_load_time / stats.success_count as u32;
        }

        stats
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Outcome of [`SourceReader::load_into`].
#[derive(Debug)]
pub struct LoadReport {
    /// Aggregate statistics over every input.
    pub statistics: LoadStatistics,

    /// Errors for inputs that were skipped.
    pub skipped: Vec<PdfDeckError>,
}

/// Reads PDF files into [`SourceDocument`]s.
#[derive(Debug, Clone, Default)]
pub struct SourceReader;

impl SourceReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a single document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist or is not a regular file
    /// - The file cannot be read
    /// - The file is not a valid PDF, or is encrypted
    pub async fn read(&self, path: &Path) -> Result<LoadedSource> {
        let start = Instant::now();

        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PdfDeckError::file_not_found(path.to_path_buf()),
            _ => PdfDeckError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if !metadata.is_file() {
            return Err(PdfDeckError::not_a_file(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PdfDeckError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;

        let name = display_name(path);
        let source = tokio::task::spawn_blocking(move || SourceDocument::from_bytes(name, bytes))
            .await
            .map_err(|e| PdfDeckError::other(format!("Parser task failed: {e}")))??;

        let load_time = start.elapsed();
        log::debug!(
            "read {} ({} pages) in {:?}",
            path.display(),
            source.page_count(),
            load_time
        );

        Ok(LoadedSource {
            source,
            path: path.to_path_buf(),
            load_time,
            file_size: metadata.len(),
        })
    }

    /// Read many documents with at most `jobs` reads in flight.
    ///
    /// # Returns
    ///
    /// One result per input path, in input order, together with aggregate
    /// statistics.
    pub async fn read_all(
        &self,
        paths: &[PathBuf],
        jobs: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();

        let results = stream::iter(paths.iter().map(|path| self.read(path)))
            .buffered(jobs.max(1))
            .collect::<Vec<_>>()
            .await;

        let stats = LoadStatistics::from_results(&results, start.elapsed());
        (results, stats)
    }

    /// Read `paths` and append their pages to `collection` in input order.
    ///
    /// When a document fails to load and `continue_on_error` is set, it is
    /// skipped and reported in [`LoadReport::skipped`]. Otherwise the error
    /// is returned; documents before it remain appended and nothing after it
    /// is.
    ///
    /// # Errors
    ///
    /// Returns the first load error unless `continue_on_error` is set and the
    /// error only concerns that input.
    pub async fn load_into(
        &self,
        collection: &mut PageCollection,
        paths: &[PathBuf],
        jobs: usize,
        continue_on_error: bool,
    ) -> Result<LoadReport> {
        let (results, statistics) = self.read_all(paths, jobs).await;
        let mut skipped = Vec::new();

        for result in results {
            match result {
                Ok(loaded) => {
                    collection.append_source(loaded.source);
                }
                Err(e) if continue_on_error && e.is_recoverable() => {
                    log::warn!("skipping input: {e}");
                    skipped.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(LoadReport {
            statistics,
            skipped,
        })
    }
}

/// File name used to label pages from `path`.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
