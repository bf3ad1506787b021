//! Export of a page collection into a single PDF.
//!
//! - [`exporter`]: grouping by source, slot assembly, post-processing
//! - [`pages`]: page copying and page tree helpers
//! - [`bookmarks`]: outline entries per source run
//! - [`metadata`]: Info dictionary

pub mod bookmarks;
pub mod exporter;
pub mod metadata;
pub mod pages;

pub use exporter::{ExportOptions, ExportResult, ExportStatistics, MergeExporter};
