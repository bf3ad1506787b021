//! pdfdeck - Collect pages from several PDF documents into one.
//!
//! This library keeps an ordered collection of pages taken from any number
//! of loaded documents. Pages can be reordered, rotated, selected and
//! deleted, and the collection is exported as a single merged PDF. It
//! provides:
//!
//! - A [`PageCollection`] with a selection that always tracks live pages
//! - A small edit-command language ([`EditCommand`]) over the collection
//! - Export grouped by source document, with optional bookmarks, metadata
//!   and compression
//! - Async file I/O on tokio
//!
//! # Examples
//!
//! ## Editing and exporting
//!
//! ```no_run
//! use pdfdeck::{MergeExporter, PageCollection};
//! use pdfdeck::merge::ExportOptions;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut collection = PageCollection::new();
//! collection.load(a, "a.pdf")?;
//! collection.load(b, "b.pdf")?;
//!
//! // Move the last page to the front and rotate it.
//! collection.reorder(collection.len() - 1, 0)?;
//! let first = collection.id_at(0).expect("collection is not empty");
//! collection.toggle_select(first);
//! collection.rotate_selected();
//!
//! let exporter = MergeExporter::new(ExportOptions::default());
//! let result = exporter.export(&collection).await?;
//! println!("Exported {} pages", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Loading files and applying an edit script
//!
//! ```no_run
//! use pdfdeck::{EditCommand, PageCollection};
//! use pdfdeck::io::{PdfWriter, SourceReader};
//! use pdfdeck::merge::MergeExporter;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let mut collection = PageCollection::new();
//! SourceReader::new().load_into(&mut collection, &paths, 4, false).await?;
//!
//! let script = EditCommand::parse_script("select 1-2\ndelete\nmove 3 1\n")?;
//! pdfdeck::edit::apply_all(&script, &mut collection)?;
//!
//! let result = MergeExporter::default().export(&collection).await?;
//! PdfWriter::new().save_bytes(result.bytes, &PathBuf::from("out.pdf")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod edit;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod page;
pub mod prefs;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use collection::{PageCollection, PageSummary};
pub use config::Config;
pub use edit::EditCommand;
pub use error::{PdfDeckError, Result};
pub use merge::MergeExporter;
pub use page::{PageId, PagePreview, PageRecord, Rotation};
pub use prefs::Preferences;
pub use source::{SourceDocument, SourceId};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
