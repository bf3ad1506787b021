//! Loaded source documents.
//!
//! A [`SourceDocument`] keeps the raw bytes of a loaded PDF for as long as
//! any of its pages is part of a collection: export reparses those bytes
//! rather than holding parsed object graphs in memory.

use lopdf::Document;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{PdfDeckError, Result};
use crate::merge::pages;

/// Page size used when a page carries no usable MediaBox (US Letter).
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a loaded source document.
///
/// Two sources loaded from identical bytes still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src-{}", self.0)
    }
}

/// Size and orientation of a page as stored in its source document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    /// MediaBox width in points.
    pub width: f32,
    /// MediaBox height in points.
    pub height: f32,
    /// `/Rotate` value from the source, normalized to 0, 90, 180 or 270.
    pub rotation: i64,
}

/// A parsed-once, reparse-on-demand PDF document.
pub struct SourceDocument {
    id: SourceId,
    name: String,
    bytes: Arc<[u8]>,
    version: String,
    geometry: Vec<PageGeometry>,
}

impl SourceDocument {
    /// Parse document bytes and record what the collection needs to know.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::Load`] if the bytes are not a well-formed PDF,
    /// or [`PdfDeckError::EncryptedPdf`] if the document is encrypted.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let name = name.into();
        let bytes = bytes.into();

        let doc = Document::load_mem(&bytes).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                PdfDeckError::encrypted_pdf(name.clone())
            } else {
                PdfDeckError::load(name.clone(), err_msg)
            }
        })?;

        if doc.trailer.has(b"Encrypt") {
            return Err(PdfDeckError::encrypted_pdf(name));
        }

        let geometry = doc
            .get_pages()
            .into_values()
            .map(|page_id| page_geometry(&doc, page_id))
            .collect::<Vec<_>>();

        log::debug!(
            "parsed {} ({} bytes, PDF {}, {} pages)",
            name,
            bytes.len(),
            doc.version,
            geometry.len()
        );

        Ok(Self {
            id: SourceId::next(),
            name,
            bytes,
            version: doc.version.clone(),
            geometry,
        })
    }

    /// Reparse the retained bytes.
    pub fn open(&self) -> Result<Document> {
        Document::load_mem(&self.bytes).map_err(|e| PdfDeckError::export(&self.name, e.to_string()))
    }

    /// Identity used to group pages during export.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Human-readable name (usually the file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// PDF version string from the header, e.g. `"1.7"`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.geometry.len()
    }

    /// Geometry of the page at `index` (zero-based).
    pub fn geometry(&self, index: usize) -> Option<PageGeometry> {
        self.geometry.get(index).copied()
    }

    #[cfg(test)]
    pub(crate) fn unparsed(name: &str, bytes: &[u8], page_count: usize) -> Self {
        let (width, height) = DEFAULT_PAGE_SIZE;
        Self {
            id: SourceId::next(),
            name: name.to_string(),
            bytes: Arc::from(bytes),
            version: "1.4".to_string(),
            geometry: vec![
                PageGeometry {
                    width,
                    height,
                    rotation: 0,
                };
                page_count
            ],
        }
    }
}

impl fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDocument")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .field("version", &self.version)
            .field("page_count", &self.geometry.len())
            .finish()
    }
}

fn page_geometry(doc: &Document, page_id: lopdf::ObjectId) -> PageGeometry {
    let (width, height) = pages::inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| pages::resolve(doc, obj).as_array().ok())
        .and_then(|arr| {
            if arr.len() < 4 {
                return None;
            }
            let coords = arr
                .iter()
                .map(|v| pages::resolve(doc, v).as_float().ok())
                .collect::<Option<Vec<f32>>>()?;
            Some(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
        })
        .unwrap_or(DEFAULT_PAGE_SIZE);

    PageGeometry {
        width,
        height,
        rotation: pages::page_rotation(doc, page_id),
    }
}
