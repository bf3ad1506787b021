//! Shared helpers for the pdfdeck integration tests.
//!
//! Fixtures are generated with lopdf into a temporary directory, so the
//! tests need no binary files checked in.

use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding generated fixture documents.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Write a document with one page per width (height is always 500).
    pub fn document(&self, name: &str, widths: &[i64]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, document_bytes(widths, None)).expect("Failed to write fixture");
        path
    }

    /// Like [`Fixtures::document`], with `/Rotate` set on the page tree root.
    pub fn rotated_document(&self, name: &str, widths: &[i64], rotate: i64) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, document_bytes(widths, Some(rotate)))
            .expect("Failed to write fixture");
        path
    }

    /// Write arbitrary bytes under `name`.
    pub fn raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("Failed to write fixture");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Serialize a document whose pages inherit Resources and (optionally)
/// Rotate from the page tree root.
pub fn document_bytes(widths: &[i64], rotate: Option<i64>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = widths
        .iter()
        .map(|width| {
            let text = format!("BT /F1 12 Tf 20 20 Td (page {width}) Tj ET");
            let content_id = doc.add_object(Stream::new(Dictionary::new(), text.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), (*width).into(), 500.into()],
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    let mut root = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    };
    if let Some(rotate) = rotate {
        root.set("Rotate", rotate);
    }
    doc.objects.insert(pages_id, Object::Dictionary(root));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture");
    bytes
}

/// Page widths of a serialized document, in page order.
pub fn page_widths(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("Output should parse");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("Page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("Copied pages carry a MediaBox");
            media_box[2].as_i64().expect("Integer width")
        })
        .collect()
}

/// `/Rotate` of every page in a serialized document, 0 when absent.
pub fn page_rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("Output should parse");
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .ok()
                .and_then(|page| page.get(b"Rotate").ok())
                .and_then(|rotate| rotate.as_i64().ok())
                .unwrap_or(0)
        })
        .collect()
}
