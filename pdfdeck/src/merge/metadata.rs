//! Document information (Info dictionary) for exported documents.
//!
//! Handles Title, Author, Subject and Keywords from [`Metadata`], plus
//! Creator, Producer and creation/modification dates.

use crate::config::Metadata;
use crate::error::Result;
use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

/// Manager for PDF metadata.
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Write `metadata` into the document's Info dictionary.
    ///
    /// Does nothing when `metadata` is empty, so exports without metadata
    /// stay byte-for-byte reproducible. Otherwise only non-empty fields are
    /// set, along with Creator, Producer and the current time as creation and
    /// modification dates.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfdeck::merge::metadata::MetadataManager;
    /// # use pdfdeck::config::Metadata;
    /// # use lopdf::Document;
    /// # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = MetadataManager::new();
    /// let metadata = Metadata::new(Some("Quarterly report".to_string()), None, None, None);
    /// manager.set_metadata(&mut doc, &metadata)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_metadata(&self, doc: &mut Document, metadata: &Metadata) -> Result<()> {
        self.set_metadata_at(doc, metadata, Utc::now())
    }

    fn set_metadata_at(
        &self,
        doc: &mut Document,
        metadata: &Metadata,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if metadata.is_empty() {
            return Ok(());
        }

        let info_id = info_id(doc);
        let mut info = doc
            .get_dictionary(info_id)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new());

        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.set(key, text_string(value));
            }
        }

        info.set("Creator", text_string(crate::NAME));
        info.set(
            "Producer",
            text_string(&format!("{} {}", crate::NAME, crate::VERSION)),
        );

        let date = format_pdf_date(now);
        info.set("CreationDate", text_string(&date));
        info.set("ModDate", text_string(&date));

        doc.objects.insert(info_id, Object::Dictionary(info));
        Ok(())
    }

    /// Read Title, Author, Subject and Keywords back from a document.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok()
        else {
            return Metadata::default();
        };

        Metadata::new(
            string_field(info, b"Title"),
            string_field(info, b"Author"),
            string_field(info, b"Subject"),
            string_field(info, b"Keywords"),
        )
    }

    /// Check if a document has an Info dictionary.
    pub fn has_metadata(&self, doc: &Document) -> bool {
        doc.trailer.has(b"Info")
    }
}

impl Default for MetadataManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Existing Info object id, or a fresh one linked from the trailer.
fn info_id(doc: &mut Document) -> ObjectId {
    if let Ok(id) = doc.trailer.get(b"Info").and_then(Object::as_reference) {
        return id;
    }
    let id = doc.new_object_id();
    doc.trailer.set("Info", Object::Reference(id));
    id
}

/// Encode `value` as a PDF text string.
///
/// ASCII stays a literal string. Anything else is written as UTF-16BE with a
/// byte order mark so viewers do not read it as PDFDocEncoding.
pub(crate) fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend(unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Decode a PDF text string written by [`text_string`] or any UTF-8 source.
pub(crate) fn decode_text_string(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        _ => String::from_utf8(bytes.to_vec()).ok(),
    }
}

fn string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => decode_text_string(bytes),
        _ => None,
    }
}

/// Format a timestamp as a PDF date string in UTC: `D:YYYYMMDDHHmmSSZ`.
fn format_pdf_date(date: DateTime<Utc>) -> String {
    date.format("D:%Y%m%d%H%M%SZ").to_string()
}
