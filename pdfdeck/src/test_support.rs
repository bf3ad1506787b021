//! PDF fixtures generated with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// One page of a generated fixture.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageSpec {
    pub width: i64,
    pub rotate: Option<i64>,
    /// Index of a page this page links to.
    pub link: Option<usize>,
}

impl PageSpec {
    /// A `width` x 500 page without a Rotate entry.
    pub fn new(width: i64) -> Self {
        Self {
            width,
            rotate: None,
            link: None,
        }
    }

    pub fn rotated(mut self, degrees: i64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    /// Add a link annotation whose destination is page `index`.
    pub fn linked_to(mut self, index: usize) -> Self {
        self.link = Some(index);
        self
    }
}

/// Build a single-level PDF with one page per [`PageSpec`].
///
/// Each page draws its width as text so pages stay distinguishable after a
/// merge.
pub(crate) fn pdf_bytes(pages: &[PageSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let page_ids: Vec<_> = pages.iter().map(|_| doc.new_object_id()).collect();
    let mut kids = Vec::with_capacity(pages.len());
    for (spec, &page_id) in pages.iter().zip(&page_ids) {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![50.into(), 400.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("width {}", spec.width))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_bytes = content.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), spec.width.into(), 500.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        if let Some(rotate) = spec.rotate {
            page.set("Rotate", rotate);
        }
        if let Some(target) = spec.link {
            let link_id = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => vec![0.into(), 0.into(), 100.into(), 100.into()],
                "Dest" => vec![Object::Reference(page_ids[target]), "Fit".into()],
            });
            page.set("Annots", vec![Object::Reference(link_id)]);
        }
        doc.objects.insert(page_id, Object::Dictionary(page));
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("fixture serializes");
    bytes
}
