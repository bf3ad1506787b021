//! Page-level object operations.
//!
//! This module handles:
//! - Resolving attributes a page inherits from its page tree ancestors
//! - Copying a single page, and everything it references, between documents
//! - Writing the output page tree

use crate::error::{PdfDeckError, Result};
use crate::page::Rotation;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;

/// Page attributes that may be inherited from a `Pages` ancestor.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bound on page tree depth and reference chains, guarding against cycles.
const MAX_DEPTH: usize = 64;

/// Follow `obj` through indirect references to the object it denotes.
///
/// Dangling references resolve to the reference itself.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    let mut current = obj;
    for _ in 0..MAX_DEPTH {
        match current {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(target) => current = target,
                Err(_) => return current,
            },
            _ => return current,
        }
    }
    current
}

/// Look up `key` on a page, walking up through `Parent` links if absent.
///
/// The value is returned as stored, which may be an indirect reference.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Effective `/Rotate` of a page, reduced to `0..360` and rounded down to a
/// quarter turn.
pub(crate) fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    let degrees = inherited_attribute(doc, page_id, b"Rotate")
        .map(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0)
        .rem_euclid(360);
    degrees - degrees % 90
}

/// Copies individual pages into a document under construction.
pub struct PageCopier;

impl PageCopier {
    /// Create a new page copier.
    pub fn new() -> Self {
        Self
    }

    /// Copy one page from `source` into `target`.
    ///
    /// The copied page keeps its object id, so `source` must already have been
    /// renumbered past `target.max_id`. Inherited attributes are written onto
    /// the page itself, `Parent` is pointed at `parent`, and `rotation` is
    /// added to whatever `/Rotate` the page already had.
    ///
    /// `exported` holds the ids of every `source` page that is part of the
    /// output. References to other pages of `source`, such as link
    /// destinations, are replaced by `null` so those pages stay out.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_id` is not a page dictionary in `source`.
    pub fn copy_page(
        &self,
        target: &mut Document,
        source: &Document,
        page_id: ObjectId,
        parent: ObjectId,
        rotation: Rotation,
        exported: &BTreeSet<ObjectId>,
    ) -> Result<ObjectId> {
        let mut page = source
            .get_dictionary(page_id)
            .map_err(|e| PdfDeckError::other(format!("Failed to get page {page_id:?}: {e}")))?
            .clone();

        for key in INHERITABLE_ATTRIBUTES {
            if !page.has(key)
                && let Some(value) = inherited_attribute(source, page_id, key)
            {
                page.set(key, value.clone());
            }
        }

        let degrees = rotation.applied_to(page_rotation(source, page_id));
        if degrees == 0 {
            page.remove(b"Rotate");
        } else {
            page.set("Rotate", Object::Integer(degrees));
        }

        ReferenceCopier { source, exported }.copy_dictionary(target, &mut page);
        page.set("Parent", Object::Reference(parent));
        target.objects.insert(page_id, Object::Dictionary(page));
        target.max_id = target.max_id.max(page_id.0);

        Ok(page_id)
    }

    /// Write the output page tree root with `kids` in order.
    pub fn write_page_tree(&self, target: &mut Document, pages_id: ObjectId, kids: &[ObjectId]) {
        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set(
            "Kids",
            Object::Array(kids.iter().map(|&id| Object::Reference(id)).collect()),
        );
        pages.set("Count", Object::Integer(kids.len() as i64));
        target.objects.insert(pages_id, Object::Dictionary(pages));
    }
}

impl Default for PageCopier {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the objects a page refers to from one document into another.
///
/// Objects already present in the target are left alone. Page tree nodes are
/// never copied by reference: a page listed in `exported` keeps its
/// reference, anything else in the source's page tree becomes `null`.
pub(crate) struct ReferenceCopier<'a> {
    pub source: &'a Document,
    pub exported: &'a BTreeSet<ObjectId>,
}

impl ReferenceCopier<'_> {
    /// Copy everything reachable from `obj`, rewriting page references in
    /// place.
    pub fn copy(&self, target: &mut Document, obj: &mut Object) {
        match obj {
            Object::Reference(ref_id) => {
                let ref_id = *ref_id;
                let Ok(referenced) = self.source.get_object(ref_id) else {
                    return;
                };

                if is_page_tree_node(referenced) {
                    if !self.exported.contains(&ref_id) {
                        *obj = Object::Null;
                    }
                    return;
                }

                if target.objects.contains_key(&ref_id) {
                    return;
                }

                let mut copied = referenced.clone();
                target.objects.insert(ref_id, Object::Null);
                target.max_id = target.max_id.max(ref_id.0);
                self.copy(target, &mut copied);
                target.objects.insert(ref_id, copied);
            }
            Object::Dictionary(dict) => self.copy_dictionary(target, dict),
            Object::Array(arr) => {
                for item in arr.iter_mut() {
                    self.copy(target, item);
                }
            }
            Object::Stream(stream) => self.copy_dictionary(target, &mut stream.dict),
            _ => {}
        }
    }

    /// Copy the values of `dict`. `Parent` links of page tree nodes are
    /// skipped.
    pub fn copy_dictionary(&self, target: &mut Document, dict: &mut Dictionary) {
        let is_tree_node = tree_node_type(dict).is_some();
        for (key, value) in dict.iter_mut() {
            if is_tree_node && key.as_slice() == b"Parent" {
                continue;
            }
            self.copy(target, value);
        }
    }
}

fn tree_node_type(dict: &Dictionary) -> Option<&[u8]> {
    dict.get(b"Type")
        .and_then(Object::as_name)
        .ok()
        .filter(|name| matches!(*name, b"Page" | b"Pages"))
}

fn is_page_tree_node(obj: &Object) -> bool {
    obj.as_dict().ok().and_then(tree_node_type).is_some()
}
