//! Deep page copying between lopdf documents.
//!
//! [`DocumentBuilder`] accumulates pages cloned out of source documents
//! into a fresh document with its own page tree. Cloning follows
//! references (except the /Parent back-edge, which the builder rewires
//! to its own page tree) and maps each source object to exactly one
//! target object, so resources shared between pages of the same source
//! are copied once and reference cycles terminate.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::warn;

use crate::error::{PdfError, Result};

pub(crate) struct DocumentBuilder {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Append every page of `source`, in page order.
    pub fn append_document(&mut self, source: &Document) -> Result<usize> {
        let mut mapped = HashMap::new();
        let pages = source.get_pages();
        let count = pages.len();
        for (_, page_id) in pages {
            self.append_page_mapped(source, page_id, &mut mapped)?;
        }
        Ok(count)
    }

    /// Append one page of `source`.
    pub fn append_page(&mut self, source: &Document, page_id: ObjectId) -> Result<()> {
        self.append_page_mapped(source, page_id, &mut HashMap::new())
    }

    fn append_page_mapped(
        &mut self,
        source: &Document,
        page_id: ObjectId,
        mapped: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<()> {
        let page = source
            .get_object(page_id)
            .map_err(|e| PdfError::Parse(format!("page object {:?}: {}", page_id, e)))?;
        let cloned = self.clone_object(source, page, mapped);
        let new_id = self.document.add_object(cloned);
        if let Ok(Object::Dictionary(dict)) = self.document.get_object_mut(new_id) {
            dict.set("Parent", self.pages_id);
        }
        self.kids.push(new_id);
        Ok(())
    }

    /// Write the page tree and catalog; the result is ready to save.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let kids: Vec<Object> = self.kids.iter().map(|id| Object::Reference(*id)).collect();
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);
        self.document
    }

    fn clone_object(
        &mut self,
        source: &Document,
        object: &Object,
        mapped: &mut HashMap<ObjectId, ObjectId>,
    ) -> Object {
        match object {
            Object::Dictionary(dict) => {
                Object::Dictionary(self.clone_dictionary(source, dict, mapped))
            }
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.clone_object(source, item, mapped))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let dict = self.clone_dictionary(source, &stream.dict, mapped);
                Object::Stream(Stream::new(dict, stream.content.clone()))
            }
            Object::Reference(id) => {
                if let Some(target) = mapped.get(id) {
                    return Object::Reference(*target);
                }
                match source.get_object(*id) {
                    Ok(referenced) => {
                        // Reserve the target id before recursing so a
                        // cycle resolves to it instead of looping.
                        let target = self.document.new_object_id();
                        mapped.insert(*id, target);
                        let cloned = self.clone_object(source, referenced, mapped);
                        self.document.objects.insert(target, cloned);
                        Object::Reference(target)
                    }
                    Err(err) => {
                        warn!("dropping unresolvable reference {:?}: {}", id, err);
                        Object::Null
                    }
                }
            }
            other => other.clone(),
        }
    }

    fn clone_dictionary(
        &mut self,
        source: &Document,
        dict: &Dictionary,
        mapped: &mut HashMap<ObjectId, ObjectId>,
    ) -> Dictionary {
        let mut cloned = Dictionary::new();
        for (key, value) in dict.iter() {
            // The /Parent back-edge would drag in the whole source page
            // tree; the builder rewires it after cloning.
            if key == b"Parent" {
                continue;
            }
            cloned.set(key.clone(), self.clone_object(source, value, mapped));
        }
        cloned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::fixtures::text_document;
    use pretty_assertions::assert_eq;

    fn reload(mut doc: Document) -> Document {
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        Document::load_mem(&bytes).unwrap()
    }

    #[test]
    fn copies_all_pages_of_a_document() {
        let source = text_document(&["a", "b", "c"]);
        let mut builder = DocumentBuilder::new();
        let copied = builder.append_document(&source).unwrap();

        assert_eq!(copied, 3);
        assert_eq!(reload(builder.finish()).get_pages().len(), 3);
    }

    #[test]
    fn copies_a_single_page() {
        let source = text_document(&["a", "b"]);
        let page_id = source.get_pages()[&2];

        let mut builder = DocumentBuilder::new();
        builder.append_page(&source, page_id).unwrap();

        assert_eq!(reload(builder.finish()).get_pages().len(), 1);
    }

    #[test]
    fn empty_builder_yields_a_zero_page_document() {
        let doc = reload(DocumentBuilder::new().finish());
        assert_eq!(doc.get_pages().len(), 0);
    }
}
