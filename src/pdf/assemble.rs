use anyhow::{Context, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeSet, HashMap};

use crate::page_range::PageIndex;

/// Attributes a page may inherit from ancestor nodes of the page tree.
/// The rebuilt tree is flat, so they get copied onto each page first.
const INHERITED_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Builds a new document out of pages of existing ones.
///
/// Pages come out in exactly the order they are appended, under a single
/// flat page tree. This is the copy primitive behind extract, remove,
/// split, reorder, and merge: callers decide which pages and in what
/// order, this type does the byte-level work.
pub struct DocumentAssembler {
    output: Document,
    kids: Vec<ObjectId>,
}

impl DocumentAssembler {
    pub fn new() -> DocumentAssembler {
        DocumentAssembler {
            output: Document::with_version("1.5"),
            kids: Vec::new(),
        }
    }

    /// Copy `pages` of `source`, in the given order, into the output.
    pub fn append_pages(&mut self, source: &Document, pages: &[PageIndex]) -> Result<()> {
        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let total = page_ids.len();
        for &page in pages {
            if page.as_usize() >= total {
                anyhow::bail!("Page {} is out of range (1-{})", page.number(), total);
            }
        }

        // One flattened dictionary per distinct source page, detached from
        // the old tree.
        let mut distinct: Vec<ObjectId> = Vec::new();
        let mut flattened: HashMap<ObjectId, Dictionary> = HashMap::new();
        for &page in pages {
            let id = page_ids[page.as_usize()];
            if !flattened.contains_key(&id) {
                distinct.push(id);
                flattened.insert(id, flatten_page(source, id)?);
            }
        }

        // Everything the kept pages reference, except the old page tree.
        let mut reachable: BTreeSet<ObjectId> = BTreeSet::new();
        for dict in flattened.values() {
            collect_reachable_dict(source, dict, &mut reachable);
        }

        let mut id_map: HashMap<ObjectId, ObjectId> = HashMap::new();
        for &id in reachable.iter().chain(distinct.iter()) {
            if !id_map.contains_key(&id) {
                self.output.max_id += 1;
                id_map.insert(id, (self.output.max_id, 0));
            }
        }

        for &id in &reachable {
            if flattened.contains_key(&id) {
                continue;
            }
            let mut object = match source.get_object(id) {
                Ok(object) => object.clone(),
                // Dangling in the source; stays dangling here.
                Err(_) => continue,
            };
            remap_references(&mut object, &id_map);
            self.output.objects.insert(id_map[&id], object);
        }

        for &page in pages {
            let source_id = page_ids[page.as_usize()];
            let new_id = id_map[&source_id];
            let mut object = Object::Dictionary(flattened[&source_id].clone());
            remap_references(&mut object, &id_map);
            self.output.objects.insert(new_id, object);
            self.kids.push(new_id);
        }

        Ok(())
    }

    /// Install the flat page tree and hand back the finished document.
    pub fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let count = kids.len() as i64;
        let pages_id = self.output.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        });

        for &page_id in &self.kids {
            if let Ok(dict) = self.output.get_dictionary_mut(page_id) {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        let catalog_id = self.output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.output.trailer.set("Root", catalog_id);
        self.output
            .trailer
            .set("Size", Object::Integer(i64::from(self.output.max_id) + 1));

        self.output
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Clone a page dictionary with its inherited attributes pulled down and
/// its `Parent` link removed.
fn flatten_page(source: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut dict = source
        .get_dictionary(page_id)
        .with_context(|| format!("Page object {:?} is not a dictionary", page_id))?
        .clone();

    for key in INHERITED_KEYS {
        if dict.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page_id, key) {
            dict.set(key, value.clone());
        }
    }
    dict.remove(b"Parent");

    Ok(dict)
}

fn inherited_attribute<'a>(
    source: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page_id;
    // Page trees are shallow; the cap only guards against Parent cycles.
    for _ in 0..64 {
        let dict = source.get_dictionary(current).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return None,
        }
    }
    None
}

fn collect_reachable(source: &Document, object: &Object, reachable: &mut BTreeSet<ObjectId>) {
    match object {
        Object::Reference(id) => {
            if reachable.insert(*id) {
                if let Ok(target) = source.get_object(*id) {
                    collect_reachable(source, target, reachable);
                }
            }
        }
        Object::Array(items) => {
            for item in items {
                collect_reachable(source, item, reachable);
            }
        }
        Object::Dictionary(dict) => collect_reachable_dict(source, dict, reachable),
        Object::Stream(stream) => collect_reachable_dict(source, &stream.dict, reachable),
        _ => {}
    }
}

// Parent links climb back into the tree being replaced, so they are the
// one key never followed.
fn collect_reachable_dict(source: &Document, dict: &Dictionary, reachable: &mut BTreeSet<ObjectId>) {
    for (key, value) in dict.iter() {
        if key.as_slice() != b"Parent" {
            collect_reachable(source, value, reachable);
        }
    }
}

fn remap_references(object: &mut Object, id_map: &HashMap<ObjectId, ObjectId>) {
    let orphaned = match object {
        Object::Reference(id) => match id_map.get(id) {
            Some(&new_id) => {
                *id = new_id;
                false
            }
            None => true,
        },
        Object::Array(items) => {
            for item in items {
                remap_references(item, id_map);
            }
            false
        }
        Object::Dictionary(dict) => {
            remap_dict(dict, id_map);
            false
        }
        Object::Stream(stream) => {
            remap_dict(&mut stream.dict, id_map);
            false
        }
        _ => false,
    };
    // References into the discarded page tree resolve to null.
    if orphaned {
        *object = Object::Null;
    }
}

fn remap_dict(dict: &mut Dictionary, id_map: &HashMap<ObjectId, ObjectId>) {
    let keys: Vec<Vec<u8>> = dict.iter().map(|(key, _)| key.clone()).collect();
    for key in keys {
        if let Ok(value) = dict.get_mut(&key) {
            remap_references(value, id_map);
        }
    }
}

/// Minimal in-memory document for tests: `total` pages whose content
/// streams carry a "% page N" marker, with MediaBox inherited from the
/// page tree root.
#[cfg(test)]
pub(crate) fn sample_document(total: u32) -> Document {
    use lopdf::Stream;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();
    for page in 1..=total {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            format!("% page {}", page).into_bytes(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(doc: &Document) -> Vec<String> {
        doc.get_pages()
            .into_values()
            .map(|page_id| {
                let dict = doc.get_dictionary(page_id).unwrap();
                let content_id = match dict.get(b"Contents").unwrap() {
                    Object::Reference(id) => *id,
                    other => panic!("unexpected Contents: {:?}", other),
                };
                match doc.get_object(content_id).unwrap() {
                    Object::Stream(stream) => String::from_utf8(stream.content.clone()).unwrap(),
                    other => panic!("unexpected content object: {:?}", other),
                }
            })
            .collect()
    }

    fn indices(pages: &[u32]) -> Vec<PageIndex> {
        pages.iter().map(|&index| PageIndex::new(index)).collect()
    }

    #[test]
    fn test_copies_pages_in_requested_order() {
        let source = sample_document(5);
        let mut assembler = DocumentAssembler::new();
        assembler.append_pages(&source, &indices(&[2, 0, 4])).unwrap();
        let result = assembler.finish();

        assert_eq!(result.get_pages().len(), 3);
        assert_eq!(markers(&result), vec!["% page 3", "% page 1", "% page 5"]);
    }

    #[test]
    fn test_inherited_media_box_lands_on_each_page() {
        let source = sample_document(2);
        let mut assembler = DocumentAssembler::new();
        assembler.append_pages(&source, &indices(&[1])).unwrap();
        let result = assembler.finish();

        let page_id = result.get_pages().into_values().next().unwrap();
        let dict = result.get_dictionary(page_id).unwrap();
        assert!(dict.has(b"MediaBox"));
    }

    #[test]
    fn test_rejects_out_of_range_page() {
        let source = sample_document(3);
        let mut assembler = DocumentAssembler::new();
        let err = assembler
            .append_pages(&source, &indices(&[7]))
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_appends_across_documents() {
        let first = sample_document(2);
        let second = sample_document(3);
        let mut assembler = DocumentAssembler::new();
        assembler.append_pages(&first, &indices(&[0, 1])).unwrap();
        assembler.append_pages(&second, &indices(&[2])).unwrap();
        let result = assembler.finish();

        assert_eq!(result.get_pages().len(), 3);
        assert_eq!(markers(&result), vec!["% page 1", "% page 2", "% page 3"]);
    }

    #[test]
    fn test_result_has_flat_tree_with_root() {
        let source = sample_document(3);
        let mut assembler = DocumentAssembler::new();
        assembler.append_pages(&source, &indices(&[1, 0])).unwrap();
        let result = assembler.finish();

        let catalog = result.catalog().unwrap();
        let pages_id = match catalog.get(b"Pages").unwrap() {
            Object::Reference(id) => *id,
            other => panic!("unexpected Pages: {:?}", other),
        };
        let pages = result.get_dictionary(pages_id).unwrap();
        assert_eq!(pages.get(b"Count").unwrap().as_i64().unwrap(), 2);
    }
}
