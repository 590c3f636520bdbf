use std::collections::{HashMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId};
use log::{debug, warn};

use crate::model::{attach_page, pages_root};

/// Page attributes a page may take from an ancestor `Pages` node.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copies pages, and every object they reach, from one document into another.
///
/// Each source object is copied at most once per copier, so shared resources
/// stay shared and reference cycles terminate. References are followed from a
/// worklist rather than by recursion, so the depth of the reference graph
/// (a chain of "next page" links, say) never grows the stack.
///
/// `Pages` nodes of the source are never copied: a reference to one resolves
/// to the target's page tree root.
pub struct PageCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    target_pages: ObjectId,
    copied: HashMap<ObjectId, ObjectId>,
    pending: Vec<(ObjectId, ObjectId)>,
}

impl<'a> PageCopier<'a> {
    pub fn new(source: &'a Document, target: &'a mut Document) -> lopdf::Result<Self> {
        let target_pages = pages_root(target)?;
        Ok(Self {
            source,
            target,
            target_pages,
            copied: HashMap::new(),
            pending: Vec::new(),
        })
    }

    /// Copies one page and returns its id in the target. The copy has no
    /// `Parent`; inherited attributes are written onto it.
    pub fn copy_page(&mut self, page_id: ObjectId) -> lopdf::Result<ObjectId> {
        let source = self.source;
        let mut page = source.get_dictionary(page_id)?.clone();
        page.remove(b"Parent");
        for key in INHERITABLE_KEYS {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page_id, key) {
                page.set(key.to_vec(), value.clone());
            }
        }

        // the page may already exist in the target as a link destination;
        // this full copy replaces that one
        let new_id = match self.copied.get(&page_id) {
            Some(id) => *id,
            None => {
                let id = self.target.new_object_id();
                self.copied.insert(page_id, id);
                id
            }
        };
        let page = self.copy_dictionary(&page);
        self.target.objects.insert(new_id, Object::Dictionary(page));
        self.drain();
        Ok(new_id)
    }

    pub fn copied_objects(&self) -> usize {
        self.copied.len()
    }

    /// Target id for source object `id`. The first time an id is seen a
    /// target id is allocated and the body is queued for [`Self::drain`].
    fn map_reference(&mut self, id: ObjectId) -> ObjectId {
        if let Some(new_id) = self.copied.get(&id) {
            return *new_id;
        }
        if matches!(self.source.get_object(id), Ok(object) if is_pages(object)) {
            self.copied.insert(id, self.target_pages);
            return self.target_pages;
        }
        let new_id = self.target.new_object_id();
        self.copied.insert(id, new_id);
        self.pending.push((id, new_id));
        new_id
    }

    /// Writes the body of every queued object, queueing whatever those
    /// bodies reference in turn.
    fn drain(&mut self) {
        let source = self.source;
        while let Some((id, new_id)) = self.pending.pop() {
            let copy = match source.get_object(id) {
                Ok(Object::Dictionary(dict)) if is_page_dict(dict) => {
                    // keep the source page tree out of the target
                    let mut page = dict.clone();
                    page.remove(b"Parent");
                    Object::Dictionary(self.copy_dictionary(&page))
                }
                Ok(object) => self.copy_object(object),
                Err(_) => {
                    warn!("Dangling reference {} {} R replaced by null", id.0, id.1);
                    Object::Null
                }
            };
            self.target.objects.insert(new_id, copy);
        }
    }

    /// Copies a direct object. Only direct arrays and dictionaries are
    /// descended into; references are mapped, not followed.
    fn copy_object(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => Object::Reference(self.map_reference(*id)),
            Object::Array(items) => {
                Object::Array(items.iter().map(|item| self.copy_object(item)).collect())
            }
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)),
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.copy_dictionary(&stream.dict);
                Object::Stream(stream)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.copy_object(value));
        }
        copy
    }
}

fn is_page_dict(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Type").and_then(Object::as_name), Ok(name) if name == b"Page")
}

fn is_pages(object: &Object) -> bool {
    matches!(object.type_name(), Ok(name) if name == b"Pages")
}

/// Walks the `Parent` chain from `page_id` looking for `key`.
fn inherited_attribute<'d>(doc: &'d Document, page_id: ObjectId, key: &[u8]) -> Option<&'d Object> {
    let mut visited = HashSet::from([page_id]);
    let mut node = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        if !visited.insert(parent) {
            return None;
        }
        node = doc.get_dictionary(parent).ok()?;
    }
}

/// Copies every page of `source`, in order, to the end of `target`'s page
/// tree. Returns the number of pages copied.
pub fn copy_pages(source: &Document, target: &mut Document) -> lopdf::Result<usize> {
    let pages_id = pages_root(target)?;
    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

    let (copied, objects) = {
        let mut copier = PageCopier::new(source, target)?;
        let copied = page_ids
            .iter()
            .map(|id| copier.copy_page(*id))
            .collect::<lopdf::Result<Vec<_>>>()?;
        (copied, copier.copied_objects())
    };

    for page_id in &copied {
        attach_page(target, pages_id, *page_id)?;
    }
    debug!("Copied {} pages ({} objects)", copied.len(), objects);
    Ok(copied.len())
}
