use lopdf::{dictionary, Document, Object, ObjectId, SaveOptions};
use log::{debug, warn};

use crate::settings::CompressionSettings;

pub const OUTPUT_VERSION: &str = "1.7";
/// US Letter, in points.
pub const DEFAULT_PAGE_SIZE: [i64; 2] = [612, 792];
const OBJECT_STREAM_COMPRESSION_LEVEL: u32 = 6;

/// The PDF object model the pipeline drives. Swappable so callers can observe
/// what reaches the parser and the serializer.
pub trait DocumentModel {
    fn load(&self, bytes: &[u8]) -> lopdf::Result<Document>;

    /// A new document with an empty page tree.
    fn create(&self) -> Document;

    fn save(&self, doc: &mut Document, settings: &CompressionSettings) -> lopdf::Result<Vec<u8>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Lopdf;

impl DocumentModel for Lopdf {
    fn load(&self, bytes: &[u8]) -> lopdf::Result<Document> {
        let mut doc = Document::load_mem(bytes)?;

        if doc.is_encrypted() {
            debug!("PDF is encrypted, trying the empty password");
            if let Err(e) = doc.decrypt("") {
                warn!("Failed to decrypt with empty password: {e}");
            }
        }

        Ok(doc)
    }

    fn create(&self) -> Document {
        let mut doc = Document::with_version(OUTPUT_VERSION);
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let producer = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(producer),
            "Creator" => Object::string_literal(env!("CARGO_PKG_NAME")),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc
    }

    fn save(&self, doc: &mut Document, settings: &CompressionSettings) -> lopdf::Result<Vec<u8>> {
        if settings.add_default_page && doc.get_pages().is_empty() {
            debug!("Output has no pages, adding a blank one");
            let pages_id = pages_root(doc)?;
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    DEFAULT_PAGE_SIZE[0].into(),
                    DEFAULT_PAGE_SIZE[1].into(),
                ],
                "Resources" => dictionary! {},
            });
            attach_page(doc, pages_id, page_id)?;
        }

        // quality and objects_per_tick have no lopdf counterpart; they only
        // travel this far
        debug!(
            "Saving: object streams={} objects per tick={} quality={}",
            settings.use_object_streams, settings.objects_per_tick, settings.quality
        );

        // objects inside object streams can only be addressed by an xref
        // stream, and lopdf's xref stream only indexes the first object
        // stream correctly, so everything goes into one
        let options = SaveOptions::builder()
            .use_object_streams(settings.use_object_streams)
            .use_xref_streams(settings.use_object_streams)
            .max_objects_per_stream(doc.objects.len().max(1))
            .compression_level(OBJECT_STREAM_COMPRESSION_LEVEL)
            .build();

        let mut buffer = Vec::new();
        doc.save_with_options(&mut buffer, options)?;
        Ok(buffer)
    }
}

/// Id of the root `Pages` node reached through the trailer's catalog.
pub fn pages_root(doc: &Document) -> lopdf::Result<ObjectId> {
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    doc.get_dictionary(catalog_id)?.get(b"Pages")?.as_reference()
}

/// Appends `page_id` as the last kid of the `Pages` node `pages_id`.
pub fn attach_page(doc: &mut Document, pages_id: ObjectId, page_id: ObjectId) -> lopdf::Result<()> {
    doc.get_dictionary_mut(page_id)?.set("Parent", pages_id);

    let pages = doc.get_dictionary_mut(pages_id)?;
    let mut kids = match pages.get(b"Kids") {
        Ok(Object::Array(kids)) => kids.clone(),
        _ => Vec::new(),
    };
    kids.push(Object::Reference(page_id));
    pages.set("Count", kids.len() as i64);
    pages.set("Kids", kids);
    Ok(())
}
