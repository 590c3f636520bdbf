use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// A document with `pages` Letter pages, each showing "Page N".
#[allow(dead_code)]
pub fn sample_document(pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for number in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {number}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => pages as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

#[allow(dead_code)]
pub fn sample_pdf(pages: usize) -> Vec<u8> {
    let mut buffer = Vec::new();
    sample_document(pages).save_to(&mut buffer).unwrap();
    buffer
}

/// Like [`sample_pdf`], but every page carries a link annotation whose
/// destination is the next page.
#[allow(dead_code)]
pub fn linked_pdf(pages: usize) -> Vec<u8> {
    let mut doc = sample_document(pages);
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for pair in page_ids.windows(2) {
        let link_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![0.into(), 0.into(), 100.into(), 20.into()],
            "P" => pair[0],
            "Dest" => vec![pair[1].into(), "Fit".into()],
        });
        doc.get_dictionary_mut(pair[0])
            .unwrap()
            .set("Annots", vec![Object::Reference(link_id)]);
    }
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// The "Page N" label of every page, in page order.
#[allow(dead_code)]
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    page_ids
        .into_iter()
        .map(|id| {
            let content = doc.get_page_content(id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find("(Page ").expect("page label") + 1;
            let end = start + text[start..].find(')').expect("closing paren");
            text[start..end].to_string()
        })
        .collect()
}

#[allow(dead_code)]
pub fn labels(pages: usize) -> Vec<String> {
    (1..=pages).map(|n| format!("Page {n}")).collect()
}

#[allow(dead_code)]
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
