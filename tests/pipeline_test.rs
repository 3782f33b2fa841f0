//! Integration tests for the single-document pipeline: elements to ENEX.

use enexport::convert::{assemble, derive_title};
use enexport::hash::{encode_base64, hash_base64};
use enexport::model::Element;
use enexport::render::{to_enex, RenderOptions, TextEscaping};
use enexport::timestamp::{date_title, extract_timestamp};

fn image(seed: u8, width: f64, height: f64) -> Element {
    Element::image(vec![0x89, b'P', b'N', b'G', seed], width, height)
}

#[test]
fn test_filename_to_note() {
    let timestamp = extract_timestamp("Groceries_240518_195459.docx");
    assert_eq!(timestamp.as_deref(), Some("20240518T195459Z"));

    let elements = vec![
        Element::text("Groceries for Saturday. Eggs, milk"),
        image(1, 300.4, 199.5),
        Element::text("Don't forget bread"),
    ];
    let note = assemble(&elements, timestamp, &RenderOptions::default()).unwrap();
    let enex = to_enex(&note, &RenderOptions::default());

    assert!(enex.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(enex.contains(
        "<en-export export-date=\"20240518T195459Z\" application=\"Evernote\" version=\"10.88.4\">"
    ));
    assert!(enex.contains("<title>Groceries for Saturday</title>"));
    assert!(enex.contains("<created>20240518T195459Z</created>"));
    assert!(enex.contains("<updated>20240518T195459Z</updated>"));
    assert!(enex.contains("--en-naturalWidth:300; --en-naturalHeight:200;"));
    assert!(enex.contains("<width>300</width>\n<height>200</height>"));
    assert!(enex.ends_with("</resource>\n\n</note>\n</en-export>\n"));
}

#[test]
fn test_media_tag_matches_resource() {
    let note = assemble(&[image(7, 10.0, 10.0)], None, &RenderOptions::default()).unwrap();
    let resource = &note.resources[0];

    assert_eq!(hash_base64(&resource.data).unwrap(), resource.hash);
    assert!(note.fragments[0].contains(&format!("hash=\"{}\"", resource.hash)));
}

#[test]
fn test_block_tag_and_resource_counts() {
    let mut elements = Vec::new();
    for i in 0..5u8 {
        elements.push(Element::text(format!("Paragraph {}", i)));
        if i % 2 == 0 {
            elements.push(image(i, 64.0, 32.0));
        }
    }

    let note = assemble(&elements, None, &RenderOptions::default()).unwrap();
    let enex = to_enex(&note, &RenderOptions::default());

    assert_eq!(enex.matches("<div><br/></div>").count(), 5);
    assert_eq!(enex.matches("<en-media ").count(), 3);
    assert_eq!(enex.matches("<resource>").count(), 3);
}

#[test]
fn test_identical_images_share_hash() {
    let note = assemble(
        &[image(3, 5.0, 5.0), image(3, 5.0, 5.0)],
        None,
        &RenderOptions::default(),
    )
    .unwrap();

    assert_eq!(note.resources.len(), 2);
    assert_eq!(note.resources[0].hash, note.resources[1].hash);
}

#[test]
fn test_image_only_document_uses_date_title() {
    let timestamp = extract_timestamp("Scan_231231_235959.docx");
    let note = assemble(&[image(1, 1.0, 1.0)], timestamp, &RenderOptions::default()).unwrap();
    assert_eq!(note.title, "31-12-2023");
    assert_eq!(date_title(None), "Untitled");
}

#[test]
fn test_missing_timestamp_uses_current_time() {
    let note = assemble(&[Element::text("Hello")], None, &RenderOptions::default()).unwrap();
    let enex = to_enex(&note, &RenderOptions::default());

    let created = enex
        .split("<created>")
        .nth(1)
        .and_then(|rest| rest.split("</created>").next())
        .unwrap();
    assert_eq!(created.len(), 16);
    assert!(created.ends_with('Z'));
    assert_eq!(&created[8..9], "T");
}

#[test]
fn test_escaping_policy() {
    let elements = vec![Element::text("Salt & pepper <3")];

    let verbatim = RenderOptions::default();
    let note = assemble(&elements, None, &verbatim).unwrap();
    assert!(to_enex(&note, &verbatim).contains("<div>Salt & pepper <3</div>"));

    let escaped = RenderOptions::new().with_escaping(TextEscaping::Escape);
    let note = assemble(&elements, None, &escaped).unwrap();
    let enex = to_enex(&note, &escaped);
    assert!(enex.contains("<div>Salt &amp; pepper &lt;3</div>"));
    assert!(enex.contains("<title>Salt &amp; pepper &lt;3</title>"));
}

#[test]
fn test_title_rules() {
    assert_eq!(derive_title("Done. Next step"), "Done");
    assert_eq!(derive_title("Really?"), "Really");
    assert_eq!(derive_title("v1.2 release"), "v1.2 release");
    assert_eq!(derive_title("either/or"), "either or or");
    assert_eq!(derive_title("   "), "Untitled");
}

#[test]
fn test_hash_of_known_payload() {
    let data = encode_base64(b"hello");
    assert_eq!(data, "aGVsbG8=");
    assert_eq!(hash_base64(&data).unwrap(), "5d41402abc4b2a76b9719d911017c592");
    assert!(hash_base64("%%%").is_err());
}
