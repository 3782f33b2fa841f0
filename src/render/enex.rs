//! ENEX export rendering.
//!
//! The layout below is reproduced byte for byte, including the whitespace
//! inside the CDATA section, because importers compare against it.

use crate::model::{Note, ResourceRecord};
use crate::timestamp;

use super::RenderOptions;

/// DTD of the outer export document.
pub const EXPORT_DTD: &str = "http://xml.evernote.com/pub/evernote-export4.dtd";

/// DTD of the note body carried inside `<content>`.
pub const NOTE_DTD: &str = "http://xml.evernote.com/pub/enml2.dtd";

/// Application name written on the export root.
pub const APPLICATION: &str = "Evernote";

/// Application version written on the export root.
pub const APPLICATION_VERSION: &str = "10.88.4";

/// Render a note as a complete ENEX document.
///
/// The note timestamp is used for `export-date`, `created` and `updated`;
/// when the note has none, the current time is used.
pub fn to_enex(note: &Note, options: &RenderOptions) -> String {
    let timestamp = note.timestamp.clone().unwrap_or_else(timestamp::now);
    let title = options.escaping.apply(&note.title);
    let body: String = note.fragments.concat();

    let mut xml = String::with_capacity(
        512 + body.len() + note.resources.iter().map(|r| r.size() + 128).sum::<usize>(),
    );

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<!DOCTYPE en-export SYSTEM \"{}\">\n", EXPORT_DTD));
    xml.push_str(&format!(
        "<en-export export-date=\"{}\" application=\"{}\" version=\"{}\">\n",
        timestamp, APPLICATION, APPLICATION_VERSION
    ));
    xml.push_str("<note>\n");
    xml.push_str(&format!("<title>{}</title>\n", title));
    xml.push_str(&format!("<created>{}</created>\n", timestamp));
    xml.push_str(&format!("<updated>{}</updated>\n", timestamp));
    xml.push_str("<content>\n");
    xml.push_str(
        "<![CDATA[<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
    );
    xml.push_str(&format!(
        "<!DOCTYPE en-note SYSTEM \"{}\"><en-note> {} </en-note>     ]]>\n",
        NOTE_DTD, body
    ));
    xml.push_str("</content>\n");
    for resource in &note.resources {
        render_resource(resource, &mut xml);
    }
    xml.push_str("\n</note>\n</en-export>\n");

    xml
}

/// Render one `<resource>` element, newline-terminated.
pub fn render_resource(resource: &ResourceRecord, out: &mut String) {
    out.push_str("<resource>\n<data encoding=\"base64\">\n");
    out.push_str(&resource.data);
    out.push_str("\n</data>\n");
    out.push_str(&format!("<mime>{}</mime>\n", resource.mime));
    out.push_str(&format!("<width>{}</width>\n", resource.width));
    out.push_str(&format!("<height>{}</height>\n", resource.height));
    out.push_str("</resource>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> Note {
        Note {
            title: "Hello".to_string(),
            fragments: vec!["<div>Hello</div><div><br/></div>".to_string()],
            resources: Vec::new(),
            timestamp: Some("20240518T195459Z".to_string()),
        }
    }

    #[test]
    fn test_text_only_document_exact() {
        let xml = to_enex(&sample_note(), &RenderOptions::default());
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE en-export SYSTEM \"http://xml.evernote.com/pub/evernote-export4.dtd\">\n\
<en-export export-date=\"20240518T195459Z\" application=\"Evernote\" version=\"10.88.4\">\n\
<note>\n\
<title>Hello</title>\n\
<created>20240518T195459Z</created>\n\
<updated>20240518T195459Z</updated>\n\
<content>\n\
<![CDATA[<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
<!DOCTYPE en-note SYSTEM \"http://xml.evernote.com/pub/enml2.dtd\"><en-note> <div>Hello</div><div><br/></div> </en-note>     ]]>\n\
</content>\n\
\n\
</note>\n\
</en-export>\n";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_resources_follow_content() {
        let mut note = sample_note();
        note.resources
            .push(ResourceRecord::image("d41d8cd98f00b204e9800998ecf8427e", "AAAA", 12, 34));

        let xml = to_enex(&note, &RenderOptions::default());
        assert!(xml.contains(
            "</content>\n<resource>\n<data encoding=\"base64\">\nAAAA\n</data>\n\
<mime>image/png</mime>\n<width>12</width>\n<height>34</height>\n</resource>\n\n</note>\n"
        ));
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        let mut note = sample_note();
        note.timestamp = None;
        let xml = to_enex(&note, &RenderOptions::default());
        assert!(!xml.contains("export-date=\"\""));
        assert!(xml.contains("export-date=\"20"));
    }

    #[test]
    fn test_title_escaping_policy() {
        let mut note = sample_note();
        note.title = "R&D".to_string();

        let verbatim = to_enex(&note, &RenderOptions::default());
        assert!(verbatim.contains("<title>R&D</title>"));

        let escaped = to_enex(&note, &RenderOptions::new().escaped());
        assert!(escaped.contains("<title>R&amp;D</title>"));
    }
}
