//! Assembly of extracted elements into a note.

use crate::error::Result;
use crate::model::{Element, Note};
use crate::render::RenderOptions;
use crate::timestamp;

use super::format::{format_image, format_text};
use super::title::derive_title;

/// Incrementally builds a [`Note`] from elements in document order.
///
/// # Example
///
/// ```
/// use enexport::convert::NoteAssembler;
/// use enexport::model::Element;
/// use enexport::render::RenderOptions;
///
/// let options = RenderOptions::default();
/// let mut assembler = NoteAssembler::new(Some("20240518T195459Z".into()), &options);
/// assembler.push(&Element::text("Shopping list. Eggs"))?;
/// let note = assembler.finish();
/// assert_eq!(note.title, "Shopping list");
/// # Ok::<(), enexport::Error>(())
/// ```
pub struct NoteAssembler<'a> {
    options: &'a RenderOptions,
    title: Option<String>,
    note: Note,
}

impl<'a> NoteAssembler<'a> {
    /// Start a note with the given creation timestamp.
    pub fn new(timestamp: Option<String>, options: &'a RenderOptions) -> Self {
        Self {
            options,
            title: None,
            note: Note {
                timestamp,
                ..Note::default()
            },
        }
    }

    /// Append one element.
    ///
    /// The first text element decides the title. Image resources are appended
    /// in the same order as their tags.
    pub fn push(&mut self, element: &Element) -> Result<()> {
        match element {
            Element::Text(text) => {
                if self.title.is_none() {
                    let title = derive_title(text);
                    log::debug!("Derived title {:?}", title);
                    self.title = Some(title);
                }
                self.note
                    .fragments
                    .push(format_text(text, self.options.escaping));
            }
            Element::Image(image) => {
                let (tag, resource) = format_image(image)?;
                self.note.fragments.push(tag);
                self.note.resources.push(resource);
            }
        }
        Ok(())
    }

    /// Finish the note, falling back to a date title when no text produced one.
    pub fn finish(mut self) -> Note {
        self.note.title = match self.title {
            Some(title) if !title.is_empty() => title,
            _ => timestamp::date_title(self.note.timestamp.as_deref()),
        };
        self.note
    }
}

/// Assemble a complete note from an element sequence.
pub fn assemble(
    elements: &[Element],
    timestamp: Option<String>,
    options: &RenderOptions,
) -> Result<Note> {
    let mut assembler = NoteAssembler::new(timestamp, options);
    for element in elements {
        assembler.push(element)?;
    }
    Ok(assembler.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(seed: u8) -> Element {
        Element::image(vec![0x89, 0x50, 0x4E, 0x47, seed], 120.0, 80.0)
    }

    #[test]
    fn test_text_and_images_in_order() {
        let elements = vec![
            Element::text("Trip report. Day one"),
            png(1),
            Element::text("Second paragraph"),
            png(2),
        ];
        let note = assemble(&elements, None, &RenderOptions::default()).unwrap();

        assert_eq!(note.title, "Trip report");
        assert_eq!(note.fragments.len(), 4);
        assert!(note.fragments[0].starts_with("<div>Trip report. Day one</div>"));
        assert!(note.fragments[1].starts_with("<en-media"));
        assert!(note.fragments[2].starts_with("<div>Second paragraph</div>"));
        assert_eq!(note.resources.len(), 2);
        assert!(note.fragments[1].contains(&note.resources[0].hash));
        assert!(note.fragments[3].contains(&note.resources[1].hash));
    }

    #[test]
    fn test_title_from_first_text_even_after_image() {
        let elements = vec![png(1), Element::text("Caption"), Element::text("Other")];
        let note = assemble(&elements, None, &RenderOptions::default()).unwrap();
        assert_eq!(note.title, "Caption");
    }

    #[test]
    fn test_image_only_uses_date_title() {
        let elements = vec![png(1)];
        let note = assemble(
            &elements,
            Some("20240518T195459Z".to_string()),
            &RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(note.title, "18-05-2024");
        assert_eq!(note.resources.len(), 1);
    }

    #[test]
    fn test_no_text_no_timestamp_is_untitled() {
        let note = assemble(&[], None, &RenderOptions::default()).unwrap();
        assert_eq!(note.title, "Untitled");
        assert!(note.is_empty());
    }

    #[test]
    fn test_empty_derived_title_falls_back() {
        let elements = vec![Element::text("!"), Element::text("Later text")];
        let note = assemble(
            &elements,
            Some("20230101T080000Z".to_string()),
            &RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(note.title, "01-01-2023");
    }

    #[test]
    fn test_identical_images_are_not_deduplicated() {
        let elements = vec![png(7), png(7)];
        let note = assemble(&elements, None, &RenderOptions::default()).unwrap();
        assert_eq!(note.resources.len(), 2);
        assert_eq!(note.resources[0].hash, note.resources[1].hash);
    }
}
