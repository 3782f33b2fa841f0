//! Document parsing module.
//!
//! A [`DocumentParser`] turns one source document into the ordered
//! [`Element`] sequence the note assembler consumes. Boilerplate paragraphs
//! and the trailing watermark image are already removed from that sequence.

mod docx_parser;
mod options;

pub use docx_parser::DocxParser;
pub use options::ParseOptions;

use crate::error::Result;
use crate::model::Element;
use std::path::Path;

/// Trait for document parsers.
///
/// Implement this trait to feed documents from another source into the
/// conversion pipeline.
pub trait DocumentParser: Send + Sync {
    /// Get the name of this parser.
    fn name(&self) -> &str;

    /// Extract elements from the document at `path`.
    fn parse(&self, path: &Path) -> Result<Vec<Element>>;

    /// Extract elements from an in-memory document.
    fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<Element>>;
}

/// Drop the last image element, if any.
pub(crate) fn drop_trailing_image(elements: &mut Vec<Element>) {
    if let Some(index) = elements.iter().rposition(Element::is_image) {
        log::debug!("Dropping trailing image at element {}", index);
        elements.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_trailing_image() {
        let mut elements = vec![
            Element::image(vec![1], 1.0, 1.0),
            Element::text("a"),
            Element::image(vec![2], 1.0, 1.0),
            Element::text("b"),
        ];
        drop_trailing_image(&mut elements);
        assert_eq!(
            elements,
            vec![
                Element::image(vec![1], 1.0, 1.0),
                Element::text("a"),
                Element::text("b"),
            ]
        );
    }

    #[test]
    fn test_drop_trailing_image_without_images() {
        let mut elements = vec![Element::text("only text")];
        drop_trailing_image(&mut elements);
        assert_eq!(elements.len(), 1);
    }
}
