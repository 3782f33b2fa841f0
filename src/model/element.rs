//! Content elements extracted from a source document.

/// One unit of ordered document content.
///
/// Elements are produced by a [`DocumentParser`](crate::parser::DocumentParser)
/// in reading order and consumed once by the note assembler.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A non-empty, trimmed paragraph of text
    Text(String),
    /// An embedded image
    Image(ImageElement),
}

impl Element {
    /// Create a text element.
    pub fn text(content: impl Into<String>) -> Self {
        Element::Text(content.into())
    }

    /// Create an image element with dimensions in points.
    pub fn image(bytes: Vec<u8>, width: f64, height: f64) -> Self {
        Element::Image(ImageElement {
            bytes,
            width,
            height,
        })
    }

    /// Check if this is a text element.
    pub fn is_text(&self) -> bool {
        matches!(self, Element::Text(_))
    }

    /// Check if this is an image element.
    pub fn is_image(&self) -> bool {
        matches!(self, Element::Image(_))
    }
}

/// Raw image data with its displayed size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    /// Raw image bytes as stored in the document
    pub bytes: Vec<u8>,

    /// Displayed width in points
    pub width: f64,

    /// Displayed height in points
    pub height: f64,
}

impl ImageElement {
    /// Width rounded to whole points, ties to even.
    pub fn rounded_width(&self) -> i64 {
        round_dimension(self.width)
    }

    /// Height rounded to whole points, ties to even.
    pub fn rounded_height(&self) -> i64 {
        round_dimension(self.height)
    }
}

fn round_dimension(value: f64) -> i64 {
    value.round_ties_even() as i64
}
