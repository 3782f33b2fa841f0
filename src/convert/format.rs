//! Markup for individual content elements.

use crate::error::Result;
use crate::hash::hash_image;
use crate::model::{ImageElement, ResourceRecord, IMAGE_MIME};
use crate::render::TextEscaping;

/// Render a paragraph as a block followed by an empty line block.
pub fn format_text(text: &str, escaping: TextEscaping) -> String {
    format!("<div>{}</div><div><br/></div>", escaping.apply(text))
}

/// Render an image as an `<en-media>` tag plus its resource record.
///
/// Dimensions are rounded to whole points. The tag references the resource
/// by content hash; two identical images produce two records with the same
/// hash.
pub fn format_image(image: &ImageElement) -> Result<(String, ResourceRecord)> {
    let width = image.rounded_width();
    let height = image.rounded_height();
    let (hash, data) = hash_image(&image.bytes)?;

    let tag = format!(
        "<en-media hash=\"{}\" type=\"{}\" style=\"--en-naturalWidth:{}; --en-naturalHeight:{};\" />",
        hash, IMAGE_MIME, width, height
    );

    Ok((tag, ResourceRecord::image(hash, data, width, height)))
}
