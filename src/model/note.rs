//! Assembled note content ready for serialization.

/// MIME type recorded for every embedded image.
pub const IMAGE_MIME: &str = "image/png";

/// The result of assembling one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    /// Note title
    pub title: String,

    /// Markup fragments in document order
    pub fragments: Vec<String>,

    /// Image resources in the order their tags appear in `fragments`
    pub resources: Vec<ResourceRecord>,

    /// Canonical creation timestamp (`yyyyMMddTHHmmssZ`), if known
    pub timestamp: Option<String>,
}

impl Note {
    /// Create an empty note.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of embedded images.
    pub fn image_count(&self) -> usize {
        self.resources.len()
    }

    /// Check if the note carries no content at all.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// An embedded image resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Lowercase hex MD5 digest of the image
    pub hash: String,

    /// Base64-encoded image data
    pub data: String,

    /// MIME type (e.g., "image/png")
    pub mime: String,

    /// Width in points
    pub width: i64,

    /// Height in points
    pub height: i64,
}

impl ResourceRecord {
    /// Create an image resource record with the fixed image MIME type.
    pub fn image(hash: impl Into<String>, data: impl Into<String>, width: i64, height: i64) -> Self {
        Self {
            hash: hash.into(),
            data: data.into(),
            mime: IMAGE_MIME.to_string(),
            width,
            height,
        }
    }

    /// Size of the base64 payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
