//! Parsing options and configuration.

/// Options for extracting elements from documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Paragraphs containing any of these markers are dropped
    pub boilerplate_markers: Vec<String>,

    /// Drop the last image of every document
    pub skip_trailing_image: bool,

    /// File extension of eligible documents, lowercase without the dot
    pub extension: String,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the boilerplate markers.
    pub fn with_boilerplate_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boilerplate_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable dropping the trailing image.
    pub fn with_skip_trailing_image(mut self, skip: bool) -> Self {
        self.skip_trailing_image = skip;
        self
    }

    /// Set the eligible document extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_lowercase();
        self
    }

    /// Check whether a paragraph is generated boilerplate.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        self.boilerplate_markers
            .iter()
            .any(|marker| text.contains(marker.as_str()))
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            boilerplate_markers: vec!["Aspose.Word".to_string()],
            skip_trailing_image: true,
            extension: "docx".to_string(),
        }
    }
}
