//! Document-to-note conversion.
//!
//! This module ties the pieces of the pipeline together for one document:
//! the filename timestamp, the parser's element sequence, title derivation,
//! element formatting and ENEX rendering.
//!
//! # Example
//!
//! ```no_run
//! use enexport::convert::{convert_document, ConvertOptions};
//! use enexport::parser::DocxParser;
//! use enexport::render::to_enex;
//! use std::path::Path;
//!
//! fn main() -> enexport::Result<()> {
//!     let options = ConvertOptions::default();
//!     let parser = DocxParser::with_options(options.parse.clone());
//!     let note = convert_document(&parser, Path::new("Notes_240518_195459.docx"), &options)?;
//!     println!("{}", to_enex(&note, &options.render));
//!     Ok(())
//! }
//! ```

mod assemble;
mod format;
mod title;

pub use assemble::{assemble, NoteAssembler};
pub use format::{format_image, format_text};
pub use title::{derive_title, MAX_TITLE_CHARS};

use crate::error::Result;
use crate::model::Note;
use crate::parser::{DocumentParser, ParseOptions};
use crate::render::{to_enex, RenderOptions, TextEscaping};
use crate::timestamp;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of written notes.
pub const ENEX_EXTENSION: &str = "enex";

/// Longest file stem in bytes, leaving room for a ` (n).enex` suffix within
/// the common 255-byte file name limit.
pub const MAX_STEM_BYTES: usize = 200;

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set the text escaping policy.
    pub fn with_escaping(mut self, escaping: TextEscaping) -> Self {
        self.render.escaping = escaping;
        self
    }
}

/// Parse and assemble one document into a note.
///
/// The creation timestamp comes from the document's file name.
pub fn convert_document(
    parser: &dyn DocumentParser,
    path: &Path,
    options: &ConvertOptions,
) -> Result<Note> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let timestamp = timestamp::extract_timestamp_with(&file_name, &options.parse.extension);

    let elements = parser.parse(path)?;
    log::debug!("{}: {} elements", file_name, elements.len());

    assemble(&elements, timestamp, &options.render)
}

/// Convert one document and write `<title>.enex` into `output_dir`.
///
/// An existing file with the same name is replaced. Returns the written path.
pub fn convert_file(
    parser: &dyn DocumentParser,
    path: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<PathBuf> {
    let note = convert_document(parser, path, options)?;
    let output = output_dir.join(format!("{}.{}", note_file_stem(&note.title), ENEX_EXTENSION));
    write_note(&note, &output, &options.render)?;
    Ok(output)
}

/// Render a note and write it to `path`, creating parent directories.
pub fn write_note(note: &Note, path: &Path, options: &RenderOptions) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_enex(note, options))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// File stem for a note title.
///
/// Characters that cannot appear in a file name are replaced with `_`, and
/// the stem is cut to at most [`MAX_STEM_BYTES`] bytes on a character
/// boundary.
pub fn note_file_stem(title: &str) -> String {
    let mut stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            _ => c,
        })
        .collect();

    if stem.len() > MAX_STEM_BYTES {
        let mut end = MAX_STEM_BYTES;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
    }

    match stem.as_str() {
        "" | "." | ".." => timestamp::UNTITLED.to_string(),
        _ => stem,
    }
}
