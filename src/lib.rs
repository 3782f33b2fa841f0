//! # enexport
//!
//! Batch conversion of word-processing documents into Evernote notes.
//!
//! Each document becomes one `.enex` export file: its paragraphs become
//! note content, embedded images become base64 resources referenced by
//! their MD5 hash, the note title is derived from the first paragraph and
//! the creation date is recovered from the document's file name.
//!
//! ## Quick Start
//!
//! ```no_run
//! use enexport::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! fn main() -> enexport::Result<()> {
//!     let written = convert_file(
//!         Path::new("Meeting_240518_195459.docx"),
//!         Path::new("exports"),
//!         &ConvertOptions::default(),
//!     )?;
//!     println!("{}", written.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bit-exact ENEX output**: matches what the notes application imports
//! - **Content-addressed images**: `en-media` tags keyed by MD5
//! - **Batch processing**: bounded worker pool with progress snapshots
//! - **Failure isolation**: one broken document never aborts a batch
//! - **Zip in, zip out**: archive extraction and packing helpers

pub mod archive;
pub mod batch;
pub mod convert;
pub mod error;
pub mod hash;
pub mod model;
pub mod parser;
pub mod render;
pub mod timestamp;

// Re-export commonly used types
pub use archive::{extract_archive, pack_directory, Workspace};
pub use batch::{
    BatchConverter, BatchEvent, BatchJob, BatchOptions, BatchProgress, BatchReport, BatchState,
};
pub use convert::{convert_document, ConvertOptions};
pub use error::{Error, Result};
pub use model::{Element, ImageElement, Note, ResourceRecord};
pub use parser::{DocumentParser, DocxParser, ParseOptions};
pub use render::{to_enex, RenderOptions, TextEscaping};

use std::path::{Path, PathBuf};

/// Convert one DOCX file and write the note into `output_dir`.
///
/// Returns the path of the written `.enex` file.
pub fn convert_file(path: &Path, output_dir: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let parser = DocxParser::with_options(options.parse.clone());
    convert::convert_file(&parser, path, output_dir, options)
}

/// Convert one DOCX file and return the rendered ENEX document.
///
/// # Example
///
/// ```no_run
/// let enex = enexport::to_enex_string("Notes_240518_195459.docx").unwrap();
/// std::fs::write("Notes.enex", enex).unwrap();
/// ```
pub fn to_enex_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let options = ConvertOptions::default();
    let parser = DocxParser::with_options(options.parse.clone());
    let note = convert_document(&parser, path.as_ref(), &options)?;
    Ok(to_enex(&note, &options.render))
}

/// Convert every document of a zip archive and pack the notes into
/// `output_archive`.
///
/// `work_dir` holds the import and export directories, which are reset
/// before the batch and removed afterwards.
///
/// # Example
///
/// ```no_run
/// use enexport::{convert_archive, BatchConverter, ConvertOptions};
/// use std::path::Path;
///
/// let converter = BatchConverter::docx(ConvertOptions::default());
/// let report = convert_archive(
///     &converter,
///     Path::new("notes.zip"),
///     Path::new("."),
///     Path::new("exports.zip"),
/// )?;
/// println!("{} failed", report.progress.failed());
/// # Ok::<(), enexport::Error>(())
/// ```
pub fn convert_archive(
    converter: &BatchConverter,
    archive_path: &Path,
    work_dir: &Path,
    output_archive: &Path,
) -> Result<BatchReport> {
    let workspace = Workspace::new(work_dir);
    workspace.reset()?;

    let report = workspace
        .extract(archive_path)
        .and_then(|_| converter.run(workspace.imports(), workspace.exports()))
        .and_then(|report| workspace.pack(output_archive).map(|_| report));

    if let Err(e) = &report {
        log::error!("Batch for {} failed: {}", archive_path.display(), e);
    }
    workspace.clean()?;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_archive_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let converter = BatchConverter::docx(ConvertOptions::default());
        let result = convert_archive(
            &converter,
            &tmp.path().join("missing.zip"),
            tmp.path(),
            &tmp.path().join("exports.zip"),
        );
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!tmp.path().join("imports").exists());
    }
}
