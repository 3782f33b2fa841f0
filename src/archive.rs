//! Zip archive handling for batch input and output.
//!
//! Uploaded archives are flattened into an import directory, and converted
//! notes are packed back into a single archive. Failures here abort the
//! whole batch.

use crate::error::Result;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Name of the import directory inside a workspace.
pub const IMPORTS_DIR: &str = "imports";

/// Name of the export directory inside a workspace.
pub const EXPORTS_DIR: &str = "exports";

/// Extract every file entry of a zip archive into `dest`.
///
/// Entry paths are flattened to their base name and directory entries are
/// skipped; a later entry with the same base name replaces an earlier one.
/// Returns the extracted paths in archive order.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    fs::create_dir_all(dest)?;

    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let Some(base) = base_name(entry.name()) else {
            log::debug!("Skipping archive entry without a file name: {}", entry.name());
            continue;
        };

        let target = dest.join(base);
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        extracted.push(target);
    }

    log::info!(
        "Extracted {} files from {}",
        extracted.len(),
        archive_path.display()
    );
    Ok(extracted)
}

/// Pack every file under `src_dir` into a new zip archive at `archive_path`.
///
/// Entry names are relative to `src_dir`. Returns the number of files packed.
pub fn pack_directory(src_dir: &Path, archive_path: &Path) -> Result<usize> {
    let mut files = collect_files(src_dir)?;
    files.sort();

    if let Some(parent) = archive_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let name = entry_name(src_dir, path);
        zip.start_file(name, options)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut zip)?;
    }
    zip.finish()?;

    log::info!("Packed {} files into {}", files.len(), archive_path.display());
    Ok(files.len())
}

/// Import and export working directories for one batch.
#[derive(Debug, Clone)]
pub struct Workspace {
    imports: PathBuf,
    exports: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at `root`. Nothing is touched on disk.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            imports: root.join(IMPORTS_DIR),
            exports: root.join(EXPORTS_DIR),
        }
    }

    /// Directory extracted documents are placed in.
    pub fn imports(&self) -> &Path {
        &self.imports
    }

    /// Directory converted notes are written to.
    pub fn exports(&self) -> &Path {
        &self.exports
    }

    /// Remove and recreate both directories.
    pub fn reset(&self) -> Result<()> {
        for dir in [&self.imports, &self.exports] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Remove both directories.
    pub fn clean(&self) -> Result<()> {
        for dir in [&self.imports, &self.exports] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Extract an archive into the import directory.
    pub fn extract(&self, archive_path: &Path) -> Result<Vec<PathBuf>> {
        extract_archive(archive_path, &self.imports)
    }

    /// Pack the export directory into `archive_path`, then reset the workspace.
    pub fn pack(&self, archive_path: &Path) -> Result<usize> {
        let count = pack_directory(&self.exports, archive_path)?;
        self.reset()?;
        Ok(count)
    }
}

fn base_name(entry_name: &str) -> Option<&str> {
    match entry_name.rsplit(['/', '\\']).next() {
        Some("") | Some(".") | Some("..") | None => None,
        Some(name) => Some(name),
    }
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
