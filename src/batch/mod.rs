//! Batch conversion of a directory of documents.
//!
//! A [`BatchConverter`] owns at most one running job. Submitting returns a
//! [`BatchJob`] handle once the document count is known; conversion then
//! proceeds on a bounded worker pool while observers poll
//! [`BatchConverter::progress`] or read the job's event channel. Every
//! document is converted in isolation: errors and panics are recorded
//! against that document and never abort the batch.
//!
//! # Example
//!
//! ```no_run
//! use enexport::batch::BatchConverter;
//! use enexport::convert::ConvertOptions;
//! use std::path::Path;
//!
//! fn main() -> enexport::Result<()> {
//!     let converter = BatchConverter::docx(ConvertOptions::default());
//!     let report = converter.run(Path::new("imports"), Path::new("exports"))?;
//!     println!("{} of {} converted", report.progress.successful, report.progress.total);
//!     Ok(())
//! }
//! ```

mod options;
mod progress;

pub use options::BatchOptions;
pub use progress::{BatchEvent, BatchProgress, BatchState};

use crate::convert::{convert_document, note_file_stem, write_note, ConvertOptions, ENEX_EXTENSION};
use crate::error::{Error, Result};
use crate::parser::{DocumentParser, DocxParser};
use crossbeam_channel::{unbounded, Receiver};
use progress::ProgressTracker;
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashSet;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Final outcome of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Final progress counters
    pub progress: BatchProgress,

    /// Notes written, in completion order
    pub outputs: Vec<PathBuf>,
}

impl BatchReport {
    /// Check if every document converted.
    pub fn is_complete_success(&self) -> bool {
        self.progress.unsuccessful.is_empty()
    }
}

/// Drives batch conversions with a single in-flight job.
pub struct BatchConverter {
    parser: Arc<dyn DocumentParser>,
    options: Arc<ConvertOptions>,
    batch: BatchOptions,
    current: Mutex<Option<Arc<JobShared>>>,
}

impl BatchConverter {
    /// Create a converter around any document parser.
    pub fn new(parser: Arc<dyn DocumentParser>, options: ConvertOptions) -> Self {
        Self {
            parser,
            options: Arc::new(options),
            batch: BatchOptions::default(),
            current: Mutex::new(None),
        }
    }

    /// Create a converter for DOCX documents.
    pub fn docx(options: ConvertOptions) -> Self {
        let parser = DocxParser::with_options(options.parse.clone());
        Self::new(Arc::new(parser), options)
    }

    /// Set batch execution options.
    pub fn with_batch_options(mut self, batch: BatchOptions) -> Self {
        self.batch = batch;
        self
    }

    /// Get the conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Snapshot of the current (or last) job; all zeros before any job.
    pub fn progress(&self) -> BatchProgress {
        self.current_job()
            .map(|job| job.tracker.snapshot())
            .unwrap_or_default()
    }

    /// Check if a job is running.
    pub fn is_busy(&self) -> bool {
        self.current_job()
            .map(|job| !job.tracker.is_done())
            .unwrap_or(false)
    }

    /// List the eligible documents in `input_dir`, sorted by name.
    pub fn discover(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        let extension = &self.options.parse.extension;
        let mut documents = Vec::new();

        for entry in fs::read_dir(input_dir)? {
            let path = entry?.path();
            let eligible = path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if eligible {
                documents.push(path);
            }
        }

        documents.sort();
        Ok(documents)
    }

    /// Run a batch to completion on the calling thread's behalf.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        self.submit(input_dir, output_dir)?.wait()
    }

    /// Start a batch in the background.
    ///
    /// Fails with [`Error::Busy`] while another job is running. The returned
    /// job already reports its `total`.
    pub fn submit(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchJob> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if current.as_ref().is_some_and(|job| !job.tracker.is_done()) {
            return Err(Error::Busy);
        }

        let documents = self.discover(input_dir)?;
        fs::create_dir_all(output_dir)?;

        let workers = self.batch.effective_workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("enexport-worker-{}", i))
            .build()
            .map_err(|e| Error::Other(format!("failed to start worker pool: {}", e)))?;

        log::info!(
            "Found {} .{} files to convert ({} workers)",
            documents.len(),
            self.options.parse.extension,
            workers
        );

        let (tx, rx) = unbounded();
        let shared = Arc::new(JobShared {
            tracker: ProgressTracker::new(documents.len(), tx),
            outputs: Mutex::new(Vec::new()),
            names: OutputNames::default(),
        });

        let driver = Driver {
            parser: Arc::clone(&self.parser),
            options: Arc::clone(&self.options),
            output_dir: output_dir.to_path_buf(),
            shared: Arc::clone(&shared),
        };
        let parallel = self.batch.parallel;
        let handle = std::thread::Builder::new()
            .name("enexport-batch".to_string())
            .spawn(move || {
                if parallel {
                    pool.install(|| documents.par_iter().for_each(|doc| driver.convert(doc)));
                } else {
                    documents.iter().for_each(|doc| driver.convert(doc));
                }
                let progress = driver.shared.tracker.snapshot();
                log::info!(
                    "Completed batch: {} files successfully converted, {} files failed",
                    progress.successful,
                    progress.failed()
                );
            })?;

        *current = Some(Arc::clone(&shared));

        Ok(BatchJob {
            shared,
            handle: Some(handle),
            events: rx,
        })
    }

    fn current_job(&self) -> Option<Arc<JobShared>> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Handle to a submitted batch.
///
/// Dropping the handle does not stop the batch.
pub struct BatchJob {
    shared: Arc<JobShared>,
    handle: Option<JoinHandle<()>>,
    events: Receiver<BatchEvent>,
}

impl BatchJob {
    /// Number of eligible documents.
    pub fn total(&self) -> usize {
        self.shared.tracker.snapshot().total
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> BatchProgress {
        self.shared.tracker.snapshot()
    }

    /// Check if every document has reported in.
    pub fn is_done(&self) -> bool {
        self.shared.tracker.is_done()
    }

    /// Progress notifications for this job.
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Block until the batch finishes and return its report.
    pub fn wait(mut self) -> Result<BatchReport> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|payload| Error::Panicked(panic_message(payload.as_ref())))?;
        }

        let outputs = self
            .shared
            .outputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        Ok(BatchReport {
            progress: self.shared.tracker.snapshot(),
            outputs,
        })
    }
}

struct JobShared {
    tracker: ProgressTracker,
    outputs: Mutex<Vec<PathBuf>>,
    names: OutputNames,
}

struct Driver {
    parser: Arc<dyn DocumentParser>,
    options: Arc<ConvertOptions>,
    output_dir: PathBuf,
    shared: Arc<JobShared>,
}

impl Driver {
    fn convert(&self, path: &Path) {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::debug!("Converting {}", source);

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.convert_one(path)))
            .unwrap_or_else(|payload| Err(Error::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(output) => {
                log::debug!("File {} successfully converted", source);
                self.shared
                    .outputs
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(output.clone());
                self.shared.tracker.record_success(&source, output);
            }
            Err(e) => {
                log::warn!("Failed to convert {}: {}", source, e);
                self.shared.tracker.record_failure(&source, e.to_string());
            }
        }
    }

    fn convert_one(&self, path: &Path) -> Result<PathBuf> {
        let note = convert_document(self.parser.as_ref(), path, &self.options)?;
        let file_name = self.shared.names.reserve(&note_file_stem(&note.title));
        let output = self.output_dir.join(file_name);
        write_note(&note, &output, &self.options.render)?;
        Ok(output)
    }
}

/// Unique output file names within one batch.
#[derive(Default)]
struct OutputNames {
    used: Mutex<HashSet<String>>,
}

impl OutputNames {
    /// Reserve `<stem>.enex`, or `<stem> (n).enex` if it is taken.
    fn reserve(&self, stem: &str) -> String {
        let mut used = self.used.lock().unwrap_or_else(|e| e.into_inner());
        let mut candidate = format!("{}.{}", stem, ENEX_EXTENSION);
        let mut n = 2;
        while used.contains(&candidate) {
            candidate = format!("{} ({}).{}", stem, n, ENEX_EXTENSION);
            n += 1;
        }
        used.insert(candidate.clone());
        candidate
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
