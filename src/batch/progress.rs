//! Progress accounting for a batch run.

use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Point-in-time view of a batch.
///
/// `successful + unsuccessful.len() == processed <= total` holds for every
/// snapshot, and `done` is set exactly when `processed == total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    /// Eligible documents in the batch
    pub total: usize,

    /// Documents that have reported in
    pub processed: usize,

    /// Documents converted successfully
    pub successful: usize,

    /// File names of documents that failed
    pub unsuccessful: Vec<String>,

    /// Whether every document has reported in
    pub done: bool,
}

impl BatchProgress {
    /// Progress of a batch that has just started.
    pub fn started(total: usize) -> Self {
        Self {
            total,
            done: total == 0,
            ..Self::default()
        }
    }

    /// Number of failed documents.
    pub fn failed(&self) -> usize {
        self.unsuccessful.len()
    }

    /// Serialize to the flat JSON shape progress pollers consume.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
    }

    /// Lifecycle state of the batch this snapshot belongs to.
    pub fn state(&self) -> BatchState {
        if self.done {
            BatchState::Done
        } else if self.total == 0 {
            BatchState::Idle
        } else {
            BatchState::Running
        }
    }
}

/// Batch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    /// No batch submitted yet
    Idle,
    /// Documents are being converted
    Running,
    /// Every document has reported in
    Done,
}

/// Notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// The batch was accepted with this many documents
    Started {
        /// Eligible documents
        total: usize,
    },
    /// A document was written
    Converted {
        /// Source file name
        source: String,
        /// Written note
        output: PathBuf,
    },
    /// A document failed
    Failed {
        /// Source file name
        source: String,
        /// Error description
        reason: String,
    },
    /// Every document has reported in
    Finished(BatchProgress),
}

/// Mutex-guarded progress shared between workers and observers.
pub(crate) struct ProgressTracker {
    progress: Mutex<BatchProgress>,
    events: Sender<BatchEvent>,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize, events: Sender<BatchEvent>) -> Self {
        let progress = BatchProgress::started(total);
        // Receivers may be gone; events are best effort.
        let _ = events.send(BatchEvent::Started { total });
        if progress.done {
            let _ = events.send(BatchEvent::Finished(progress.clone()));
        }
        Self {
            progress: Mutex::new(progress),
            events,
        }
    }

    pub(crate) fn snapshot(&self) -> BatchProgress {
        self.lock().clone()
    }

    pub(crate) fn is_done(&self) -> bool {
        self.lock().done
    }

    // Events are sent while the lock is held so `Finished` is always last.
    pub(crate) fn record_success(&self, source: &str, output: PathBuf) {
        let mut progress = self.lock();
        progress.successful += 1;
        let finished = Self::advance(&mut progress);
        let _ = self.events.send(BatchEvent::Converted {
            source: source.to_string(),
            output,
        });
        self.emit_finished(finished);
    }

    pub(crate) fn record_failure(&self, source: &str, reason: String) {
        let mut progress = self.lock();
        if !progress.unsuccessful.iter().any(|s| s == source) {
            progress.unsuccessful.push(source.to_string());
        }
        let finished = Self::advance(&mut progress);
        let _ = self.events.send(BatchEvent::Failed {
            source: source.to_string(),
            reason,
        });
        self.emit_finished(finished);
    }

    fn advance(progress: &mut BatchProgress) -> Option<BatchProgress> {
        progress.processed = progress.successful + progress.unsuccessful.len();
        if progress.processed >= progress.total && !progress.done {
            progress.done = true;
            return Some(progress.clone());
        }
        None
    }

    fn emit_finished(&self, finished: Option<BatchProgress>) {
        if let Some(progress) = finished {
            let _ = self.events.send(BatchEvent::Finished(progress));
        }
    }

    fn lock(&self) -> MutexGuard<'_, BatchProgress> {
        self.progress.lock().unwrap_or_else(|e| e.into_inner())
    }
}
