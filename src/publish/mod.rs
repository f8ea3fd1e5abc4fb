//! Publisher engine for site uploads
//!
//! Runs the per-file pipeline (read, stamp, write back, upload) over a
//! flat source directory and collects per-file failures instead of
//! aborting, so one bad file never stops the rest of the run.

mod engine;

pub use engine::{enumerate_site, stamp_directory, Publisher};

use std::path::PathBuf;

/// What to do with a file whose rewrite failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteFailurePolicy {
    /// Still attempt the upload with whatever bytes are on disk
    #[default]
    UploadAsIs,
    /// Record the failure and skip the upload
    Skip,
}

/// Options for a publish run
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Don't touch disk or the store; report what would happen
    pub dry_run: bool,
    /// Policy for files whose rewrite failed
    pub on_rewrite_failure: RewriteFailurePolicy,
}

/// Pipeline stage where a per-file failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rewrite,
    Upload,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Rewrite => write!(f, "rewrite"),
            Stage::Upload => write!(f, "upload"),
        }
    }
}

/// A per-file failure recorded during a run
///
/// The run continues past these; they are returned to the caller rather
/// than only printed.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub stage: Stage,
    pub message: String,
}

/// Result of a publish run
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    /// Object keys uploaded
    pub uploaded: Vec<String>,
    /// Files whose token content was rewritten
    pub rewritten: Vec<String>,
    /// Files skipped entirely (rewrite failed under the `Skip` policy)
    pub skipped: Vec<String>,
    /// Per-file failures
    pub failures: Vec<FileFailure>,
}

impl PublishReport {
    /// True when no file failed at any stage
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Progress callback event emitted while publishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishEvent {
    FileStart {
        index: usize,
        name: String,
    },
    FileRewritten {
        index: usize,
        name: String,
        occurrences: usize,
    },
    FileUploaded {
        index: usize,
        key: String,
    },
    FileError {
        index: usize,
        name: String,
        message: String,
    },
}
