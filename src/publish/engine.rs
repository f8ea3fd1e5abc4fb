//! Core publish loop
//!
//! Each file runs one sequential pipeline: read, stamp, write back,
//! upload. Sequencing per file means the uploaded bytes always reflect
//! the rewrite outcome; there is no window where a stale read can win.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SiteError, SiteResult};
use crate::publish::{
    FileFailure, PublishEvent, PublishOptions, PublishReport, RewriteFailurePolicy, Stage,
};
use crate::rewrite;
use crate::stamp::Stamp;
use crate::store::{content_type_for, ObjectStore, PutObject};

/// Publishes one directory of site files into one bucket
pub struct Publisher<'a, S: ObjectStore> {
    store: &'a S,
    stamp: &'a Stamp,
    options: PublishOptions,
}

impl<'a, S: ObjectStore> Publisher<'a, S> {
    pub fn new(store: &'a S, stamp: &'a Stamp, options: PublishOptions) -> Self {
        Self {
            store,
            stamp,
            options,
        }
    }

    /// Publish every regular file in `site_dir` into `bucket`
    pub fn publish(&self, site_dir: &Path, bucket: &str) -> SiteResult<PublishReport> {
        self.publish_with_callback::<fn(PublishEvent)>(site_dir, bucket, None)
    }

    /// Publish with a progress callback
    ///
    /// A read or write failure for one file is recorded and the loop
    /// moves on; only directory enumeration errors abort the run.
    pub fn publish_with_callback<F>(
        &self,
        site_dir: &Path,
        bucket: &str,
        mut callback: Option<F>,
    ) -> SiteResult<PublishReport>
    where
        F: FnMut(PublishEvent),
    {
        let files = enumerate_site(site_dir)?;
        let mut report = PublishReport::default();

        for (index, path) in files.iter().enumerate() {
            let name = base_name(path);

            if let Some(ref mut cb) = callback {
                cb(PublishEvent::FileStart {
                    index,
                    name: name.clone(),
                });
            }

            if self.options.dry_run {
                self.preview_file(index, path, &name, &mut report, callback.as_mut());
                continue;
            }

            // Stage 1: rewrite in place
            let rewrite_failed = match rewrite::rewrite_file(path, self.stamp) {
                Ok(outcome) => {
                    if outcome.written {
                        report.rewritten.push(name.clone());
                        if let Some(ref mut cb) = callback {
                            cb(PublishEvent::FileRewritten {
                                index,
                                name: name.clone(),
                                occurrences: outcome.occurrences,
                            });
                        }
                    }
                    false
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "rewrite failed");
                    record_failure(
                        &mut report,
                        path,
                        Stage::Rewrite,
                        &e.to_string(),
                        index,
                        &name,
                        callback.as_mut(),
                    );
                    true
                }
            };

            if rewrite_failed && self.options.on_rewrite_failure == RewriteFailurePolicy::Skip {
                report.skipped.push(name);
                continue;
            }

            // Stage 2: upload whatever is on disk now
            let body = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "upload read failed");
                    record_failure(
                        &mut report,
                        path,
                        Stage::Upload,
                        &e.to_string(),
                        index,
                        &name,
                        callback.as_mut(),
                    );
                    continue;
                }
            };

            let put = PutObject {
                bucket: bucket.to_string(),
                key: name.clone(),
                body,
                content_type: content_type_for(&name).to_string(),
                public_read: true,
            };
            match self.store.put_object(&put) {
                Ok(()) => {
                    report.uploaded.push(name.clone());
                    if let Some(ref mut cb) = callback {
                        cb(PublishEvent::FileUploaded { index, key: name });
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %put.key, error = %e, "upload failed");
                    record_failure(
                        &mut report,
                        path,
                        Stage::Upload,
                        &e.to_string(),
                        index,
                        &name,
                        callback.as_mut(),
                    );
                }
            }
        }

        Ok(report)
    }

    /// Dry-run path: count would-be rewrites and uploads without writing
    fn preview_file<F>(
        &self,
        index: usize,
        path: &Path,
        name: &str,
        report: &mut PublishReport,
        mut callback: Option<&mut F>,
    ) where
        F: FnMut(PublishEvent),
    {
        match fs::read_to_string(path) {
            Ok(text) => {
                let (_, occurrences) = self.stamp.apply(&text);
                if occurrences > 0 {
                    report.rewritten.push(name.to_string());
                    if let Some(ref mut cb) = callback {
                        cb(PublishEvent::FileRewritten {
                            index,
                            name: name.to_string(),
                            occurrences,
                        });
                    }
                }
                report.uploaded.push(name.to_string());
                if let Some(ref mut cb) = callback {
                    cb(PublishEvent::FileUploaded {
                        index,
                        key: name.to_string(),
                    });
                }
            }
            Err(e) => {
                record_failure(
                    report,
                    path,
                    Stage::Rewrite,
                    &e.to_string(),
                    index,
                    name,
                    callback,
                );
            }
        }
    }
}

/// Stamp every regular file in `site_dir` without uploading anything
///
/// The rewrite-only counterpart of a publish run; backs `siteup stamp`.
pub fn stamp_directory(
    site_dir: &Path,
    stamp: &Stamp,
    dry_run: bool,
) -> SiteResult<PublishReport> {
    let files = enumerate_site(site_dir)?;
    let mut report = PublishReport::default();

    for path in &files {
        let name = base_name(path);
        if dry_run {
            match fs::read_to_string(path) {
                Ok(text) => {
                    let (_, occurrences) = stamp.apply(&text);
                    if occurrences > 0 {
                        report.rewritten.push(name);
                    }
                }
                Err(e) => report.failures.push(FileFailure {
                    path: path.clone(),
                    stage: Stage::Rewrite,
                    message: e.to_string(),
                }),
            }
            continue;
        }
        match rewrite::rewrite_file(path, stamp) {
            Ok(outcome) if outcome.written => report.rewritten.push(name),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "rewrite failed");
                report.failures.push(FileFailure {
                    path: path.clone(),
                    stage: Stage::Rewrite,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// List the regular files of `dir`, non-recursive
///
/// Subdirectories and other non-file entries are ignored. Order is
/// whatever the filesystem returns; callers must not rely on it.
pub fn enumerate_site(dir: &Path) -> SiteResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SiteError::SiteDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|source| SiteError::SiteDirUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SiteError::SiteDirUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file {
            files.push(entry.path());
        }
    }
    Ok(files)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn record_failure<F>(
    report: &mut PublishReport,
    path: &Path,
    stage: Stage,
    message: &str,
    index: usize,
    name: &str,
    mut callback: Option<&mut F>,
) where
    F: FnMut(PublishEvent),
{
    report.failures.push(FileFailure {
        path: path.to_path_buf(),
        stage,
        message: message.to_string(),
    });
    if let Some(ref mut cb) = callback {
        cb(PublishEvent::FileError {
            index,
            name: name.to_string(),
            message: message.to_string(),
        });
    }
}
