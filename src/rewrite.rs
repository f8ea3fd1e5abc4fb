//! In-place token rewriting
//!
//! Reads a file as UTF-8 text, applies the stamp, and writes the result
//! back to the same path. Writes go through a tempfile + rename so a
//! failed write never leaves a half-written file behind. Files without
//! the token are left untouched on disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::SiteResult;
use crate::stamp::Stamp;

/// Outcome of rewriting a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rewrite {
    /// Number of token occurrences replaced
    pub occurrences: usize,
    /// Whether the file was written back
    pub written: bool,
}

/// Apply `stamp` to the file at `path`, overwriting it in place
///
/// Returns without writing when the file contains no token occurrence,
/// so token-free files keep their original bytes.
pub fn rewrite_file(path: &Path, stamp: &Stamp) -> SiteResult<Rewrite> {
    let text = fs::read_to_string(path)?;
    let (stamped, occurrences) = stamp.apply(&text);
    if occurrences == 0 {
        return Ok(Rewrite {
            occurrences: 0,
            written: false,
        });
    }
    atomic_write(path, stamped.as_bytes())?;
    Ok(Rewrite {
        occurrences,
        written: true,
    })
}

/// Write content to a file atomically
///
/// Uses the tempfile + rename pattern; the tempfile lives in the target's
/// directory so the rename stays on one filesystem.
pub fn atomic_write(path: &Path, content: &[u8]) -> SiteResult<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
