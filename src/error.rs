//! Error types for siteup
//!
//! Uses `thiserror` for library errors; the binary wraps them with `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for siteup operations
pub type SiteResult<T> = Result<T, SiteError>;

/// Main error type for siteup operations
#[derive(Error, Debug)]
pub enum SiteError {
    /// Site directory missing or not a directory
    #[error("site directory not found: {path}")]
    SiteDirNotFound { path: PathBuf },

    /// Site directory exists but could not be enumerated
    #[error("failed to read site directory {path}: {source}")]
    SiteDirUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Stack name missing from flags, environment, and config
    #[error("no stack name configured - pass --stack or set SITEUP_STACK")]
    MissingStack,

    /// Bucket name missing from flags, environment, and config
    #[error("no bucket name configured - pass --bucket or set SITEUP_BUCKET")]
    MissingBucket,

    /// Object store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
