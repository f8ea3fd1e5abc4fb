//! Object store port
//!
//! The provisioning side of a publish run: one bucket configured for
//! static website hosting, plus write-once objects named after the files
//! they came from. `S3Store` talks to S3-compatible services;
//! `MemoryStore` backs tests and dry runs.

mod memory;
mod s3;

pub use memory::{MemoryStore, StoredObject};
pub use s3::{S3Options, S3Store};

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error from the storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend client could not be initialized
    #[error("failed to connect to object store: {message}")]
    Connect { message: String },

    /// Bucket provisioning failed
    #[error("bucket '{bucket}' could not be created: {message}")]
    CreateBucket { bucket: String, message: String },

    /// Object upload failed
    #[error("object '{key}' could not be stored in '{bucket}': {message}")]
    PutObject {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Static-website serving mode for a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteConfig {
    /// Document served for directory requests, e.g. "index.html"
    pub index_document: String,
}

/// Request to provision the site bucket
#[derive(Debug, Clone)]
pub struct BucketSpec {
    pub name: String,
    /// Serve bucket contents as a static website
    pub website: WebsiteConfig,
    /// World-readable bucket contents
    pub public_read: bool,
}

/// A bucket that exists and can accept objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedBucket {
    pub name: String,
    /// Host serving the website endpoint
    pub website_endpoint: String,
}

impl ProvisionedBucket {
    /// Storage URI, e.g. `s3://my-bucket`
    pub fn uri(&self) -> String {
        format!("s3://{}", self.name)
    }

    /// HTTP URL of the hosted website
    pub fn website_url(&self) -> String {
        format!("http://{}", self.website_endpoint)
    }
}

/// A single object upload
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    /// Object key, the source file's base name
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub public_read: bool,
}

/// Storage backend owning the bucket and its objects
///
/// Creation is additive only; no update or delete path exists.
pub trait ObjectStore {
    /// Provision the bucket all objects of a run land in
    fn create_bucket(&self, spec: &BucketSpec) -> StoreResult<ProvisionedBucket>;

    /// Store one object
    fn put_object(&self, put: &PutObject) -> StoreResult<()>;
}

/// Pick a content type from the file name's extension
pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
