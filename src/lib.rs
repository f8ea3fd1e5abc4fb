//! siteup - static site stamping and bucket publishing
//!
//! siteup takes a flat directory of site files, rewrites a placeholder
//! token in each to a per-run stamp (stack name plus clock time), and
//! uploads the results into a storage bucket configured for static
//! website hosting.

pub mod config;
pub mod error;
pub mod publish;
pub mod rewrite;
pub mod stamp;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use error::{SiteError, SiteResult};
pub use publish::{
    FileFailure, PublishEvent, PublishOptions, PublishReport, Publisher, RewriteFailurePolicy,
    Stage,
};
pub use rewrite::{atomic_write, rewrite_file, Rewrite};
pub use stamp::{Stamp, DEFAULT_TOKEN};
pub use store::{
    content_type_for, BucketSpec, MemoryStore, ObjectStore, ProvisionedBucket, PutObject,
    S3Options, S3Store, StoreError, WebsiteConfig,
};
