//! In-memory object store
//!
//! Backs unit and integration tests, and stands in for the real store on
//! dry runs. Uses interior mutability so the publish engine can hold a
//! shared reference.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{BucketSpec, ObjectStore, ProvisionedBucket, PutObject, StoreError, StoreResult};

/// An object as the memory store recorded it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub public_read: bool,
}

#[derive(Debug, Default)]
struct Inner {
    buckets: HashMap<String, BucketRecord>,
    failing_keys: HashSet<String>,
}

#[derive(Debug, Default)]
struct BucketRecord {
    index_document: String,
    public_read: bool,
    objects: HashMap<String, StoredObject>,
}

/// Object store holding everything in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future upload of `key` fail
    ///
    /// Lets tests exercise the continue-on-error path without a real
    /// backend outage.
    pub fn with_put_failure(self, key: impl Into<String>) -> Self {
        self.inner
            .lock()
            .expect("memory store lock")
            .failing_keys
            .insert(key.into());
        self
    }

    /// Look up an uploaded object
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let inner = self.inner.lock().expect("memory store lock");
        inner.buckets.get(bucket)?.objects.get(key).cloned()
    }

    /// Number of objects across all buckets
    pub fn object_count(&self) -> usize {
        let inner = self.inner.lock().expect("memory store lock");
        inner.buckets.values().map(|b| b.objects.len()).sum()
    }

    /// Whether the named bucket exists
    pub fn has_bucket(&self, name: &str) -> bool {
        let inner = self.inner.lock().expect("memory store lock");
        inner.buckets.contains_key(name)
    }

    /// Index document the bucket was provisioned with
    pub fn index_document(&self, bucket: &str) -> Option<String> {
        let inner = self.inner.lock().expect("memory store lock");
        inner
            .buckets
            .get(bucket)
            .map(|b| b.index_document.clone())
    }
}

impl ObjectStore for MemoryStore {
    fn create_bucket(&self, spec: &BucketSpec) -> StoreResult<ProvisionedBucket> {
        let mut inner = self.inner.lock().expect("memory store lock");
        let record = inner
            .buckets
            .entry(spec.name.clone())
            .or_insert_with(BucketRecord::default);
        record.index_document = spec.website.index_document.clone();
        record.public_read = spec.public_read;

        Ok(ProvisionedBucket {
            name: spec.name.clone(),
            website_endpoint: format!("{}.s3-website.test", spec.name),
        })
    }

    fn put_object(&self, put: &PutObject) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("memory store lock");
        if inner.failing_keys.contains(&put.key) {
            return Err(StoreError::PutObject {
                bucket: put.bucket.clone(),
                key: put.key.clone(),
                message: "injected failure".to_string(),
            });
        }
        let record = inner
            .buckets
            .entry(put.bucket.clone())
            .or_insert_with(BucketRecord::default);
        record.objects.insert(
            put.key.clone(),
            StoredObject {
                body: put.body.clone(),
                content_type: put.content_type.clone(),
                public_read: put.public_read,
            },
        );
        Ok(())
    }
}
