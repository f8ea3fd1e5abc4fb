//! S3 object store backend
//!
//! Talks to AWS S3 or any S3-compatible service (LocalStack, MinIO) via
//! a custom endpoint. The publish engine is synchronous, so the store
//! owns a tokio runtime and blocks on each SDK call.

use std::error::Error;

use aws_sdk_s3::types::{
    BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration, IndexDocument,
    ObjectCannedAcl, WebsiteConfiguration,
};
use aws_sdk_s3::Client;

use super::{BucketSpec, ObjectStore, ProvisionedBucket, PutObject, StoreError, StoreResult};

/// Connection options for [`S3Store`]
#[derive(Debug, Clone)]
pub struct S3Options {
    /// AWS region, e.g. "us-east-1"
    pub region: String,
    /// S3-compatible endpoint URL; None means AWS proper
    pub endpoint: Option<String>,
}

/// Object store backed by S3
pub struct S3Store {
    client: Client,
    runtime: tokio::runtime::Runtime,
    options: S3Options,
}

impl S3Store {
    /// Build a client and the runtime that drives it
    pub fn connect(options: S3Options) -> StoreResult<Self> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| StoreError::Connect {
            message: e.to_string(),
        })?;
        let client = runtime.block_on(build_client(&options));
        Ok(Self {
            client,
            runtime,
            options,
        })
    }

    /// Website endpoint host for a bucket
    ///
    /// AWS buckets use the regional s3-website host. Custom endpoints have
    /// no website hosting convention, so the bucket is path-addressed under
    /// the endpoint host.
    fn website_endpoint(&self, bucket: &str) -> String {
        match &self.options.endpoint {
            Some(endpoint) => {
                let host = endpoint
                    .trim_start_matches("http://")
                    .trim_start_matches("https://")
                    .trim_end_matches('/');
                format!("{host}/{bucket}")
            }
            None => format!("{bucket}.s3-website-{}.amazonaws.com", self.options.region),
        }
    }
}

impl ObjectStore for S3Store {
    fn create_bucket(&self, spec: &BucketSpec) -> StoreResult<ProvisionedBucket> {
        self.runtime.block_on(async {
            let mut create = self.client.create_bucket().bucket(&spec.name);
            if spec.public_read {
                create = create.acl(BucketCannedAcl::PublicRead);
            }
            // us-east-1 rejects an explicit location constraint
            if self.options.region != "us-east-1" {
                create = create.create_bucket_configuration(
                    CreateBucketConfiguration::builder()
                        .location_constraint(BucketLocationConstraint::from(
                            self.options.region.as_str(),
                        ))
                        .build(),
                );
            }

            if let Err(e) = create.send().await {
                let owned_already = e
                    .as_service_error()
                    .is_some_and(|svc| svc.is_bucket_already_owned_by_you());
                if !owned_already {
                    return Err(StoreError::CreateBucket {
                        bucket: spec.name.clone(),
                        message: error_chain(&e),
                    });
                }
                tracing::debug!(bucket = %spec.name, "bucket already exists, reusing");
            }

            let index = IndexDocument::builder()
                .suffix(&spec.website.index_document)
                .build()
                .map_err(|e| StoreError::CreateBucket {
                    bucket: spec.name.clone(),
                    message: e.to_string(),
                })?;
            self.client
                .put_bucket_website()
                .bucket(&spec.name)
                .website_configuration(
                    WebsiteConfiguration::builder().index_document(index).build(),
                )
                .send()
                .await
                .map_err(|e| StoreError::CreateBucket {
                    bucket: spec.name.clone(),
                    message: error_chain(&e),
                })?;

            tracing::debug!(bucket = %spec.name, "bucket provisioned for website hosting");
            Ok(ProvisionedBucket {
                name: spec.name.clone(),
                website_endpoint: self.website_endpoint(&spec.name),
            })
        })
    }

    fn put_object(&self, put: &PutObject) -> StoreResult<()> {
        self.runtime.block_on(async {
            let mut request = self
                .client
                .put_object()
                .bucket(&put.bucket)
                .key(&put.key)
                .body(put.body.clone().into())
                .content_type(&put.content_type);
            if put.public_read {
                request = request.acl(ObjectCannedAcl::PublicRead);
            }

            request.send().await.map_err(|e| StoreError::PutObject {
                bucket: put.bucket.clone(),
                key: put.key.clone(),
                message: error_chain(&e),
            })?;

            tracing::debug!(key = %put.key, "uploaded");
            Ok(())
        })
    }
}

async fn build_client(options: &S3Options) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(options.region.clone()));

    if let Some(endpoint) = &options.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;

    // Custom endpoints (LocalStack, MinIO) require path-style addressing
    // (endpoint/bucket/key) instead of virtual-hosted-style.
    if options.endpoint.is_some() {
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();
        return Client::from_conf(s3_config);
    }

    Client::new(&sdk_config)
}

/// Walk the error source chain and join all messages.
fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        msgs.push(s.to_string());
        source = s.source();
    }
    msgs.join(": ")
}
