//! Publish command - provision the bucket, stamp site files, upload them
//!
//! Orchestration only; the work happens in `siteup::publish` and
//! `siteup::store`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use siteup::{
    BucketSpec, MemoryStore, ObjectStore, ProvisionedBucket, PublishEvent, PublishOptions,
    PublishReport, Publisher, RewriteFailurePolicy, S3Options, S3Store, Stamp, WebsiteConfig,
};

use crate::output::Output;

/// Flags the publish subcommand accepts
#[derive(Debug, Default)]
pub struct PublishArgs {
    pub site_dir: Option<PathBuf>,
    pub stack: Option<String>,
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub skip_failed: bool,
    pub dry_run: bool,
}

pub fn run(args: PublishArgs, json: bool, verbose: u8) -> Result<()> {
    let out = Output::new(json);
    let mut config = super::load_config(&out)?;

    // CLI flags win over env and files
    if let Some(dir) = args.site_dir {
        config.site_dir = dir;
    }
    if let Some(stack) = args.stack {
        config.stack = Some(stack);
    }
    if let Some(bucket) = args.bucket {
        config.bucket = Some(bucket);
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }

    let stack = config.require_stack()?.to_string();
    let bucket_name = config.require_bucket()?.to_string();
    let stamp = Stamp::now(config.token.clone(), &stack, config.utc_offset_hours);

    let mut modes: Vec<&str> = Vec::new();
    if args.dry_run {
        modes.push("dry run");
    }
    if args.skip_failed {
        modes.push("skip failed");
    }
    out.plain(&format!(
        "Publishing {} -> s3://{} (stack: {}{}{})",
        config.site_dir.display(),
        bucket_name,
        stack,
        if modes.is_empty() { "" } else { ", " },
        modes.join(", ")
    ));

    if json {
        emit(&json!({
            "event": "start",
            "command": "publish",
            "site_dir": config.site_dir.display().to_string(),
            "bucket": bucket_name,
            "stack": stack,
            "dry_run": args.dry_run,
        }));
    }

    let options = PublishOptions {
        dry_run: args.dry_run,
        on_rewrite_failure: if args.skip_failed {
            RewriteFailurePolicy::Skip
        } else {
            RewriteFailurePolicy::UploadAsIs
        },
    };

    let spec = BucketSpec {
        name: bucket_name.clone(),
        website: WebsiteConfig {
            index_document: config.index_document.clone(),
        },
        public_read: true,
    };

    // Dry runs never touch the store, so the in-memory backend stands in
    let (report, bucket) = if args.dry_run {
        let store = MemoryStore::new();
        let report = run_engine(
            &store,
            &stamp,
            options,
            &config.site_dir,
            &bucket_name,
            json,
            verbose,
        )?;
        (report, None)
    } else {
        let store = S3Store::connect(S3Options {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        })?;
        let bucket = store.create_bucket(&spec)?;
        let report = run_engine(
            &store,
            &stamp,
            options,
            &config.site_dir,
            &bucket.name,
            json,
            verbose,
        )?;
        (report, Some(bucket))
    };

    render_report(&out, &report, verbose);
    if let Some(bucket) = &bucket {
        out.plain(&format!("Bucket:  {}", bucket.uri()));
        out.plain(&format!("Website: {}", bucket.website_url()));
    }

    if json {
        emit(&summary_json(&report, bucket.as_ref()));
    }

    if !report.is_success() {
        anyhow::bail!("publish completed with {} failure(s)", report.failures.len());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_engine<S: ObjectStore>(
    store: &S,
    stamp: &Stamp,
    options: PublishOptions,
    site_dir: &std::path::Path,
    bucket: &str,
    json: bool,
    verbose: u8,
) -> Result<PublishReport> {
    let publisher = Publisher::new(store, stamp, options);
    let out = Output::new(json);

    let callback = |event: PublishEvent| match event {
        PublishEvent::FileRewritten {
            name, occurrences, ..
        } => {
            if verbose > 0 {
                out.plain(&format!("  stamped {name} ({occurrences} occurrence(s))"));
            }
            if json {
                emit(&json!({"event": "rewritten", "file": name, "occurrences": occurrences}));
            }
        }
        PublishEvent::FileUploaded { key, .. } => {
            if verbose > 0 {
                out.plain(&format!("  uploaded {key}"));
            }
            if json {
                emit(&json!({"event": "uploaded", "key": key}));
            }
        }
        PublishEvent::FileError { name, message, .. } => {
            out.warn(&format!("  {name}: {message}"));
            if json {
                emit(&json!({"event": "error", "file": name, "message": message}));
            }
        }
        PublishEvent::FileStart { .. } => {}
    };

    let report = publisher.publish_with_callback(site_dir, bucket, Some(callback))?;
    Ok(report)
}

fn render_report(out: &Output, report: &PublishReport, verbose: u8) {
    let line = format!(
        "{} uploaded, {} rewritten, {} skipped, {} failed",
        report.uploaded.len(),
        report.rewritten.len(),
        report.skipped.len(),
        report.failures.len()
    );
    if report.is_success() {
        out.success(&line);
    } else {
        out.warn(&line);
        for failure in &report.failures {
            out.warn(&format!(
                "  {} failed during {}: {}",
                failure.path.display(),
                failure.stage,
                failure.message
            ));
        }
    }
    if verbose > 1 {
        for key in &report.uploaded {
            out.plain(&format!("  object: {key}"));
        }
    }
}

fn summary_json(report: &PublishReport, bucket: Option<&ProvisionedBucket>) -> serde_json::Value {
    json!({
        "event": "summary",
        "uploaded": report.uploaded,
        "rewritten": report.rewritten,
        "skipped": report.skipped,
        "failures": report
            .failures
            .iter()
            .map(|f| json!({
                "path": f.path.display().to_string(),
                "stage": f.stage.to_string(),
                "message": f.message,
            }))
            .collect::<Vec<_>>(),
        "bucket_uri": bucket.map(ProvisionedBucket::uri),
        "website_url": bucket.map(ProvisionedBucket::website_url),
    })
}

/// One JSON event per line on stdout
fn emit(value: &serde_json::Value) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{value}");
}
