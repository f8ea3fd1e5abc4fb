//! CLI tests for `siteup publish --dry-run`.
//!
//! Dry runs never reach a real object store, so these exercise the full
//! command path without credentials or network.

mod common;

use common::{run_siteup, TestSite};

#[test]
fn publish_dry_run_reports_without_touching_files() {
    let site = TestSite::new(&[
        ("index.html", "Hello PULUMI_ENVIRONMENT"),
        ("about.html", "static"),
    ]);

    let result = run_siteup(
        site.path(),
        &[
            "publish", "--site-dir", ".", "--stack", "dev", "--bucket", "demo", "--dry-run",
        ],
    );

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(site.read("index.html"), "Hello PULUMI_ENVIRONMENT");
    assert!(result.combined_output().contains("2 uploaded"));
}

#[test]
fn publish_dry_run_json_summary_lists_objects() {
    let site = TestSite::new(&[("index.html", "PULUMI_ENVIRONMENT")]);

    let result = run_siteup(
        site.path(),
        &[
            "publish", "--site-dir", ".", "--stack", "dev", "--bucket", "demo", "--dry-run",
            "--json",
        ],
    );

    assert!(result.success, "{}", result.combined_output());

    let summary = result
        .stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|v| v["event"] == "summary")
        .expect("summary event in JSON output");
    assert_eq!(summary["uploaded"][0], "index.html");
    assert_eq!(summary["rewritten"][0], "index.html");
    assert!(summary["bucket_uri"].is_null());
}

#[test]
fn publish_without_bucket_fails_with_guidance() {
    let site = TestSite::new(&[("index.html", "x")]);

    let result = run_siteup(
        site.path(),
        &["publish", "--site-dir", ".", "--stack", "dev", "--dry-run"],
    );

    assert!(!result.success);
    assert!(
        result.stderr.contains("--bucket"),
        "error should point at --bucket; got:\n{}",
        result.stderr
    );
}

#[test]
fn publish_reads_config_file_from_working_directory() {
    let site = TestSite::new(&[("index.html", "PULUMI_ENVIRONMENT")]);
    std::fs::write(
        site.path().join("siteup.toml"),
        "stack = \"staging\"\nbucket = \"cfg-bucket\"\nsite_dir = \".\"\n",
    )
    .unwrap();

    let result = run_siteup(site.path(), &["publish", "--dry-run", "--json"]);

    assert!(result.success, "{}", result.combined_output());
    let start = result
        .stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|v| v["event"] == "start")
        .expect("start event in JSON output");
    assert_eq!(start["stack"], "staging");
    assert_eq!(start["bucket"], "cfg-bucket");
}
