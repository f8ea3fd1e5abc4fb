//! Common test utilities for siteup integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running the siteup CLI
#[derive(Debug)]
pub struct CliResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// A temp site directory seeded with files
pub struct TestSite {
    pub dir: TempDir,
}

impl TestSite {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("create temp site dir");
        for (name, content) in files {
            fs::write(dir.path().join(name), content).expect("seed site file");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read site file")
    }
}

/// Run the siteup binary with an isolated working dir and config home
pub fn run_siteup(work_dir: &Path, args: &[&str]) -> CliResult {
    let config_home = work_dir.join(".test-config");
    let _ = fs::create_dir_all(&config_home);

    let output = Command::new(siteup_bin())
        .args(args)
        .current_dir(work_dir)
        .env("XDG_CONFIG_HOME", &config_home)
        .env_remove("SITEUP_STACK")
        .env_remove("SITEUP_BUCKET")
        .env_remove("SITEUP_SITE_DIR")
        .output()
        .expect("run siteup binary");

    CliResult {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

fn siteup_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_siteup"))
}
