//! Stamp command - rewrite site files in place without uploading

use std::path::PathBuf;

use anyhow::Result;

use siteup::publish::stamp_directory;
use siteup::Stamp;

use crate::output::Output;

/// Flags the stamp subcommand accepts
#[derive(Debug, Default)]
pub struct StampArgs {
    pub site_dir: Option<PathBuf>,
    pub stack: Option<String>,
    pub dry_run: bool,
}

pub fn run(args: StampArgs, json: bool, verbose: u8) -> Result<()> {
    let out = Output::new(json);
    let mut config = super::load_config(&out)?;

    if let Some(dir) = args.site_dir {
        config.site_dir = dir;
    }
    if let Some(stack) = args.stack {
        config.stack = Some(stack);
    }

    let stack = config.require_stack()?.to_string();
    let stamp = Stamp::now(config.token.clone(), &stack, config.utc_offset_hours);

    let report = stamp_directory(&config.site_dir, &stamp, args.dry_run)?;

    let verb = if args.dry_run { "would stamp" } else { "stamped" };
    out.success(&format!(
        "{verb} {} of the files in {}",
        report.rewritten.len(),
        config.site_dir.display()
    ));
    if verbose > 0 {
        for name in &report.rewritten {
            out.plain(&format!("  {name}"));
        }
    }
    for failure in &report.failures {
        out.warn(&format!(
            "  {}: {}",
            failure.path.display(),
            failure.message
        ));
    }

    if json {
        let value = serde_json::json!({
            "event": "summary",
            "command": "stamp",
            "rewritten": report.rewritten,
            "failures": report.failures.len(),
            "dry_run": args.dry_run,
        });
        println!("{value}");
    }

    if !report.is_success() {
        anyhow::bail!("stamp completed with {} failure(s)", report.failures.len());
    }
    Ok(())
}
