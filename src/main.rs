//! siteup CLI - static site stamping and bucket publishing
//!
//! Usage: siteup <COMMAND>
//!
//! Commands:
//!   publish  Provision the site bucket, stamp site files, and upload them
//!   stamp    Stamp site files in place without uploading

mod cli;
mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::publish::PublishArgs;
use commands::stamp::StampArgs;

fn main() {
    let cli = Cli::parse();

    // -v raises the default level; RUST_LOG always wins when set
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            _ => EnvFilter::new("debug"),
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Publish {
            site_dir,
            stack,
            bucket,
            endpoint,
            skip_failed,
            dry_run,
        } => commands::publish::run(
            PublishArgs {
                site_dir,
                stack,
                bucket,
                endpoint,
                skip_failed,
                dry_run,
            },
            cli.json,
            cli.verbose,
        ),
        Commands::Stamp {
            site_dir,
            stack,
            dry_run,
        } => commands::stamp::run(
            StampArgs {
                site_dir,
                stack,
                dry_run,
            },
            cli.json,
            cli.verbose,
        ),
    };

    if let Err(err) = result {
        let out = output::Output::new(cli.json);
        out.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}
