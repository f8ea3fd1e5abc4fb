use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// siteup - static site stamping and bucket publishing
#[derive(Parser, Debug)]
#[command(name = "siteup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output line-delimited JSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the site bucket, stamp site files, and upload them
    Publish {
        /// Directory of site content files
        #[arg(short, long)]
        site_dir: Option<PathBuf>,

        /// Stack/environment name stamped into site files
        #[arg(long)]
        stack: Option<String>,

        /// Bucket receiving the site objects
        #[arg(short, long)]
        bucket: Option<String>,

        /// S3-compatible endpoint URL (LocalStack, MinIO)
        #[arg(long)]
        endpoint: Option<String>,

        /// Skip uploading files whose rewrite failed
        #[arg(long)]
        skip_failed: bool,

        /// Dry run - show what would be done
        #[arg(long)]
        dry_run: bool,
    },

    /// Stamp site files in place without uploading
    Stamp {
        /// Directory of site content files
        #[arg(short, long)]
        site_dir: Option<PathBuf>,

        /// Stack/environment name stamped into site files
        #[arg(long)]
        stack: Option<String>,

        /// Dry run - report matches without writing
        #[arg(long)]
        dry_run: bool,
    },
}
