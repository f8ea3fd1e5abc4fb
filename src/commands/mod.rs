//! CLI command implementations

pub mod publish;
pub mod stamp;

use std::path::Path;

use siteup::{Config, SiteResult};

use crate::output::Output;

/// Project config file looked up next to the working directory
const PROJECT_CONFIG: &str = "siteup.toml";

/// Load the config hierarchy and print any warnings it produced
pub fn load_config(out: &Output) -> SiteResult<Config> {
    let (mut config, warnings) = Config::load_hierarchy(Path::new(PROJECT_CONFIG))?;
    for warning in &warnings {
        out.warn(&format!("config: {warning}"));
    }
    config.apply_env();
    Ok(config)
}
