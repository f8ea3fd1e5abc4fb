//! Configuration module for siteup
//!
//! Implements the configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SITEUP_*)
//! 3. Project config (siteup.toml in the working directory)
//! 4. User config (~/.config/siteup/config.toml)
//! 5. Built-in defaults (lowest priority)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, SiteResult};
use crate::stamp::DEFAULT_TOKEN;

/// Resolved configuration for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of site content files
    pub site_dir: PathBuf,

    /// Stack/environment name stamped into site files
    pub stack: Option<String>,

    /// Placeholder token rewritten before upload
    pub token: String,

    /// Bucket receiving the site objects
    pub bucket: Option<String>,

    /// Document served for directory requests
    pub index_document: String,

    /// AWS region
    pub region: String,

    /// S3-compatible endpoint URL (LocalStack, MinIO)
    pub endpoint: Option<String>,

    /// Fixed UTC offset for the stamp's clock time
    pub utc_offset_hours: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("www"),
            stack: None,
            token: DEFAULT_TOKEN.to_string(),
            bucket: None,
            index_document: "index.html".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            // US Central, the zone the stamp clock is rendered in
            utc_offset_hours: -5,
        }
    }
}

/// Partial config as it appears in a TOML file
///
/// Every field is optional so files only override what they set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    site_dir: Option<PathBuf>,
    stack: Option<String>,
    token: Option<String>,
    bucket: Option<String>,
    index_document: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
    utc_offset_hours: Option<i32>,
}

impl Config {
    /// Load one config file, collecting warnings for unknown keys
    pub fn load_with_warnings(path: &Path) -> SiteResult<(ConfigLayer, Vec<String>)> {
        let text = fs::read_to_string(path)?;
        let de = toml::de::Deserializer::new(&text);
        let mut warnings = Vec::new();
        let file: ConfigFile = serde_ignored::deserialize(de, |key| {
            warnings.push(format!("unknown config key '{key}'"));
        })
        .map_err(|e| SiteError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok((ConfigLayer(file), warnings))
    }

    /// Load user config then project config, lowest priority first
    ///
    /// Missing files are fine; parse failures are not.
    pub fn load_hierarchy(project_config: &Path) -> SiteResult<(Config, Vec<String>)> {
        let mut config = Config::default();
        let mut warnings = Vec::new();

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                let (layer, mut w) = Self::load_with_warnings(&user_path)?;
                config.apply(layer);
                warnings.append(&mut w);
            }
        }

        if project_config.exists() {
            let (layer, mut w) = Self::load_with_warnings(project_config)?;
            config.apply(layer);
            warnings.append(&mut w);
        }

        Ok((config, warnings))
    }

    /// Overlay a file layer onto this config
    pub fn apply(&mut self, layer: ConfigLayer) {
        let ConfigLayer(file) = layer;
        if let Some(v) = file.site_dir {
            self.site_dir = v;
        }
        if let Some(v) = file.stack {
            self.stack = Some(v);
        }
        if let Some(v) = file.token {
            self.token = v;
        }
        if let Some(v) = file.bucket {
            self.bucket = Some(v);
        }
        if let Some(v) = file.index_document {
            self.index_document = v;
        }
        if let Some(v) = file.region {
            self.region = v;
        }
        if let Some(v) = file.endpoint {
            self.endpoint = Some(v);
        }
        if let Some(v) = file.utc_offset_hours {
            self.utc_offset_hours = v;
        }
    }

    /// Overlay SITEUP_* environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay environment variables from a lookup function
    ///
    /// Split out so tests can pass a map instead of mutating the process
    /// environment.
    pub fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("SITEUP_SITE_DIR") {
            self.site_dir = PathBuf::from(v);
        }
        if let Some(v) = var("SITEUP_STACK") {
            self.stack = Some(v);
        }
        if let Some(v) = var("SITEUP_TOKEN") {
            self.token = v;
        }
        if let Some(v) = var("SITEUP_BUCKET") {
            self.bucket = Some(v);
        }
        if let Some(v) = var("SITEUP_REGION") {
            self.region = v;
        }
        if let Some(v) = var("SITEUP_ENDPOINT") {
            self.endpoint = Some(v);
        }
        if let Some(v) = var("SITEUP_UTC_OFFSET_HOURS") {
            if let Ok(hours) = v.parse() {
                self.utc_offset_hours = hours;
            }
        }
    }

    /// Path of the user-level config file, if a config dir exists
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("siteup").join("config.toml"))
    }

    /// Stack name or the error telling the user where to set it
    pub fn require_stack(&self) -> SiteResult<&str> {
        self.stack.as_deref().ok_or(SiteError::MissingStack)
    }

    /// Bucket name or the error telling the user where to set it
    pub fn require_bucket(&self) -> SiteResult<&str> {
        self.bucket.as_deref().ok_or(SiteError::MissingBucket)
    }
}

/// One parsed config file, applied onto a [`Config`] in precedence order
#[derive(Debug)]
pub struct ConfigLayer(ConfigFile);
