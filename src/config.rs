//! # Configuration
//!
//! Resolves the effective settings for a run.
//!
//! ## Sources
//!
//! Highest precedence first:
//!
//! 1. Command-line flags (`--include-untracked [BOOL]`)
//! 2. Environment (`FLATPACK_INCLUDE_UNTRACKED`)
//! 3. `.flatpack.toml` at the repository root
//! 4. Built-in defaults
//!
//! ```toml
//! # .flatpack.toml
//! include_untracked = false
//! ```
//!
//! A malformed file or environment value is reported and ignored; it never
//! aborts the run.

use crate::error::{FlatpackError, Result};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = ".flatpack.toml";
const ENV_PREFIX: &str = "FLATPACK_";

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    include_untracked: Option<bool>,
}

/// Effective settings reported in the stream header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub include_untracked: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_untracked: true,
        }
    }
}

impl Settings {
    /// Resolve settings for the repository at `repo_root`.
    pub fn resolve(repo_root: &Path, cli_include_untracked: Option<bool>) -> Self {
        let mut settings = Self::default();

        match load_file(repo_root) {
            Ok(Some(file)) => {
                if let Some(include_untracked) = file.include_untracked {
                    settings.include_untracked = include_untracked;
                }
            }
            Ok(None) => {}
            Err(err) => warn!("{err}; using defaults"),
        }

        let key = format!("{ENV_PREFIX}INCLUDE_UNTRACKED");
        if let Ok(raw) = env::var(&key) {
            match parse_bool(&raw) {
                Ok(value) => settings.include_untracked = value,
                Err(err) => warn!("ignoring {key}: {err}"),
            }
        }

        if let Some(value) = cli_include_untracked {
            settings.include_untracked = value;
        }

        debug!("resolved settings: {settings:?}");
        settings
    }
}

fn load_file(repo_root: &Path) -> Result<Option<FileConfig>> {
    let config_path = repo_root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(None);
    }

    let path = config_path
        .to_str()
        .ok_or_else(|| FlatpackError::Config("Invalid config path".into()))?;

    let cfg = Config::builder()
        .add_source(File::new(path, FileFormat::Toml))
        .build()
        .map_err(|err| FlatpackError::Config(format!("failed to load {CONFIG_FILE}: {err}")))?;

    cfg.try_deserialize::<FileConfig>()
        .map(Some)
        .map_err(|err| FlatpackError::Config(format!("invalid {CONFIG_FILE}: {err}")))
}

/// Parse a permissive boolean: `1/true/t/yes/y/on` or `0/false/f/no/n/off`.
pub fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(format!("expected boolean (true/false), got: {value}")),
    }
}
