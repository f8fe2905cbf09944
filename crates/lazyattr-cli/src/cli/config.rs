//! # Configuration
//!
//! CLI settings are loaded with [`confique`], in priority order:
//!
//! 1. **Environment variables**: `LAZYATTR_PRETTY`, `LAZYATTR_SCHEMA`.
//! 2. **Explicit file**: `--config FILE`.
//! 3. **User config**: `lazyattr.toml` in the OS config directory (via `directories`).
//! 4. **Compiled defaults**.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `pretty` | `true` | Pretty-print JSON output |
//! | `schema` | none | Schema used when `--schema` is not given |
//!
//! The library itself takes no configuration: every behavior is declared per property.

use std::path::{Path, PathBuf};

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "lazyattr.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Pretty-print JSON output.
    #[config(env = "LAZYATTR_PRETTY", default = true)]
    pub pretty: bool,

    /// Schema file used when `--schema` is not passed.
    #[config(env = "LAZYATTR_SCHEMA")]
    pub schema: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            schema: None,
        }
    }
}

impl CliConfig {
    /// Load from the environment, `explicit` (if given) and the user config file.
    /// Missing files are skipped.
    pub fn load(explicit: Option<&Path>) -> Result<Self, confique::Error> {
        let mut builder = CliConfig::builder().env();
        if let Some(path) = explicit {
            builder = builder.file(path);
        }
        if let Some(path) = user_config_path() {
            builder = builder.file(path);
        }
        builder.load()
    }

    /// `--schema` wins over the configured one.
    pub fn schema_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.schema.clone())
    }
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "lazyattr", "lazyattr").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
