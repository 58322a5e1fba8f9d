//! `cfnkit.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File looked up in the current directory when no `--config` is given.
pub const CONFIG_FILE: &str = "cfnkit.toml";

/// Serialization format for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        self == OutputFormat::Json
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directories (or files) holding schema catalogs
    pub schema_dirs: Vec<PathBuf>,
    /// Default output format
    pub output: OutputFormat,
    /// Reject property names the schema does not declare
    pub strict_unknown: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema_dirs: vec![PathBuf::from("schemas")],
            output: OutputFormat::Json,
            strict_unknown: true,
        }
    }
}

impl CliConfig {
    /// Load from an explicit path, or from `cfnkit.toml` in `dir` when it
    /// exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let candidate = dir.join(CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)
                } else {
                    debug!("No {} found, using defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        // Relative schema directories are relative to the config file.
        if let Some(base) = path.parent() {
            for dir in &mut config.schema_dirs {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn with_schema_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        if !dirs.is_empty() {
            self.schema_dirs = dirs;
        }
        self
    }

    pub fn with_output(mut self, output: Option<OutputFormat>) -> Self {
        if let Some(output) = output {
            self.output = output;
        }
        self
    }

    pub fn allow_unknown(mut self, allow: bool) -> Self {
        if allow {
            self.strict_unknown = false;
        }
        self
    }
}
