//! Schema catalog loading.
//!
//! A catalog file is YAML or JSON with a top-level `types` list:
//!
//! ```yaml
//! types:
//!   - type_name: AWS::Oam::Link
//!     fields:
//!       - name: labelTemplate
//!         kind: string
//!         required: true
//!       - name: resourceTypes
//!         kind: list<string>
//!         required: true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{SchemaError, SchemaResult};
use crate::registry::SchemaRegistry;
use crate::schema::PropertySchema;

/// Contents of one catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub types: Vec<PropertySchema>,
}

/// Loads schema catalog files from one or more directories.
pub struct SchemaLoader {
    paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a loader for a single directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    /// Add another directory (or single file) to load from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Load every catalog file found under the configured paths.
    ///
    /// Files that fail to parse are skipped with a warning; use
    /// [`load_file`](Self::load_file) to surface the error instead.
    pub fn load_all(&self) -> SchemaResult<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();

        for root in &self.paths {
            if !root.exists() {
                warn!("Schema path does not exist: {:?}", root);
                continue;
            }

            for entry in WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() || !Self::is_catalog_file(path) {
                    continue;
                }

                match Self::load_file(path) {
                    Ok(document) => {
                        debug!("Loaded {} schema(s) from {:?}", document.types.len(), path);
                        for schema in document.types {
                            registry.register(schema);
                        }
                    }
                    Err(e) => {
                        warn!("Failed to load schema file {:?}: {}", path, e);
                    }
                }
            }
        }

        for dangling in registry.check_references() {
            warn!("{}", dangling);
        }

        info!("Loaded {} schema type(s)", registry.len());
        Ok(registry)
    }

    /// Load a single catalog file.
    pub fn load_file(path: &Path) -> SchemaResult<SchemaDocument> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| SchemaError::InvalidFile {
            path: path.to_path_buf(),
            message,
        })
    }

    fn is_catalog_file(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map_or(false, |ext| ext == "yaml" || ext == "yml" || ext == "json")
    }
}
