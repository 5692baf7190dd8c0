//! Runtime configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file (or no file at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::error::ConfigError;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrineConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub engine: EngineSection,
}

/// How query answers are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Printed in place of results when a query matches nothing.
    #[serde(default = "default_null_marker")]
    pub null_marker: String,
    /// Sort result lines for reproducible output.
    #[serde(default)]
    pub sorted: bool,
}

/// How triple files are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Parse several triple files in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

/// Table sizing hints, see [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_node_capacity")]
    pub node_capacity: usize,
    #[serde(default = "default_triple_capacity")]
    pub triple_capacity: usize,
}

fn default_node_capacity() -> usize {
    EngineConfig::default().node_capacity
}

fn default_triple_capacity() -> usize {
    EngineConfig::default().triple_capacity
}

fn default_null_marker() -> String {
    "<null>".into()
}

fn default_parallel() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            null_marker: default_null_marker(),
            sorted: false,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            node_capacity: default_node_capacity(),
            triple_capacity: default_triple_capacity(),
        }
    }
}

impl TrineConfig {
    /// Build an [`EngineConfig`] from the `[engine]` section.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            node_capacity: self.engine.node_capacity,
            triple_capacity: self.engine.triple_capacity,
        }
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: TrineConfig = toml::from_str("").unwrap();
        assert_eq!(config, TrineConfig::default());
        assert_eq!(config.output.null_marker, "<null>");
        assert!(config.import.parallel);
        assert!(!config.output.sorted);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: TrineConfig = toml::from_str("[output]\nsorted = true\n").unwrap();
        assert!(config.output.sorted);
        assert_eq!(config.output.null_marker, "<null>");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("trine.toml");
        let mut config = TrineConfig::default();
        config.output.null_marker = "(none)".into();
        config.import.parallel = false;

        config.save(&path).unwrap();
        assert_eq!(TrineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[output\nsorted = ").unwrap();
        assert!(matches!(TrineConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn engine_section_sizes_the_engine() {
        let config: TrineConfig =
            toml::from_str("[engine]\nnode_capacity = 16\n").unwrap();
        let engine_config = config.to_engine_config();
        assert_eq!(engine_config.node_capacity, 16);
        assert_eq!(
            engine_config.triple_capacity,
            EngineConfig::default().triple_capacity
        );

        let engine = crate::engine::Engine::new(engine_config);
        assert_eq!(engine.config().node_capacity, 16);
    }

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(TrineConfig::load_or_default(None).unwrap(), TrineConfig::default());
    }
}
