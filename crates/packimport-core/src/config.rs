use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::descriptor::DEFAULT_SOURCE_SUFFIX;
use crate::errors::ConfigError;
use crate::hook::Priority;

/// Default configuration file name written by `packimport init`.
pub const CONFIG_FILE_NAME: &str = "packimport.json";

/// Import configuration, read from `packimport.json` or a YAML equivalent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfig {
    /// Extension appended to module names to form resource keys (default: py)
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,

    /// Where the resource finder is installed (default: front)
    #[serde(default)]
    pub priority: Priority,

    /// Directories searched by the path finder, in order
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Directory used as the resource store during development
    #[serde(default)]
    pub resource_dir: Option<PathBuf>,

    /// Resource package file; wins over `resourceDir` when both are set
    #[serde(default)]
    pub package: Option<PathBuf>,

    /// Pretty-print diagnostics (default: true)
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_source_suffix() -> String {
    DEFAULT_SOURCE_SUFFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source_suffix: default_source_suffix(),
            priority: Priority::Front,
            search_paths: Vec::new(),
            resource_dir: None,
            package: None,
            pretty: true,
        }
    }
}

/// Settings given on the command line. `None` keeps the file's value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source_suffix: Option<String>,
    pub priority: Option<Priority>,
    pub search_paths: Vec<PathBuf>,
    pub resource_dir: Option<PathBuf>,
    pub package: Option<PathBuf>,
}

impl ImportConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        Ok(config)
    }

    /// Create a default configuration and write it to a file
    pub fn init_file(path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&ImportConfig::default())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Apply CLI overrides on top of this configuration.
    ///
    /// Search paths given on the command line are searched before the
    /// configured ones.
    pub fn merge(&mut self, overrides: CliOverrides) {
        if let Some(suffix) = overrides.source_suffix {
            self.source_suffix = suffix;
        }
        if let Some(priority) = overrides.priority {
            self.priority = priority;
        }
        if !overrides.search_paths.is_empty() {
            let configured = std::mem::take(&mut self.search_paths);
            self.search_paths = overrides.search_paths;
            self.search_paths.extend(configured);
        }
        if overrides.resource_dir.is_some() {
            self.resource_dir = overrides.resource_dir;
        }
        if overrides.package.is_some() {
            self.package = overrides.package;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::default();
        assert_eq!(config.source_suffix, "py");
        assert_eq!(config.priority, Priority::Front);
        assert!(config.search_paths.is_empty());
        assert!(config.pretty);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let json = r#"{ "priority": "back", "searchPaths": ["lib"] }"#;
        let config: ImportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.priority, Priority::Back);
        assert_eq!(config.search_paths, vec![PathBuf::from("lib")]);
        assert_eq!(config.source_suffix, "py");
    }

    #[test]
    fn test_yaml_file_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packimport.yaml");
        std::fs::write(&path, "sourceSuffix: lua\npackage: game.pak\n").unwrap();

        let config = ImportConfig::from_file(&path).unwrap();

        assert_eq!(config.source_suffix, "lua");
        assert_eq!(config.package, Some(PathBuf::from("game.pak")));
    }

    #[test]
    fn test_init_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        ImportConfig::init_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"sourceSuffix\": \"py\""));
        assert_eq!(ImportConfig::from_file(&path).unwrap(), ImportConfig::default());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ priority: ").unwrap();

        assert!(matches!(
            ImportConfig::from_file(&path),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_merge_overrides() {
        let mut config = ImportConfig {
            search_paths: vec![PathBuf::from("lib")],
            ..ImportConfig::default()
        };

        config.merge(CliOverrides {
            priority: Some(Priority::Back),
            search_paths: vec![PathBuf::from("vendor")],
            package: Some(PathBuf::from("game.pak")),
            ..CliOverrides::default()
        });

        assert_eq!(config.priority, Priority::Back);
        assert_eq!(
            config.search_paths,
            vec![PathBuf::from("vendor"), PathBuf::from("lib")]
        );
        assert_eq!(config.package, Some(PathBuf::from("game.pak")));
        assert_eq!(config.source_suffix, "py");
    }
}
