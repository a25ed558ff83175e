//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tree-builder/tree-builder.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `TREE_BUILDER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::util::path::expand_env_vars;

/// Unified configuration for tree-builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Payload field shown as node label (default: "name")
    pub label_field: String,
    /// Pretty-print exported JSON (default: true)
    pub pretty: bool,
    /// Tree file used when none is given on the command line
    pub default_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label_field: "name".into(),
            pretty: true,
            default_file: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub label_field: Option<String>,
    pub pretty: Option<bool>,
    pub default_file: Option<PathBuf>,
}

/// Get the XDG config directory for tree-builder.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tree-builder").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tree-builder.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(file) = &self.default_file {
            self.default_file = Some(PathBuf::from(expand_env_vars(&file.to_string_lossy())));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            label_field: overlay
                .label_field
                .clone()
                .unwrap_or_else(|| self.label_field.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
            default_file: overlay
                .default_file
                .clone()
                .or_else(|| self.default_file.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file; it must exist when given
    #[instrument(level = "debug")]
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Load defaults plus a single file, without global config or env vars.
    pub fn load_from(path: &Path) -> Result<Self, ApplicationError> {
        let mut settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.expand_paths();
        Ok(settings)
    }

    /// Apply TREE_BUILDER_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREE_BUILDER").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("label_field") {
            settings.label_field = val;
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }
        if let Ok(val) = config.get_string("default_file") {
            settings.default_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# tree-builder configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/tree-builder/tree-builder.toml
#   Local:  --config <file>
#   Env:    TREE_BUILDER_* environment variables

# Payload field shown next to the node id
# label_field = "name"

# Pretty-print exported JSON
# pretty = true

# Tree file used when none is given on the command line
# default_file = "~/trees/categories.json"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_no_config_when_loading_defaults_then_name_label() {
        let settings = Settings::default();
        assert_eq!(settings.label_field, "name");
        assert!(settings.pretty);
        assert!(settings.default_file.is_none());
    }

    #[test]
    fn given_partial_file_when_loading_then_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree-builder.toml");
        fs::write(&path, "pretty = false\n").unwrap();

        let settings = Settings::load_from(&path).expect("load settings");

        assert!(!settings.pretty);
        assert_eq!(settings.label_field, "name");
    }

    #[test]
    fn given_tilde_in_default_file_when_loading_then_expands_to_home() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree-builder.toml");
        fs::write(&path, "default_file = \"~/trees/a.json\"\n").unwrap();

        let settings = Settings::load_from(&path).expect("load settings");

        let home = std::env::var("HOME").expect("HOME should be set");
        let file = settings.default_file.unwrap();
        assert!(file.to_string_lossy().starts_with(&home));
        assert!(!file.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_invalid_toml_when_loading_then_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "pretty = [").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_missing_explicit_file_when_loading_then_config_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/tree-builder.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tree-builder.toml"));
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips() {
        let settings = Settings {
            label_field: "title".into(),
            pretty: false,
            default_file: None,
        };
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
