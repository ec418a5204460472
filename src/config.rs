//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/navtree/navtree.toml`
//! 3. Local config: `<dir>/.navtree.toml`
//! 4. Environment variables: `NAVTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, DEFAULT_EVENT_CAPACITY};
use crate::domain::{expand_env_vars, DEFAULT_SECTION};

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub default_section: Option<String>,
    pub event_capacity: Option<usize>,
}

/// Unified configuration for navtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the JSON payloads served by the data source
    pub data_dir: PathBuf,
    /// Section used when none is given on the command line
    pub default_section: String,
    /// Events buffered per subscriber before the slowest one lags
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_section: DEFAULT_SECTION.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Get the default data directory (XDG data dir, else ~/.navtree/data).
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "navtree")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.navtree/data"))
}

/// Get the XDG config directory for navtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "navtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("navtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".navtree.toml")
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
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Overlay wins wherever it specifies a value.
    ///
    /// A relative `data_dir` in a file is resolved against that file's directory.
    fn merge_with(&self, overlay: &RawSettings, base_dir: Option<&Path>) -> Self {
        let data_dir = overlay
            .data_dir
            .as_ref()
            .map(|dir| match base_dir {
                Some(base) if dir.is_relative() && !dir.starts_with("~") => base.join(dir),
                _ => dir.clone(),
            })
            .unwrap_or_else(|| self.data_dir.clone());

        Self {
            data_dir,
            default_section: overlay
                .default_section
                .clone()
                .unwrap_or_else(|| self.default_section.clone()),
            event_capacity: overlay.event_capacity.unwrap_or(self.event_capacity),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.navtree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw, global_path.parent());
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(dir));
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply NAVTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("NAVTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("default_section") {
            settings.default_section = val;
        }
        match config.get::<usize>("event_capacity") {
            Ok(val) => settings.event_capacity = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.default_section.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "default_section must not be empty".into(),
            });
        }
        if self.event_capacity == 0 {
            return Err(ApplicationError::Config {
                message: "event_capacity must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Render as TOML (for `config show`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
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

    #[test]
    fn test_defaults_target_content_section() {
        let settings = Settings::default();
        assert_eq!(settings.default_section, "content");
        assert_eq!(settings.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_overlay_wins_only_where_specified() {
        let base = Settings::default();
        let overlay = RawSettings {
            default_section: Some("media".into()),
            ..RawSettings::default()
        };
        let merged = base.merge_with(&overlay, None);
        assert_eq!(merged.default_section, "media");
        assert_eq!(merged.data_dir, base.data_dir);
        assert_eq!(merged.event_capacity, base.event_capacity);
    }

    #[test]
    fn test_relative_data_dir_resolves_against_config_dir() {
        let overlay = RawSettings {
            data_dir: Some(PathBuf::from("payloads")),
            ..RawSettings::default()
        };
        let merged = Settings::default().merge_with(&overlay, Some(Path::new("/srv/site")));
        assert_eq!(merged.data_dir, PathBuf::from("/srv/site/payloads"));
    }

    #[test]
    fn test_zero_event_capacity_is_rejected() {
        let settings = Settings {
            event_capacity: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ApplicationError::Config { .. })));
    }
}
