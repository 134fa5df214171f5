//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/animals/animals.toml`
//! 3. Local config: `<dir>/.animals.toml` (usually the working directory)
//! 4. Environment variables: `ANIMALS_*` prefix
//! 5. Command line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, LanguageKind};
use crate::infrastructure::StorageFormat;

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the knowledge base (default: current directory)
    pub data_dir: PathBuf,
    /// Knowledge base file name without extension (default: "animals")
    pub file_stem: String,
    /// Serialization format of the knowledge base
    pub format: StorageFormat,
    /// Phrasing rules for animals and statements
    pub language: LanguageKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_stem: "animals".into(),
            format: StorageFormat::default(),
            language: LanguageKind::default(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub file_stem: Option<String>,
    pub format: Option<StorageFormat>,
    pub language: Option<LanguageKind>,
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "animals").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("animals.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".animals.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
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
    /// Full path of the knowledge base file.
    pub fn knowledge_base_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", self.file_stem, self.format.extension()))
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            file_stem: overlay
                .file_stem
                .clone()
                .unwrap_or_else(|| self.file_stem.clone()),
            format: overlay.format.unwrap_or(self.format),
            language: overlay.language.unwrap_or(self.language),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.animals.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ANIMALS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("ANIMALS").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("file_stem") {
            settings.file_stem = val;
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = StorageFormat::from_str(&val, true).map_err(|e| {
                ApplicationError::Config {
                    message: format!("ANIMALS_FORMAT: {}", e),
                }
            })?;
        }
        if let Ok(val) = config.get_string("language") {
            settings.language = LanguageKind::from_str(&val, true).map_err(|e| {
                ApplicationError::Config {
                    message: format!("ANIMALS_LANGUAGE: {}", e),
                }
            })?;
        }

        Ok(settings)
    }

    /// Serialize to TOML (for `config show`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Generate a template config file with comments.
    pub fn template() -> String {
        r#"# animals configuration

# Directory holding the knowledge base (supports ~ and $VAR)
# data_dir = "."

# Knowledge base file name without extension
# file_stem = "animals"

# Knowledge base format: "json", "yaml" or "toml"
# format = "json"

# Phrasing rules: "english" or "plain"
# language = "english"
"#
        .to_string()
    }
}

/// Convert config crate errors to ApplicationError.
fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
