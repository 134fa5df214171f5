//! Persistence of the knowledge tree
//!
//! The tree is written as a nested map, internally tagged by `kind`. The same
//! shape is used for every format:
//!
//! ```yaml
//! kind: question
//! statement: It can fly
//! yes:
//!   kind: leaf
//!   animal: a bird
//! no:
//!   kind: leaf
//!   animal: a dog
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::Node;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

/// Serialization format of the knowledge base file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

impl StorageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StorageFormat::Json => "json",
            StorageFormat::Yaml => "yaml",
            StorageFormat::Toml => "toml",
        }
    }

    pub fn serialize(self, root: &Node) -> InfraResult<String> {
        let content = match self {
            StorageFormat::Json => serde_json::to_string_pretty(root).map_err(|e| e.to_string()),
            StorageFormat::Yaml => serde_yaml::to_string(root).map_err(|e| e.to_string()),
            StorageFormat::Toml => toml::to_string_pretty(root).map_err(|e| e.to_string()),
        };
        content.map_err(|e| InfraError::format(self, e))
    }

    pub fn deserialize(self, content: &str) -> InfraResult<Node> {
        let root = match self {
            StorageFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            StorageFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            StorageFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        root.map_err(|e| InfraError::format(self, e))
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Loads and saves the root of the knowledge tree.
pub trait TreeStore {
    /// Persisted root, `None` if there is none or it cannot be read.
    fn load(&self) -> Option<Node>;

    fn save(&self, root: &Node) -> InfraResult<()>;

    /// Human readable location, for messages.
    fn location(&self) -> String;
}

/// Knowledge base in a single file: `<dir>/<stem>.<ext>`.
pub struct FileTreeStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    format: StorageFormat,
}

impl FileTreeStore {
    pub fn new(fs: Arc<dyn FileSystem>, dir: &Path, stem: &str, format: StorageFormat) -> Self {
        let path = dir.join(format!("{}.{}", stem, format.extension()));
        Self { fs, path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> InfraResult<Node> {
        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|e| InfraError::io(format!("read {}", self.path.display()), e))?;
        self.format.deserialize(&content)
    }
}

impl TreeStore for FileTreeStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Option<Node> {
        if !self.fs.exists(&self.path) {
            debug!("load: no knowledge base yet");
            return None;
        }
        match self.try_load() {
            Ok(root) => {
                debug!("load: {} animals", root.leaf_count());
                Some(root)
            }
            Err(e) => {
                warn!("cannot load knowledge base {}: {}", self.path.display(), e);
                None
            }
        }
    }

    #[instrument(level = "debug", skip(self, root), fields(path = %self.path.display()))]
    fn save(&self, root: &Node) -> InfraResult<()> {
        let content = self.format.serialize(root)?;
        self.fs
            .ensure_parent(&self.path)
            .map_err(|e| InfraError::io(format!("create parent of {}", self.path.display()), e))?;
        self.fs
            .write(&self.path, &content)
            .map_err(|e| InfraError::io(format!("write {}", self.path.display()), e))?;
        debug!("save: {} animals", root.leaf_count());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
