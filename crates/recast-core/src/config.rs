//! Configuration loading and publishing
//!
//! Recast reads its settings from the `recast` section of a host YAML
//! document. The library ships a default document ([`DEFAULT_CONFIG`]); the
//! host's section is merged over it, so the `default` group always exists.
//!
//! # Example
//!
//! ```yaml
//! recast:
//!   groups:
//!     default:
//!       User: UserTransformer
//!     admin:
//!       User: AdminUserTransformer
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::registry::DEFAULT_GROUP;

/// Key of the library's section in a host configuration document
pub const CONFIG_KEY: &str = "recast";

/// File name used when a directory is given instead of a file
pub const CONFIG_FILE: &str = "recast.yaml";

/// The library's default configuration document
pub const DEFAULT_CONFIG: &str = include_str!("../config/recast.yaml");

/// Record type -> transformer identifier bindings for one group
pub type GroupBindings = HashMap<String, String>;

/// Registry configuration: group name -> bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Binding groups
    #[serde(default)]
    pub groups: HashMap<String, GroupBindings>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            groups: HashMap::from([(DEFAULT_GROUP.to_string(), GroupBindings::new())]),
        }
    }
}

impl RegistryConfig {
    /// Load from a host configuration file.
    ///
    /// `path` may be the file itself or a directory containing
    /// `recast.yaml`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (config_path, contents) = read_config_file(path)?;
        tracing::debug!("Loaded registry configuration from {}", config_path.display());
        Self::from_host_yaml(&contents)
    }

    /// The configuration shipped in [`DEFAULT_CONFIG`]
    pub fn shipped() -> Result<Self> {
        let doc: serde_yaml::Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        Self::from_host_value(&doc)
    }

    /// Parse a host document and merge its `recast` section over the
    /// shipped defaults. A document without the section yields the
    /// defaults.
    pub fn from_host_yaml(contents: &str) -> Result<Self> {
        let base = Self::shipped()?;
        if contents.trim().is_empty() {
            return Ok(base);
        }

        let doc: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let section = Self::from_host_value(&doc)?;
        let config = base.merge(section);
        config.validate()?;
        Ok(config)
    }

    /// Extract the `recast` section of an already-parsed host document,
    /// without merging defaults.
    pub fn from_host_value(doc: &serde_yaml::Value) -> Result<Self> {
        match doc.get(CONFIG_KEY) {
            None | Some(serde_yaml::Value::Null) => Ok(Self {
                groups: HashMap::new(),
            }),
            Some(section) => Ok(serde_yaml::from_value(section.clone())?),
        }
    }

    /// Merge `other` over `self`. A group present in both is replaced
    /// wholesale by the one from `other`.
    pub fn merge(mut self, other: Self) -> Self {
        self.groups.extend(other.groups);
        self
    }

    /// Check for empty names
    pub fn validate(&self) -> Result<()> {
        for (group, bindings) in &self.groups {
            if group.trim().is_empty() {
                return Err(Error::ConfigInvalid {
                    message: "group names must not be empty".to_string(),
                });
            }
            for (record_type, transformer) in bindings {
                if record_type.trim().is_empty() || transformer.trim().is_empty() {
                    return Err(Error::ConfigInvalid {
                        message: format!(
                            "group '{}' has a binding with an empty record type or transformer",
                            group
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Write [`DEFAULT_CONFIG`] for the host to customize.
///
/// `path` may be a file path or an existing directory (the file is then
/// named `recast.yaml`). An existing file is never overwritten.
pub fn publish_default_config<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let target = resolve_path(path.as_ref());

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::ConfigInvalid {
                message: format!("{} already exists", target.display()),
            });
        }
        Err(err) => return Err(err.into()),
    };
    file.write_all(DEFAULT_CONFIG.as_bytes())?;

    tracing::info!("Published default configuration to {}", target.display());
    Ok(target)
}

/// Where a configuration path points: the path itself, or `recast.yaml`
/// inside it when it is a directory
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Read a host configuration file, returning the resolved path and its
/// contents. Fails with [`Error::ConfigNotFound`] when it does not exist.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> Result<(PathBuf, String)> {
    let config_path = resolve_path(path.as_ref());

    if !config_path.exists() {
        return Err(Error::ConfigNotFound {
            path: config_path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(&config_path)?;
    Ok((config_path, contents))
}
