//! Host configuration
//!
//! The CLI's config file is a host document: the `recast` section feeds the
//! registry, and two CLI-only keys sit next to it.
//!
//! ```yaml
//! type_key: type          # field naming each record's type
//! recast:
//!   groups:
//!     default:
//!       User: UserTransformer
//! transformers:
//!   UserTransformer:
//!     fields:
//!       id: id
//! ```

use anyhow::{Context as _, Result};
use recast_core::config;
use recast_core::{
    Context, JsonRecord, RegistryConfig, Transformer, TransformerFactory, TransformerRegistry,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::field_transformer::{FieldTransformer, FieldTransformerConfig};

/// Field read for the record type when none is configured
pub const DEFAULT_TYPE_KEY: &str = "type";

#[derive(Debug, Deserialize)]
struct HostSection {
    #[serde(default = "default_type_key")]
    type_key: String,

    #[serde(default)]
    transformers: HashMap<String, FieldTransformerConfig>,
}

fn default_type_key() -> String {
    DEFAULT_TYPE_KEY.to_string()
}

/// Parsed host configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Registry bindings, defaults merged in
    pub registry: RegistryConfig,

    /// Declared transformers by identifier
    pub transformers: HashMap<String, FieldTransformerConfig>,

    /// Field naming each record's type
    pub type_key: String,
}

impl HostConfig {
    /// Load from a file, or from `recast.yaml` inside a directory
    pub fn load(path: &str) -> Result<Self> {
        let (config_path, contents) = config::read_config_file(path).map_err(|err| match err {
            recast_core::Error::ConfigNotFound { .. } => {
                anyhow::Error::new(err).context("run `recast init` to create one")
            }
            other => anyhow::Error::new(other).context(format!("Failed to read {}", path)),
        })?;
        tracing::debug!("Loaded host configuration from {}", config_path.display());
        Self::from_yaml(&contents)
    }

    /// Parse a host document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let registry = RegistryConfig::from_host_yaml(contents)?;

        let section = if contents.trim().is_empty() {
            HostSection {
                type_key: default_type_key(),
                transformers: HashMap::new(),
            }
        } else {
            serde_yaml::from_str(contents).context("Invalid transformers section")?
        };

        let config = Self {
            registry,
            transformers: section.transformers,
            type_key: section.type_key,
        };
        config.warn_undeclared();
        Ok(config)
    }

    /// Build an engine context whose factory produces the declared
    /// transformers, each preloaded with `includes`.
    pub fn context(&self, includes: &[String]) -> Context {
        let mut factory = TransformerFactory::new();
        for (name, config) in &self.transformers {
            let name_for_ctor = name.clone();
            let config = config.clone();
            let includes = includes.to_vec();
            factory.register::<JsonRecord, _, _>(name.clone(), move || {
                FieldTransformer::new(name_for_ctor.clone(), config.clone())
                    .with_includes(includes.clone())
            });
        }

        Context::new(TransformerRegistry::new(self.registry.clone()), factory)
    }

    fn warn_undeclared(&self) {
        for (group, bindings) in &self.registry.groups {
            for (record_type, transformer) in bindings {
                if !self.transformers.contains_key(transformer) {
                    tracing::warn!(
                        group = %group,
                        record_type = %record_type,
                        transformer = %transformer,
                        "bound transformer is not declared under `transformers`"
                    );
                }
            }
        }
    }
}
