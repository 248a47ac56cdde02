//! Declarative transformers for JSON records
//!
//! Declared in the `transformers` section of the host config:
//!
//! ```yaml
//! transformers:
//!   UserTransformer:
//!     fields:
//!       id: id
//!       name: profile.display_name
//!     includes:
//!       posts: posts
//! ```
//!
//! `fields` maps output keys to source paths (dot-separated for nested
//! objects); a missing source gives `null`. An empty `fields` map passes the
//! record through unchanged. `includes` entries are only emitted when the
//! caller requests them by name.

use recast_core::{Includes, JsonRecord, RunError, Transformer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One declared transformer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldTransformerConfig {
    /// Output key -> source path
    #[serde(default)]
    pub fields: HashMap<String, String>,

    /// Include name -> source path
    #[serde(default)]
    pub includes: HashMap<String, String>,
}

/// Transformer built from a [`FieldTransformerConfig`]
#[derive(Debug, Clone)]
pub struct FieldTransformer {
    name: String,
    config: FieldTransformerConfig,
    includes: Includes,
}

impl FieldTransformer {
    pub fn new(name: impl Into<String>, config: FieldTransformerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            includes: Includes::new(),
        }
    }
}

impl Transformer<JsonRecord> for FieldTransformer {
    fn run(&self, record: &JsonRecord) -> Result<Value, RunError> {
        let mut output = if self.config.fields.is_empty() {
            record.fields().clone()
        } else {
            Map::new()
        };

        for (output_field, source) in &self.config.fields {
            output.insert(output_field.clone(), lookup(record, source));
        }

        for (include, source) in &self.config.includes {
            if self.has_include(include) {
                output.insert(include.clone(), lookup(record, source));
            }
        }

        Ok(Value::Object(output))
    }

    fn includes(&self) -> &Includes {
        &self.includes
    }

    fn includes_mut(&mut self) -> &mut Includes {
        &mut self.includes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn lookup(record: &JsonRecord, path: &str) -> Value {
    let mut segments = path.split('.');
    let mut current = segments.next().and_then(|s| record.get(s));
    for segment in segments {
        current = current.and_then(|value| value.get(segment));
    }
    current.cloned().unwrap_or(Value::Null)
}
