//! Recast Core Library
//!
//! Shapes records into API-ready values:
//! - Transformer contract and include handling
//! - Group-scoped registry of record type -> transformer bindings
//! - Factory for building transformers by identifier
//! - Transformation engine with array and JSON output
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Factory   │────▶│   Engine    │──▶ Value / JSON
//! │   (YAML)    │     │             │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use recast_core::{Context, Data, JsonOptions, RegistryConfig, TransformerFactory,
//!     TransformerRegistry, transform};
//!
//! let registry = TransformerRegistry::new(RegistryConfig::load("./recast.yaml")?);
//! let mut factory = TransformerFactory::new();
//! factory.register_default::<User, UserTransformer>("UserTransformer");
//! let ctx = Context::new(registry, factory);
//!
//! let body = transform(&ctx, Data::One(&user), None)?.to_json(JsonOptions::NONE)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod record;
pub mod registry;
pub mod transformer;

pub use config::{DEFAULT_CONFIG, RegistryConfig, publish_default_config};
pub use engine::{Context, JsonOptions, TransformationEngine, Using, transform, transform as change};
pub use error::{Error, Result, RunError};
pub use factory::TransformerFactory;
pub use record::{Data, JsonRecord, Payload, Record};
pub use registry::{DEFAULT_GROUP, TransformerRegistry};
pub use transformer::{Includes, Transformer};
