//! Transformer construction by identifier
//!
//! The registry maps record types to transformer *identifiers*. The factory
//! turns an identifier into a live transformer. Hosts register one
//! constructor per identifier at startup.
//!
//! Constructors are stored type-erased, so a factory can hold transformers
//! for many record types at once. [`TransformerFactory::construct`] checks
//! that the identifier produces a transformer for the requested record type
//! and reports [`Error::InvalidTransformer`] otherwise.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::transformer::Transformer;

type Constructor = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Registry of transformer constructors, keyed by identifier
#[derive(Default)]
pub struct TransformerFactory {
    constructors: HashMap<String, Constructor>,
}

impl TransformerFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for transformers of record type `R`.
    ///
    /// Registering an identifier twice replaces the earlier constructor.
    ///
    /// ```rust,ignore
    /// factory.register::<User, _, _>("UserTransformer", UserTransformer::default);
    /// ```
    pub fn register<R, T, F>(&mut self, id: impl Into<String>, constructor: F)
    where
        R: 'static,
        T: Transformer<R> + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = id.into();
        tracing::debug!(transformer = %id, record = type_name::<R>(), "registering transformer");
        self.constructors.insert(
            id,
            Box::new(move || {
                let transformer: Box<dyn Transformer<R>> = Box::new(constructor());
                Box::new(transformer) as Box<dyn Any>
            }),
        );
    }

    /// Register a transformer type that can be built with `Default`
    pub fn register_default<R, T>(&mut self, id: impl Into<String>)
    where
        R: 'static,
        T: Transformer<R> + Default + 'static,
    {
        self.register::<R, T, _>(id, T::default);
    }

    /// Builder form of [`TransformerFactory::register`]
    pub fn with<R, T, F>(mut self, id: impl Into<String>, constructor: F) -> Self
    where
        R: 'static,
        T: Transformer<R> + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register::<R, T, F>(id, constructor);
        self
    }

    /// Construct a fresh transformer for records of type `R`.
    pub fn construct<R: 'static>(&self, id: &str) -> Result<Box<dyn Transformer<R>>> {
        let constructor = self
            .constructors
            .get(id)
            .ok_or_else(|| Error::InvalidTransformer {
                transformer: id.to_string(),
                message: "no constructor is registered under this name".to_string(),
            })?;

        constructor()
            .downcast::<Box<dyn Transformer<R>>>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::InvalidTransformer {
                transformer: id.to_string(),
                message: format!("it does not transform records of type {}", type_name::<R>()),
            })
    }

    /// Whether a constructor is registered under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.constructors.contains_key(id)
    }

    /// Registered identifiers, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TransformerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerFactory")
            .field("transformers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunError;
    use crate::transformer::Includes;
    use serde_json::{Value, json};

    #[derive(Default)]
    struct Doubler {
        includes: Includes,
    }

    impl Transformer<i64> for Doubler {
        fn run(&self, record: &i64) -> std::result::Result<Value, RunError> {
            Ok(json!(record * 2))
        }

        fn includes(&self) -> &Includes {
            &self.includes
        }

        fn includes_mut(&mut self) -> &mut Includes {
            &mut self.includes
        }
    }

    #[test]
    fn test_construct_registered() {
        let mut factory = TransformerFactory::new();
        factory.register_default::<i64, Doubler>("Doubler");

        let t = factory.construct::<i64>("Doubler").unwrap();
        assert_eq!(t.run(&21).unwrap(), json!(42));
    }

    #[test]
    fn test_construct_unknown_is_invalid() {
        let factory = TransformerFactory::new();
        let err = factory.construct::<i64>("Missing").err().unwrap();
        match err {
            Error::InvalidTransformer { transformer, .. } => assert_eq!(transformer, "Missing"),
            other => panic!("Expected InvalidTransformer, got {other:?}"),
        }
    }

    #[test]
    fn test_construct_wrong_record_type_is_invalid() {
        let factory = TransformerFactory::new().with::<i64, _, _>("Doubler", Doubler::default);
        let err = factory.construct::<String>("Doubler").err().unwrap();
        assert!(matches!(err, Error::InvalidTransformer { .. }));
        assert!(err.to_string().contains("String"));
    }

    #[test]
    fn test_each_construct_is_fresh() {
        let factory = TransformerFactory::new().with::<i64, _, _>("Doubler", Doubler::default);
        let mut first = factory.construct::<i64>("Doubler").unwrap();
        first.includes_mut().set(["a"]);
        let second = factory.construct::<i64>("Doubler").unwrap();
        assert!(second.get_includes().is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let mut factory = TransformerFactory::new();
        factory.register_default::<i64, Doubler>("b");
        factory.register_default::<i64, Doubler>("a");
        assert_eq!(factory.names(), vec!["a", "b"]);
        assert!(factory.contains("a"));
        assert!(!factory.contains("c"));
        assert!(format!("{factory:?}").contains("TransformerFactory"));
    }
}
