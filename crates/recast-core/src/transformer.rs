//! The transformer contract
//!
//! A transformer turns one record into a structured [`Value`]. Every
//! transformer also carries an [`Includes`] list: opt-in names the caller
//! sets before running, which `run` consults to decide whether to embed
//! related data.
//!
//! # Example
//!
//! ```rust
//! use recast_core::{Includes, Record, RunError, Transformer};
//! use serde_json::{Value, json};
//!
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn record_type(&self) -> &str {
//!         "User"
//!     }
//! }
//!
//! #[derive(Default)]
//! struct UserTransformer {
//!     includes: Includes,
//! }
//!
//! impl Transformer<User> for UserTransformer {
//!     fn run(&self, user: &User) -> Result<Value, RunError> {
//!         let mut out = json!({"id": user.id});
//!         if self.has_include("name") {
//!             out["name"] = json!(user.name);
//!         }
//!         Ok(out)
//!     }
//!
//!     fn includes(&self) -> &Includes {
//!         &self.includes
//!     }
//!
//!     fn includes_mut(&mut self) -> &mut Includes {
//!         &mut self.includes
//!     }
//! }
//!
//! let t = UserTransformer::default().with_includes(["name"]);
//! let user = User { id: 1, name: "Ann".into() };
//! assert_eq!(t.run(&user).unwrap(), json!({"id": 1, "name": "Ann"}));
//! ```

use serde_json::Value;

use crate::error::RunError;

/// Names of related data a caller wants embedded in the output.
///
/// This is a plain list: order is kept and duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Includes(Vec<String>);

impl Includes {
    /// Empty include list
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list wholesale
    pub fn set<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0 = names.into_iter().map(Into::into).collect();
    }

    /// Current names, in the order they were supplied
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether `name` was requested
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Number of names (duplicates counted)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was requested
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Includes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Converts one record of type `R` into a structured value.
pub trait Transformer<R> {
    /// Transform a single record.
    fn run(&self, record: &R) -> Result<Value, RunError>;

    /// The transformer's include list
    fn includes(&self) -> &Includes;

    /// Mutable access to the include list
    fn includes_mut(&mut self) -> &mut Includes;

    /// Identifier used in logs and error messages
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Replace the include list, returning `self` for chaining
    fn set_includes<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        Self: Sized,
    {
        self.includes_mut().set(names);
        self
    }

    /// Builder form of [`Transformer::set_includes`]
    fn with_includes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        Self: Sized,
    {
        self.includes_mut().set(names);
        self
    }

    /// Current include list
    fn get_includes(&self) -> &[String] {
        self.includes().as_slice()
    }

    /// Whether `name` was requested
    fn has_include(&self, name: &str) -> bool {
        self.includes().contains(name)
    }
}
