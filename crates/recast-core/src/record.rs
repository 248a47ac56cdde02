//! Records and the input shapes the engine accepts
//!
//! A [`Record`] is any caller-owned value that can name its own type. The
//! engine takes either one record or an ordered slice of them through
//! [`Data`]. Untyped JSON input goes through [`Payload`], which is where
//! anything other than an object or an array of objects gets rejected.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A value that can be transformed.
///
/// The record type is the key used for registry lookups, so it should be
/// stable across releases (e.g. `"User"`, not a compiler-generated name).
pub trait Record {
    /// Type identifier of this record
    fn record_type(&self) -> &str;
}

/// Engine input: one record or an ordered collection of records
#[derive(Debug)]
pub enum Data<'a, R> {
    /// A single record
    One(&'a R),
    /// A collection of records, all handled by the same transformer
    Many(&'a [R]),
}

impl<R> Clone for Data<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Data<'_, R> {}

impl<R> Data<'_, R> {
    /// Whether this is a collection
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(records) => records.len(),
        }
    }

    /// Whether there are no records (only possible for an empty collection)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A record decoded from a JSON object.
///
/// The record type is read from a discriminator field (see
/// [`JsonRecord::from_value`]); the remaining keys become the record's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    record_type: String,
    fields: Map<String, Value>,
}

impl JsonRecord {
    /// Create a record from its type and fields
    pub fn new(record_type: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            record_type: record_type.into(),
            fields,
        }
    }

    /// Decode a JSON object, taking the record type from `type_key`.
    ///
    /// A missing discriminator leaves the record type empty. Such records
    /// can still be transformed with an explicit transformer.
    pub fn from_value(value: Value, type_key: &str) -> Result<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(Error::UnsupportedInputKind {
                    found: kind_of(&other).to_string(),
                });
            }
        };

        let record_type = match fields.remove(type_key) {
            None => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(Error::UnsupportedInputKind {
                    found: format!("object whose '{}' is {}", type_key, kind_of(&other)),
                });
            }
        };

        Ok(Self {
            record_type,
            fields,
        })
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All fields, without the type discriminator
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Record for JsonRecord {
    fn record_type(&self) -> &str {
        &self.record_type
    }
}

/// Owned, dynamically-shaped input decoded from a JSON document
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A single object
    One(JsonRecord),
    /// An array of objects
    Many(Vec<JsonRecord>),
}

impl Payload {
    /// Decode a JSON document.
    ///
    /// Objects become a single record and arrays become a collection. Any
    /// other value, or an array element that is not an object, fails with
    /// [`Error::UnsupportedInputKind`].
    pub fn from_value(value: Value, type_key: &str) -> Result<Self> {
        match value {
            Value::Object(_) => JsonRecord::from_value(value, type_key).map(Self::One),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    JsonRecord::from_value(item, type_key).map_err(|err| match err {
                        Error::UnsupportedInputKind { found } => Error::UnsupportedInputKind {
                            found: format!("collection element {} ({})", index, found),
                        },
                        other => other,
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Many),
            other => Err(Error::UnsupportedInputKind {
                found: kind_of(&other).to_string(),
            }),
        }
    }

    /// Borrow as engine input
    pub fn as_data(&self) -> Data<'_, JsonRecord> {
        match self {
            Self::One(record) => Data::One(record),
            Self::Many(records) => Data::Many(records),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
