//! Transformation engine
//!
//! Constructing a [`TransformationEngine`] is the unit of work: it checks the
//! input shape and settles on a transformer. The query methods
//! ([`run`](TransformationEngine::run), [`to_array`](TransformationEngine::to_array),
//! [`to_json`](TransformationEngine::to_json)) can then be called any number
//! of times.
//!
//! Resolution order:
//!
//! 1. An explicit transformer (instance, boxed, or named) always wins.
//! 2. Collections without one fail with [`Error::TransformerRequiredForSet`].
//! 3. A single record is looked up in the registry's active group and the
//!    bound identifier is built by the [`TransformerFactory`].

use serde::{Serialize, Serializer};
use serde_json::Value;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::io::{self, Write};
use std::ops::BitOr;

use crate::error::{Error, Result, RunError};
use crate::factory::TransformerFactory;
use crate::record::{Data, Record};
use crate::registry::TransformerRegistry;
use crate::transformer::Transformer;

/// Everything the engine needs to resolve a transformer implicitly
#[derive(Debug, Default)]
pub struct Context {
    registry: TransformerRegistry,
    factory: TransformerFactory,
}

impl Context {
    /// Create a context from a registry and a factory
    pub fn new(registry: TransformerRegistry, factory: TransformerFactory) -> Self {
        Self { registry, factory }
    }

    /// The registry
    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    /// Mutable registry, e.g. to switch the active group
    pub fn registry_mut(&mut self) -> &mut TransformerRegistry {
        &mut self.registry
    }

    /// The factory
    pub fn factory(&self) -> &TransformerFactory {
        &self.factory
    }

    /// Mutable factory, e.g. to register more transformers
    pub fn factory_mut(&mut self) -> &mut TransformerFactory {
        &mut self.factory
    }
}

/// An explicitly chosen transformer
pub enum Using<'t, R> {
    /// Borrow an existing transformer
    Instance(&'t dyn Transformer<R>),
    /// Hand over an owned transformer
    Boxed(Box<dyn Transformer<R> + 't>),
    /// Build one through the factory by identifier
    Named(String),
}

impl<R> Using<'_, R> {
    /// Shorthand for [`Using::Named`]
    pub fn named(id: impl Into<String>) -> Self {
        Self::Named(id.into())
    }
}

enum Resolved<'t, R> {
    Borrowed(&'t dyn Transformer<R>),
    Owned(Box<dyn Transformer<R> + 't>),
}

impl<R> Resolved<'_, R> {
    fn get(&self) -> &dyn Transformer<R> {
        match self {
            Self::Borrowed(t) => *t,
            Self::Owned(t) => t.as_ref(),
        }
    }
}

/// Flags passed through to the JSON encoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonOptions(u32);

impl JsonOptions {
    /// Compact output, `/` and non-ASCII characters written as-is
    pub const NONE: Self = Self(0);
    /// Indented, multi-line output
    pub const PRETTY_PRINT: Self = Self(1);
    /// Write `/` as `\/`
    pub const ESCAPE_SLASHES: Self = Self(1 << 1);
    /// Write non-ASCII characters as `\uXXXX` escapes
    pub const ESCAPE_UNICODE: Self = Self(1 << 2);

    const ALL: Self = Self(Self::PRETTY_PRINT.0 | Self::ESCAPE_SLASHES.0 | Self::ESCAPE_UNICODE.0);

    /// Raw flag bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from raw bits, or `None` if any bit is not a known flag
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Whether every flag in `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for JsonOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

fn encode<F: Formatter>(
    value: &Value,
    formatter: F,
    options: JsonOptions,
) -> std::result::Result<String, RunError> {
    let mut out = Vec::new();
    let formatter = Escaping {
        inner: formatter,
        slashes: options.contains(JsonOptions::ESCAPE_SLASHES),
        unicode: options.contains(JsonOptions::ESCAPE_UNICODE),
    };
    value.serialize(&mut serde_json::Serializer::with_formatter(&mut out, formatter))?;
    Ok(String::from_utf8(out)?)
}

/// Formatter adding the optional escapes on top of `inner`'s layout
struct Escaping<F> {
    inner: F,
    slashes: bool,
    unicode: bool,
}

impl<F: Formatter> Formatter for Escaping<F> {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.slashes && !self.unicode {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escape_slash = self.slashes && ch == '/';
            let escape_unicode = self.unicode && !ch.is_ascii();
            if !escape_slash && !escape_unicode {
                continue;
            }

            writer.write_all(fragment[start..i].as_bytes())?;
            if escape_slash {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// A validated input paired with the transformer that will run over it
pub struct TransformationEngine<'a, R> {
    data: Data<'a, R>,
    transformer: Resolved<'a, R>,
}

impl<'a, R: Record + 'static> TransformationEngine<'a, R> {
    /// Validate `data` and resolve the transformer.
    ///
    /// The active group is read once, here; switching groups afterwards has
    /// no effect on this engine.
    pub fn new(ctx: &Context, data: Data<'a, R>, using: Option<Using<'a, R>>) -> Result<Self> {
        let transformer = match using {
            Some(Using::Instance(t)) => Resolved::Borrowed(t),
            Some(Using::Boxed(t)) => Resolved::Owned(t),
            Some(Using::Named(id)) => Resolved::Owned(ctx.factory().construct::<R>(&id)?),
            None => match data {
                Data::Many(_) => return Err(Error::TransformerRequiredForSet),
                Data::One(record) => Resolved::Owned(resolve_default(ctx, record)?),
            },
        };

        tracing::debug!(
            transformer = transformer.get().name(),
            records = data.len(),
            many = data.is_many(),
            "transformation engine ready"
        );

        Ok(Self { data, transformer })
    }

    /// Run the transformer.
    ///
    /// A single record yields the transformer's output as-is; a collection
    /// yields an array of per-record outputs in input order. The first
    /// failing record stops the iteration and its error is returned
    /// unchanged.
    pub fn run(&self) -> std::result::Result<Value, RunError> {
        let transformer = self.transformer.get();
        match self.data {
            Data::One(record) => transformer.run(record),
            Data::Many(records) => records
                .iter()
                .map(|record| transformer.run(record))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }

    /// Same as [`TransformationEngine::run`]
    pub fn to_array(&self) -> std::result::Result<Value, RunError> {
        self.run()
    }

    /// Encode the result of [`TransformationEngine::run`] as JSON text
    pub fn to_json(&self, options: JsonOptions) -> std::result::Result<String, RunError> {
        let value = self.run()?;
        let json = if options.contains(JsonOptions::PRETTY_PRINT) {
            encode(&value, PrettyFormatter::new(), options)?
        } else {
            encode(&value, CompactFormatter, options)?
        };
        Ok(json)
    }

    /// The transformer that will run
    pub fn transformer(&self) -> &dyn Transformer<R> {
        self.transformer.get()
    }

    /// The input
    pub fn data(&self) -> Data<'a, R> {
        self.data
    }
}

fn resolve_default<R: Record + 'static>(
    ctx: &Context,
    record: &R,
) -> Result<Box<dyn Transformer<R>>> {
    let registry = ctx.registry();
    let group = registry.active_group();
    let record_type = record.record_type();

    let id = registry
        .lookup(group, record_type)
        .ok_or_else(|| Error::NoDefaultTransformer {
            record_type: record_type.to_string(),
            group: group.to_string(),
        })?;

    tracing::debug!(record_type, group, transformer = id, "resolved default transformer");
    ctx.factory().construct::<R>(id)
}

impl<R: Record + 'static> Serialize for TransformationEngine<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::Error as _;

        self.run()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Build a [`TransformationEngine`].
///
/// Also exported as `change`.
///
/// ```rust,ignore
/// let engine = transform(&ctx, Data::One(&user), None)?;
/// let body = engine.to_json(JsonOptions::NONE)?;
/// ```
pub fn transform<'a, R: Record + 'static>(
    ctx: &Context,
    data: Data<'a, R>,
    using: Option<Using<'a, R>>,
) -> Result<TransformationEngine<'a, R>> {
    TransformationEngine::new(ctx, data, using)
}
