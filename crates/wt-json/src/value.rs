//! JSON tree whose nodes live in an [`Arena`].
//!
//! Every node borrows the arena for `'a`, so the whole tree is `Copy` and is
//! released in one step when the arena is flushed. Objects keep their pairs in
//! insertion order and tolerate duplicate keys; arrays are contiguous.
//!
//! Trees are assembled with [`ArrayBuilder`] and [`ObjectBuilder`], which
//! append into arena-backed vectors and freeze them into slices on
//! `finish`.

use bumpalo::collections::Vec as BumpVec;

use crate::arena::{self, Arena};
use crate::error::AllocError;
use crate::lookup;

/// A JSON value. Exactly one variant is active.
///
/// `Error` marks a node that stands in for something the codec could not
/// produce; it carries the diagnostic and cannot be stringified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Null,
    Boolean(bool),
    Int(i64),
    Decimal(f64),
    String(&'a str),
    Array(ArrayValue<'a>),
    Object(ObjectValue<'a>),
    Error(&'a str),
}

impl<'a> Value<'a> {
    /// Copy `text` into the arena as a string node.
    pub fn string(arena: &'a Arena, text: &str) -> Result<Self, AllocError> {
        Ok(Value::String(arena.alloc_str(text)?))
    }

    /// Copy `message` into the arena as an error node.
    pub fn error(arena: &'a Arena, message: &str) -> Result<Self, AllocError> {
        Ok(Value::Error(arena.alloc_str(message)?))
    }

    /// Name of the active variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "a boolean",
            Value::Int(_) => "an integer",
            Value::Decimal(_) => "a decimal",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
            Value::Error(_) => "an error",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric value with integers widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(v) => Some(v as f64),
            Value::Decimal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<ArrayValue<'a>> {
        match *self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectValue<'a>> {
        match *self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

/// A contiguous run of values. `size()` is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArrayValue<'a> {
    values: &'a [Value<'a>],
}

impl<'a> ArrayValue<'a> {
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &'a [Value<'a>] {
        self.values
    }

    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        self.values.get(index).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Value<'a>> {
        self.values.iter()
    }
}

/// One key/value entry of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair<'a> {
    pub key: &'a str,
    pub value: Value<'a>,
}

/// Pairs in insertion order. Duplicate keys are kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObjectValue<'a> {
    pairs: &'a [Pair<'a>],
}

impl<'a> ObjectValue<'a> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &'a [Pair<'a>] {
        self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Pair<'a>> {
        self.pairs.iter()
    }

    /// Look up `key`; see [`lookup::lookup`].
    pub fn get(&self, key: &str) -> Option<Value<'a>> {
        lookup::lookup(self, key)
    }
}

/// Appends values into the arena, then freezes them into an [`ArrayValue`].
pub struct ArrayBuilder<'a> {
    values: BumpVec<'a, Value<'a>>,
}

impl<'a> ArrayBuilder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            values: arena.vec(),
        }
    }

    /// Reserve room for `additional` values up front.
    pub fn with_capacity(arena: &'a Arena, additional: usize) -> Result<Self, AllocError> {
        let mut values = arena.vec();
        let requested = additional.saturating_mul(std::mem::size_of::<Value<'a>>());
        values
            .try_reserve_exact(additional)
            .map_err(|_| AllocError::new(requested))?;
        Ok(Self { values })
    }

    pub fn push(&mut self, value: Value<'a>) -> Result<(), AllocError> {
        arena::push(&mut self.values, value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn finish(self) -> ArrayValue<'a> {
        ArrayValue {
            values: self.values.into_bump_slice(),
        }
    }
}

/// Appends pairs in order, then freezes them into an [`ObjectValue`].
///
/// Keys must already live for `'a`: either `'static` literals or text copied
/// with [`Arena::alloc_str`].
pub struct ObjectBuilder<'a> {
    pairs: BumpVec<'a, Pair<'a>>,
}

impl<'a> ObjectBuilder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self { pairs: arena.vec() }
    }

    pub fn push(&mut self, key: &'a str, value: Value<'a>) -> Result<(), AllocError> {
        arena::push(&mut self.pairs, Pair { key, value })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn finish(self) -> ObjectValue<'a> {
        ObjectValue {
            pairs: self.pairs.into_bump_slice(),
        }
    }
}
