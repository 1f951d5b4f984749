//! Text codec: JSON text ↔ arena tree.
//!
//! [`Codec`] is the seam between the mapping logic and whatever turns text
//! into a tree and back. [`JsonCodec`] implements it on top of `serde_json`:
//!
//! - **parse** drives a `serde_json::Deserializer` with a [`DeserializeSeed`]
//!   that allocates nodes straight into the arena. No intermediate
//!   `serde_json::Value` is built, and duplicate keys survive in document
//!   order.
//! - **stringify** serializes the tree through the `Serialize` impl on
//!   [`Value`], producing compact JSON.
//!
//! Syntax errors do not fail `parse`; they come back as a [`Value::Error`]
//! node carrying the `serde_json` message. Only an arena allocation failure
//! is returned as `Err`.

use std::cell::Cell;
use std::fmt;

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::{Deserializer, Serialize, Serializer};

use crate::arena::Arena;
use crate::error::{AllocError, Result};
use crate::value::{ArrayBuilder, ObjectBuilder, Value};

/// Turns JSON text into an arena tree and back.
pub trait Codec {
    /// Parse `text` into a tree allocated from `arena`.
    ///
    /// Malformed text yields `Ok(Value::Error(message))`.
    fn parse<'a>(
        &self,
        text: &str,
        arena: &'a Arena,
    ) -> std::result::Result<Value<'a>, AllocError>;

    /// Render a tree as JSON text owned by the caller.
    fn stringify(&self, value: &Value<'_>) -> Result<String>;
}

/// [`Codec`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn parse<'a>(
        &self,
        text: &str,
        arena: &'a Arena,
    ) -> std::result::Result<Value<'a>, AllocError> {
        let failure = Cell::new(None);
        let seed = ValueSeed {
            arena,
            failure: &failure,
        };
        let mut deserializer = serde_json::Deserializer::from_str(text);
        let parsed = seed
            .deserialize(&mut deserializer)
            .and_then(|value| deserializer.end().map(|()| value));
        match parsed {
            Ok(value) => Ok(value),
            Err(err) => match failure.take() {
                Some(alloc) => Err(alloc),
                None => Value::error(arena, &err.to_string()),
            },
        }
    }

    fn stringify(&self, value: &Value<'_>) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }
}

/// Parse with [`JsonCodec`].
pub fn parse<'a>(text: &str, arena: &'a Arena) -> std::result::Result<Value<'a>, AllocError> {
    JsonCodec.parse(text, arena)
}

/// Stringify with [`JsonCodec`].
pub fn stringify(value: &Value<'_>) -> Result<String> {
    JsonCodec.stringify(value)
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(b),
            Value::Int(i) => serializer.serialize_i64(i),
            Value::Decimal(d) => serializer.serialize_f64(d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(array) => {
                let mut seq = serializer.serialize_seq(Some(array.size()))?;
                for value in array.iter() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for pair in object.iter() {
                    map.serialize_entry(pair.key, &pair.value)?;
                }
                map.end()
            }
            Value::Error(message) => Err(ser::Error::custom(format!(
                "cannot stringify error node: {message}"
            ))),
        }
    }
}

/// Deserializes any JSON value into the arena.
///
/// An allocation failure is parked in `failure` before being turned into a
/// `serde_json` error, so `parse` can tell it apart from a syntax error.
#[derive(Clone, Copy)]
struct ValueSeed<'s, 'a> {
    arena: &'a Arena,
    failure: &'s Cell<Option<AllocError>>,
}

impl<'s, 'a> ValueSeed<'s, 'a> {
    fn fail<E: de::Error>(self, err: AllocError) -> E {
        self.failure.set(Some(err));
        E::custom(err)
    }

    fn key(self) -> KeySeed<'s, 'a> {
        KeySeed(self)
    }
}

impl<'de, 's, 'a> DeserializeSeed<'de> for ValueSeed<'s, 'a> {
    type Value = Value<'a>;

    fn deserialize<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<Value<'a>, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 's, 'a> Visitor<'de> for ValueSeed<'s, 'a> {
    type Value = Value<'a>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E>(self) -> std::result::Result<Value<'a>, E> {
        Ok(Value::Null)
    }

    fn visit_bool<E>(self, v: bool) -> std::result::Result<Value<'a>, E> {
        Ok(Value::Boolean(v))
    }

    fn visit_i64<E>(self, v: i64) -> std::result::Result<Value<'a>, E> {
        Ok(Value::Int(v))
    }

    // Integers beyond i64 degrade to decimals.
    fn visit_u64<E>(self, v: u64) -> std::result::Result<Value<'a>, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Decimal(v as f64),
        })
    }

    fn visit_f64<E>(self, v: f64) -> std::result::Result<Value<'a>, E> {
        Ok(Value::Decimal(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value<'a>, E> {
        Value::string(self.arena, v).map_err(|err| self.fail(err))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value<'a>, A::Error> {
        let mut items = ArrayBuilder::new(self.arena);
        while let Some(value) = seq.next_element_seed(self)? {
            items.push(value).map_err(|err| self.fail(err))?;
        }
        Ok(Value::Array(items.finish()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value<'a>, A::Error> {
        let mut pairs = ObjectBuilder::new(self.arena);
        while let Some(key) = map.next_key_seed(self.key())? {
            let value = map.next_value_seed(self)?;
            pairs.push(key, value).map_err(|err| self.fail(err))?;
        }
        Ok(Value::Object(pairs.finish()))
    }
}

/// Copies an object key into the arena.
#[derive(Clone, Copy)]
struct KeySeed<'s, 'a>(ValueSeed<'s, 'a>);

impl<'de, 's, 'a> DeserializeSeed<'de> for KeySeed<'s, 'a> {
    type Value = &'a str;

    fn deserialize<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<&'a str, D::Error> {
        deserializer.deserialize_str(self)
    }
}

impl<'de, 's, 'a> Visitor<'de> for KeySeed<'s, 'a> {
    type Value = &'a str;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<&'a str, E> {
        self.0.arena.alloc_str(v).map_err(|err| self.0.fail(err))
    }
}
