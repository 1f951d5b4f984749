//! Key lookup over an object's pairs.
//!
//! Keys are compared for exact equality: probing `"user"` never matches a
//! stored `"username"`. When a key occurs more than once the pair that comes
//! last in document order wins.

use crate::value::{ObjectValue, Value};

/// Find the value stored under `key`, or `None` if no pair carries it.
pub fn lookup<'a>(object: &ObjectValue<'a>, key: &str) -> Option<Value<'a>> {
    object
        .pairs()
        .iter()
        .rev()
        .find(|pair| pair.key == key)
        .map(|pair| pair.value)
}
