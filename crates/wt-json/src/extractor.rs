//! JSON → set rows.
//!
//! Expected document shape:
//!
//! ```json
//! {"user_id": 1,
//!  "exercises": [{"exercise_id": 7,
//!                 "sets": [{"reps": 10, "weight": 50}, {"reps": 8, "weight": 52.5}]}]}
//! ```
//!
//! # Validation policy
//!
//! The document level is always strict: a missing or mistyped `user_id` or
//! `exercises` aborts the extraction, since nothing meaningful can be read
//! without them. Below that the [`ValidationPolicy`] decides:
//!
//! - [`Lenient`](ValidationPolicy::Lenient) skips an invalid exercise or set,
//!   records a [`Diagnostic`], and keeps going.
//! - [`Strict`](ValidationPolicy::Strict) aborts on the first invalid item.
//!
//! `set_number` is the set's index in its own exercise's `sets` array. A
//! skipped set still takes up its index.

use tracing::{debug, warn};

use crate::arena::Arena;
use crate::codec::Codec;
use crate::error::{Diagnostic, ExtractError, FieldError};
use crate::lookup::lookup;
use crate::records::{Set, SetCollection, DEFAULT_SET_CAPACITY};
use crate::value::{ArrayValue, ObjectValue, Value};

pub const USER_ID_KEY: &str = "user_id";
pub const EXERCISES_KEY: &str = "exercises";
pub const EXERCISE_ID_KEY: &str = "exercise_id";
pub const SETS_KEY: &str = "sets";
pub const REPS_KEY: &str = "reps";
pub const WEIGHT_KEY: &str = "weight";

/// How invalid exercises and sets are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Skip the item, record a diagnostic, continue.
    #[default]
    Lenient,
    /// Abort the extraction on the first invalid item.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Maximum number of rows; one more is a [`CapacityExceeded`](crate::CapacityExceeded) error.
    pub capacity: usize,
    pub policy: ValidationPolicy,
    /// Reject documents whose `user_id` differs from the requested user.
    pub require_user_match: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SET_CAPACITY,
            policy: ValidationPolicy::default(),
            require_user_match: false,
        }
    }
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// `user_id` as found in the document.
    pub user_id: i64,
    pub sets: SetCollection,
    /// Items skipped under the lenient policy, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse `text` into `arena`, extract its sets, then flush `arena`.
pub fn extract_sets_in<C: Codec>(
    arena: &mut Arena,
    codec: &C,
    text: &str,
    user_id: u32,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let outcome = codec
        .parse(text, arena)
        .map_err(ExtractError::from)
        .and_then(|root| extract_from_tree(&root, user_id, options));
    arena.flush();
    outcome
}

/// Walk an already parsed tree.
pub fn extract_from_tree(
    root: &Value<'_>,
    user_id: u32,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let document = match *root {
        Value::Object(object) => object,
        Value::Error(message) => return Err(ExtractError::Malformed(message.to_string())),
        other => {
            return Err(ExtractError::Document(wrong_type(
                "document",
                "an object",
                &other,
            )))
        }
    };

    let doc_user = require_int(&document, USER_ID_KEY).map_err(ExtractError::Document)?;
    let exercises = require_array(&document, EXERCISES_KEY).map_err(ExtractError::Document)?;
    if options.require_user_match && doc_user != i64::from(user_id) {
        return Err(ExtractError::UserMismatch {
            expected: i64::from(user_id),
            found: doc_user,
        });
    }

    let mut walk = Walk {
        policy: options.policy,
        extraction: Extraction {
            user_id: doc_user,
            sets: SetCollection::with_capacity(options.capacity),
            diagnostics: Vec::new(),
        },
    };
    for (exercise_index, entry) in exercises.iter().enumerate() {
        walk.exercise(exercise_index, entry)?;
    }

    let extraction = walk.extraction;
    debug!(
        user_id = doc_user,
        rows = extraction.sets.count(),
        skipped = extraction.diagnostics.len(),
        "extracted sets"
    );
    Ok(extraction)
}

struct Walk {
    policy: ValidationPolicy,
    extraction: Extraction,
}

impl Walk {
    fn exercise(&mut self, exercise_index: usize, entry: &Value<'_>) -> Result<(), ExtractError> {
        let (exercise_id, sets) = match exercise_header(entry) {
            Ok(header) => header,
            Err(reason) => {
                return self.skip(Diagnostic {
                    exercise_index,
                    set_index: None,
                    reason,
                })
            }
        };

        for (set_index, entry) in sets.iter().enumerate() {
            match read_set(entry) {
                Ok((reps, weight)) => self.extraction.sets.try_push(Set {
                    workout_exercise_id: exercise_id,
                    set_number: u32::try_from(set_index).unwrap_or(u32::MAX),
                    weight,
                    reps,
                })?,
                Err(reason) => self.skip(Diagnostic {
                    exercise_index,
                    set_index: Some(set_index),
                    reason,
                })?,
            }
        }
        Ok(())
    }

    fn skip(&mut self, diagnostic: Diagnostic) -> Result<(), ExtractError> {
        match self.policy {
            ValidationPolicy::Strict => Err(ExtractError::InvalidItem(diagnostic)),
            ValidationPolicy::Lenient => {
                warn!(%diagnostic, "skipping invalid item");
                self.extraction.diagnostics.push(diagnostic);
                Ok(())
            }
        }
    }
}

fn exercise_header<'a>(entry: &Value<'a>) -> Result<(u32, ArrayValue<'a>), FieldError> {
    let object = entry
        .as_object()
        .ok_or_else(|| wrong_type("exercise", "an object", entry))?;
    let exercise_id = require_u32(&object, EXERCISE_ID_KEY)?;
    let sets = require_array(&object, SETS_KEY)?;
    Ok((exercise_id, sets))
}

fn read_set(entry: &Value<'_>) -> Result<(u32, f64), FieldError> {
    let object = entry
        .as_object()
        .ok_or_else(|| wrong_type("set", "an object", entry))?;
    let reps = require_u32(&object, REPS_KEY)?;
    let weight = require_number(&object, WEIGHT_KEY)?;
    Ok((reps, weight))
}

fn require<'a>(object: &ObjectValue<'a>, field: &'static str) -> Result<Value<'a>, FieldError> {
    lookup(object, field).ok_or(FieldError::Missing(field))
}

fn require_int(object: &ObjectValue<'_>, field: &'static str) -> Result<i64, FieldError> {
    let value = require(object, field)?;
    value
        .as_int()
        .ok_or_else(|| wrong_type(field, "an integer", &value))
}

fn require_u32(object: &ObjectValue<'_>, field: &'static str) -> Result<u32, FieldError> {
    let value = require_int(object, field)?;
    u32::try_from(value).map_err(|_| FieldError::OutOfRange { field, value })
}

fn require_number(object: &ObjectValue<'_>, field: &'static str) -> Result<f64, FieldError> {
    let value = require(object, field)?;
    value
        .as_f64()
        .ok_or_else(|| wrong_type(field, "a number", &value))
}

fn require_array<'a>(
    object: &ObjectValue<'a>,
    field: &'static str,
) -> Result<ArrayValue<'a>, FieldError> {
    let value = require(object, field)?;
    value
        .as_array()
        .ok_or_else(|| wrong_type(field, "an array", &value))
}

fn wrong_type(field: &'static str, expected: &'static str, found: &Value<'_>) -> FieldError {
    FieldError::WrongType {
        field,
        expected,
        found: found.type_name(),
    }
}
