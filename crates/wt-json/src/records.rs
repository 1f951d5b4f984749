//! Domain records exchanged with the JSON boundary.
//!
//! [`Exercise`] is the input of the builder; [`Set`] rows are the output of
//! the extractor, gathered in a bounded [`SetCollection`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::CapacityExceeded;
use crate::sink::prefix_within;

/// Longest exercise name kept, in bytes.
pub const NAME_MAX_LEN: usize = 63;
/// Longest body part kept, in bytes.
pub const BODY_PART_MAX_LEN: usize = 15;
/// Default number of rows a [`SetCollection`] accepts.
pub const DEFAULT_SET_CAPACITY: usize = 128;

/// An exercise as listed for a user.
///
/// `name` and `body_part` are bounded; longer input is cut at a UTF-8
/// boundary when the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExerciseRecord")]
pub struct Exercise {
    id: u32,
    name: String,
    body_part: String,
}

impl Exercise {
    pub fn new(id: u32, name: &str, body_part: &str) -> Self {
        Self {
            id,
            name: prefix_within(name, NAME_MAX_LEN).to_string(),
            body_part: prefix_within(body_part, BODY_PART_MAX_LEN).to_string(),
        }
    }

    /// Build from a stored exercise row, where the muscle group is optional.
    pub fn from_store(id: u32, name: &str, muscle_group: Option<&str>) -> Self {
        Self::new(id, name, muscle_group.unwrap_or(""))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body_part(&self) -> &str {
        &self.body_part
    }
}

/// Wire shape accepted for [`Exercise`]; `muscle_group` is the store's name
/// for `body_part`.
#[derive(Deserialize)]
struct ExerciseRecord {
    id: u32,
    name: String,
    #[serde(default, alias = "muscle_group")]
    body_part: Option<String>,
}

impl From<ExerciseRecord> for Exercise {
    fn from(record: ExerciseRecord) -> Self {
        Exercise::from_store(record.id, &record.name, record.body_part.as_deref())
    }
}

/// One performed set of a workout exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub workout_exercise_id: u32,
    /// Zero-based position within its exercise's `sets` list.
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
}

/// Extracted set rows with a fixed upper bound on their number.
///
/// Independent of any arena: it outlives the conversion pass that filled it
/// and belongs to the caller until dropped or passed to
/// [`release_sets`](crate::release_sets).
#[derive(Debug, Clone, PartialEq)]
pub struct SetCollection {
    content: Vec<Set>,
    capacity: usize,
}

impl SetCollection {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SET_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            content: Vec::new(),
            capacity,
        }
    }

    /// Append a row, refusing once `capacity` rows are held.
    pub fn try_push(&mut self, set: Set) -> Result<(), CapacityExceeded> {
        if self.content.len() >= self.capacity {
            return Err(CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.content.push(set);
        Ok(())
    }

    /// Number of rows filled.
    pub fn count(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[Set] {
        &self.content
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Set> {
        self.content.iter()
    }

    pub(crate) fn release(self) {
        trace!(count = self.content.len(), "releasing set collection");
    }
}

impl Default for SetCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> IntoIterator for &'c SetCollection {
    type Item = &'c Set;
    type IntoIter = std::slice::Iter<'c, Set>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}
