//! Exercises → JSON.
//!
//! Builds an array of `{"id", "name", "body_part"}` objects inside an arena,
//! stringifies it, and copies the text into a bounded [`TextSink`]. The arena
//! is flushed after the copy on every path.

use tracing::{debug, error, warn};

use crate::arena::Arena;
use crate::codec::Codec;
use crate::error::{AllocError, Error, Result};
use crate::records::Exercise;
use crate::sink::{SinkStatus, TextSink};
use crate::value::{ArrayBuilder, ObjectBuilder, Value};

/// Written to the sink when the tree cannot be rendered.
pub const STRINGIFY_FAILURE: &str = "Error generating JSON";

pub const ID_KEY: &str = "id";
pub const NAME_KEY: &str = "name";
pub const BODY_PART_KEY: &str = "body_part";

/// Build the JSON tree for `exercises` in `arena`.
///
/// The result is an array of one object per exercise, each holding exactly
/// `id` (Int), `name` (String), `body_part` (String) in that order. Text is
/// copied into the arena.
pub fn build_exercises_tree<'a>(
    arena: &'a Arena,
    exercises: &[Exercise],
) -> std::result::Result<Value<'a>, AllocError> {
    let mut items = ArrayBuilder::with_capacity(arena, exercises.len())?;
    for exercise in exercises {
        items.push(exercise_object(arena, exercise)?)?;
    }
    Ok(Value::Array(items.finish()))
}

fn exercise_object<'a>(
    arena: &'a Arena,
    exercise: &Exercise,
) -> std::result::Result<Value<'a>, AllocError> {
    let mut object = ObjectBuilder::new(arena);
    object.push(ID_KEY, Value::Int(i64::from(exercise.id())))?;
    object.push(NAME_KEY, Value::string(arena, exercise.name())?)?;
    object.push(BODY_PART_KEY, Value::string(arena, exercise.body_part())?)?;
    Ok(Value::Object(object.finish()))
}

/// Render `exercises` as JSON into `sink`, then flush `arena`.
///
/// Text longer than the sink is truncated. If the codec cannot stringify the
/// tree, [`STRINGIFY_FAILURE`] is written and `Ok(SinkStatus::Fallback)` is
/// returned. If the arena runs out of memory the same literal is written and
/// the allocation error is returned.
pub fn build_exercises_json_in<C: Codec>(
    arena: &mut Arena,
    codec: &C,
    exercises: &[Exercise],
    sink: &mut TextSink,
) -> Result<SinkStatus> {
    let outcome = render(arena, codec, exercises, sink);
    arena.flush();
    outcome
}

fn render<C: Codec>(
    arena: &Arena,
    codec: &C,
    exercises: &[Exercise],
    sink: &mut TextSink,
) -> Result<SinkStatus> {
    let tree = match build_exercises_tree(arena, exercises) {
        Ok(tree) => tree,
        Err(err) => {
            error!(
                error = %err,
                count = exercises.len(),
                "arena exhausted while building exercises"
            );
            sink.write(STRINGIFY_FAILURE);
            return Err(Error::Alloc(err));
        }
    };

    match codec.stringify(&tree) {
        Ok(text) => {
            let status = sink.write(&text);
            if status == SinkStatus::Truncated {
                warn!(
                    full_len = text.len(),
                    capacity = sink.capacity(),
                    "exercises JSON truncated to sink capacity"
                );
            }
            debug!(count = exercises.len(), bytes = sink.len(), "rendered exercises");
            Ok(status)
        }
        Err(err) => {
            warn!(error = %err, "stringify failed, writing fallback");
            sink.write(STRINGIFY_FAILURE);
            Ok(SinkStatus::Fallback)
        }
    }
}
