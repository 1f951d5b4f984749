//! Exercise → JSON builder contract tests.
//!
//! Output is a compact array of `{"id","name","body_part"}` objects, cut to
//! the sink's capacity on a char boundary. Stringify failure writes the
//! fallback literal, and the arena is flushed on every path.

use wt_json::records::{BODY_PART_MAX_LEN, NAME_MAX_LEN};
use wt_json::{
    build_exercises_json, build_exercises_json_in, build_exercises_tree, parse, Arena,
    ArenaConfig, Codec, Error, Exercise, SinkStatus, TextSink, Value, STRINGIFY_FAILURE,
};

/// Codec whose stringify always fails, to exercise the fallback path.
struct BrokenCodec;

impl Codec for BrokenCodec {
    fn parse<'a>(&self, text: &str, arena: &'a Arena) -> Result<Value<'a>, wt_json::AllocError> {
        parse(text, arena)
    }

    fn stringify(&self, _value: &Value<'_>) -> wt_json::error::Result<String> {
        Err(Error::Stringify("printer on fire".into()))
    }
}

fn sample() -> Vec<Exercise> {
    vec![
        Exercise::new(1, "Squat", "legs"),
        Exercise::new(2, "Bench Press", "chest"),
        Exercise::new(3, "Pull-up", "back"),
    ]
}

// ============================================================================
// Tree shape
// ============================================================================

#[test]
fn tree_is_array_of_three_pair_objects() {
    let arena = Arena::new();
    let tree = build_exercises_tree(&arena, &sample()).unwrap();
    let array = tree.as_array().unwrap();
    assert_eq!(array.size(), 3);

    for value in array.iter() {
        let object = value.as_object().unwrap();
        let keys: Vec<&str> = object.iter().map(|pair| pair.key).collect();
        assert_eq!(keys, ["id", "name", "body_part"]);
    }

    let second = array.get(1).unwrap().as_object().unwrap();
    assert_eq!(second.get("id"), Some(Value::Int(2)));
    assert_eq!(second.get("name").unwrap().as_str(), Some("Bench Press"));
    assert_eq!(second.get("body_part").unwrap().as_str(), Some("chest"));
}

#[test]
fn tree_for_no_exercises_is_empty_array() {
    let arena = Arena::new();
    let tree = build_exercises_tree(&arena, &[]).unwrap();
    assert_eq!(tree.as_array().unwrap().size(), 0);
}

// ============================================================================
// Rendering into a sink
// ============================================================================

#[test]
fn renders_compact_json() {
    let mut sink = TextSink::default();
    let status = build_exercises_json(&sample()[..1], &mut sink).unwrap();
    assert_eq!(status, SinkStatus::Complete);
    assert_eq!(
        sink.as_str(),
        r#"[{"id":1,"name":"Squat","body_part":"legs"}]"#
    );
}

#[test]
fn renders_empty_list_as_empty_array() {
    let mut sink = TextSink::default();
    build_exercises_json(&[], &mut sink).unwrap();
    assert_eq!(sink.as_str(), "[]");
}

#[test]
fn escapes_quotes_in_names() {
    let mut sink = TextSink::default();
    build_exercises_json(&[Exercise::new(4, "Farmer \"walk\"", "grip")], &mut sink).unwrap();
    assert_eq!(
        sink.as_str(),
        r#"[{"id":4,"name":"Farmer \"walk\"","body_part":"grip"}]"#
    );
}

#[test]
fn rendering_replaces_previous_sink_content() {
    let mut sink = TextSink::default();
    build_exercises_json(&sample(), &mut sink).unwrap();
    build_exercises_json(&[], &mut sink).unwrap();
    assert_eq!(sink.as_str(), "[]");
}

#[test]
fn long_output_is_truncated_prefix() {
    let mut full = TextSink::default();
    build_exercises_json(&sample(), &mut full).unwrap();

    let mut small = TextSink::new(20);
    let status = build_exercises_json(&sample(), &mut small).unwrap();
    assert_eq!(status, SinkStatus::Truncated);
    assert_eq!(small.len(), 20);
    assert!(full.as_str().starts_with(small.as_str()));
}

#[test]
fn truncation_respects_char_boundaries() {
    // `[{"id":1,"name":"` is 17 bytes; the next char is two bytes wide.
    let exercises = [Exercise::new(1, "Übung", "")];
    let mut sink = TextSink::new(18);
    let status = build_exercises_json(&exercises, &mut sink).unwrap();
    assert_eq!(status, SinkStatus::Truncated);
    assert_eq!(sink.as_str(), r#"[{"id":1,"name":""#);
}

#[test]
fn many_exercises_exceed_default_sink() {
    let exercises: Vec<Exercise> = (0..500)
        .map(|i| Exercise::new(i, "Romanian Deadlift", "hamstrings"))
        .collect();
    let mut sink = TextSink::default();
    let status = build_exercises_json(&exercises, &mut sink).unwrap();
    assert_eq!(status, SinkStatus::Truncated);
    assert!(sink.len() <= sink.capacity());
}

// ============================================================================
// Failure paths and arena lifecycle
// ============================================================================

#[test]
fn stringify_failure_writes_fallback_literal() {
    let mut arena = Arena::new();
    let mut sink = TextSink::default();
    let status = build_exercises_json_in(&mut arena, &BrokenCodec, &sample(), &mut sink).unwrap();
    assert_eq!(status, SinkStatus::Fallback);
    assert_eq!(sink.as_str(), STRINGIFY_FAILURE);
    assert_eq!(arena.used(), 0);
    assert_eq!(arena.capacity(), 0);
}

#[test]
fn arena_is_flushed_after_success() {
    let mut arena = Arena::new();
    let mut sink = TextSink::default();
    build_exercises_json_in(&mut arena, &wt_json::JsonCodec, &sample(), &mut sink).unwrap();
    assert_eq!(arena.used(), 0);
    assert_eq!(arena.capacity(), 0);
}

#[test]
fn arena_exhaustion_is_reported_and_flushed() {
    let mut arena = Arena::with_config(ArenaConfig {
        limit: Some(64 * 1024),
    });
    let exercises: Vec<Exercise> = (0..5_000)
        .map(|i| Exercise::new(i, "Overhead Press", "shoulders"))
        .collect();
    let mut sink = TextSink::default();

    let err = build_exercises_json_in(&mut arena, &wt_json::JsonCodec, &exercises, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::Alloc(_)));
    assert_eq!(sink.as_str(), STRINGIFY_FAILURE);
    assert_eq!(arena.used(), 0);
    assert_eq!(arena.capacity(), 0);
}

// ============================================================================
// Exercise records
// ============================================================================

#[test]
fn exercise_text_is_bounded() {
    let exercise = Exercise::new(1, &"n".repeat(100), &"b".repeat(40));
    assert_eq!(exercise.name().len(), NAME_MAX_LEN);
    assert_eq!(exercise.body_part().len(), BODY_PART_MAX_LEN);
}

#[test]
fn exercise_bounds_cut_at_char_boundary() {
    let exercise = Exercise::new(1, &"é".repeat(40), "");
    assert_eq!(exercise.name().len(), 62);
    assert_eq!(exercise.name().chars().count(), 31);
}

#[test]
fn exercise_from_store_defaults_missing_muscle_group() {
    let exercise = Exercise::from_store(9, "Plank", None);
    assert_eq!(exercise.body_part(), "");
}

#[test]
fn exercise_deserializes_store_shape() {
    let exercises: Vec<Exercise> = serde_json::from_str(
        r#"[{"id":1,"name":"Row","muscle_group":"back"},
            {"id":2,"name":"Plank","muscle_group":null},
            {"id":3,"name":"Dip","body_part":"triceps"}]"#,
    )
    .unwrap();
    assert_eq!(exercises[0], Exercise::new(1, "Row", "back"));
    assert_eq!(exercises[1].body_part(), "");
    assert_eq!(exercises[2].body_part(), "triceps");
}
