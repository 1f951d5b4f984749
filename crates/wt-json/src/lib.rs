//! # wt-json
//!
//! Arena-backed JSON bridge between workout records and JSON text.
//!
//! Each conversion builds or parses a small JSON tree inside a bump
//! [`Arena`], walks it, and drops the whole tree at once when the arena is
//! flushed. Two directions are covered:
//!
//! - **exercises → JSON**: an array of `{"id","name","body_part"}` objects,
//!   copied into a bounded [`TextSink`] (truncated, never overrun).
//! - **JSON → sets**: a `{"user_id", "exercises": [{"exercise_id", "sets"}]}`
//!   document validated into [`Set`] rows.
//!
//! ## Quick start
//!
//! ```rust
//! use wt_json::{build_exercises_json, extract_sets, Exercise, TextSink};
//!
//! let mut sink = TextSink::default();
//! build_exercises_json(&[Exercise::new(1, "Squat", "legs")], &mut sink).unwrap();
//! assert_eq!(sink.as_str(), r#"[{"id":1,"name":"Squat","body_part":"legs"}]"#);
//!
//! let doc = r#"{"user_id":1,"exercises":[{"exercise_id":7,"sets":[{"reps":10,"weight":50}]}]}"#;
//! let sets = extract_sets(doc, 1);
//! assert_eq!(sets.count(), 1);
//! assert_eq!(sets.as_slice()[0].weight, 50.0);
//! ```
//!
//! ## Modules
//!
//! - [`arena`] — bump allocator with bulk flush
//! - [`value`] — arena JSON tree and its builders
//! - [`lookup`] — key lookup (exact match, last wins)
//! - [`codec`] — text ↔ tree via `serde_json`
//! - [`builder`] — exercises → JSON
//! - [`extractor`] — JSON → set rows
//! - [`converter`] — reusable front end and one-shot helpers
//! - [`records`] — `Exercise`, `Set`, `SetCollection`
//! - [`sink`] — bounded text output
//! - [`error`] — error types

pub mod arena;
pub mod builder;
pub mod codec;
pub mod converter;
pub mod error;
pub mod extractor;
pub mod lookup;
pub mod records;
pub mod sink;
pub mod value;

pub use arena::{Arena, ArenaConfig};
pub use builder::{build_exercises_json_in, build_exercises_tree, STRINGIFY_FAILURE};
pub use codec::{parse, stringify, Codec, JsonCodec};
pub use converter::{build_exercises_json, extract_sets, release_sets, BuildOptions, Converter};
pub use error::{AllocError, CapacityExceeded, Diagnostic, Error, ExtractError, FieldError};
pub use extractor::{
    extract_from_tree, extract_sets_in, ExtractOptions, Extraction, ValidationPolicy,
};
pub use lookup::lookup;
pub use records::{Exercise, Set, SetCollection};
pub use sink::{SinkStatus, TextSink, SINK_CAPACITY};
pub use value::{ArrayBuilder, ArrayValue, ObjectBuilder, ObjectValue, Pair, Value};
