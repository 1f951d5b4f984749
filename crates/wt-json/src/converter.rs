//! Reusable conversion front end.
//!
//! A [`Converter`] owns one arena and one codec. Every call starts from a
//! flushed arena and flushes it again before returning, so one converter can
//! serve any number of calls from the thread that owns it.

use tracing::warn;

use crate::arena::{Arena, ArenaConfig};
use crate::builder::build_exercises_json_in;
use crate::codec::{Codec, JsonCodec};
use crate::error::{ExtractError, Result};
use crate::extractor::{extract_sets_in, ExtractOptions, Extraction};
use crate::records::{Exercise, SetCollection};
use crate::sink::{SinkStatus, TextSink, SINK_CAPACITY};

/// Build-side tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Size of the sink used by [`Converter::render_exercises`].
    pub sink_capacity: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            sink_capacity: SINK_CAPACITY,
        }
    }
}

#[derive(Debug)]
pub struct Converter<C = JsonCodec> {
    arena: Arena,
    codec: C,
    build: BuildOptions,
    extract: ExtractOptions,
}

impl Converter<JsonCodec> {
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }
}

impl Default for Converter<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> Converter<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            arena: Arena::new(),
            codec,
            build: BuildOptions::default(),
            extract: ExtractOptions::default(),
        }
    }

    /// Replace the arena with a fresh one using `config`.
    pub fn arena_config(mut self, config: ArenaConfig) -> Self {
        self.arena = Arena::with_config(config);
        self
    }

    pub fn build_options(mut self, options: BuildOptions) -> Self {
        self.build = options;
        self
    }

    pub fn extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Render `exercises` into a caller-supplied sink.
    pub fn build_exercises_json(
        &mut self,
        exercises: &[Exercise],
        sink: &mut TextSink,
    ) -> Result<SinkStatus> {
        build_exercises_json_in(&mut self.arena, &self.codec, exercises, sink)
    }

    /// Render `exercises` into a sink sized by [`BuildOptions::sink_capacity`]
    /// and hand back its text.
    pub fn render_exercises(&mut self, exercises: &[Exercise]) -> Result<(String, SinkStatus)> {
        let mut sink = TextSink::new(self.build.sink_capacity);
        let status = self.build_exercises_json(exercises, &mut sink)?;
        Ok((sink.into_string(), status))
    }

    /// Extract set rows from `text` with this converter's options.
    pub fn extract_sets(
        &mut self,
        text: &str,
        user_id: u32,
    ) -> std::result::Result<Extraction, ExtractError> {
        extract_sets_in(&mut self.arena, &self.codec, text, user_id, &self.extract)
    }
}

/// Render `exercises` as JSON into `sink` using a one-shot converter.
pub fn build_exercises_json(exercises: &[Exercise], sink: &mut TextSink) -> Result<SinkStatus> {
    Converter::new().build_exercises_json(exercises, sink)
}

/// Extract the set rows of a workout document.
///
/// Any document-level failure yields an empty collection; the reason is
/// logged. Use [`Converter::extract_sets`] for the structured outcome.
pub fn extract_sets(json_text: &str, user_id: u32) -> SetCollection {
    match Converter::new().extract_sets(json_text, user_id) {
        Ok(extraction) => extraction.sets,
        Err(err) => {
            warn!(error = %err, user_id, "discarding workout document");
            SetCollection::new()
        }
    }
}

/// Release a collection returned by [`extract_sets`].
pub fn release_sets(collection: SetCollection) {
    collection.release();
}
