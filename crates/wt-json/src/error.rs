//! Error types for arena allocation, stringification, and set extraction.

use thiserror::Error;

/// The arena could not satisfy an allocation request.
///
/// Raised when the host allocator fails or when the arena's configured
/// allocation limit would be exceeded. Never terminates the process.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("arena allocation of {requested} bytes failed")]
pub struct AllocError {
    requested: usize,
}

impl AllocError {
    pub(crate) fn new(requested: usize) -> Self {
        Self { requested }
    }

    /// Number of bytes the failed request asked for.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

/// A bounded collection refused an append.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("set collection is full (capacity {capacity})")]
pub struct CapacityExceeded {
    pub capacity: usize,
}

/// Errors raised on the build path (records → JSON text).
#[derive(Error, Debug)]
pub enum Error {
    /// The arena ran out of memory while building the tree.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// `serde_json` refused to serialize the tree.
    #[error("JSON stringify error: {0}")]
    Json(#[from] serde_json::Error),

    /// A codec reported a stringify failure of its own.
    #[error("stringify error: {0}")]
    Stringify(String),
}

/// Convenience alias used throughout wt-json.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single field failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("`{field}` should be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{field}` value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
}

/// A per-item validation failure, located within the document.
///
/// `set_index` is `None` when the whole exercise entry was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {reason}", location(.exercise_index, .set_index))]
pub struct Diagnostic {
    pub exercise_index: usize,
    pub set_index: Option<usize>,
    pub reason: FieldError,
}

fn location(exercise_index: &usize, set_index: &Option<usize>) -> String {
    match set_index {
        Some(set) => format!("exercises[{exercise_index}].sets[{set}]"),
        None => format!("exercises[{exercise_index}]"),
    }
}

/// Errors that abort a whole extraction. The caller sees an empty result.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The text was not valid JSON.
    #[error("malformed JSON document: {0}")]
    Malformed(String),

    /// A document-level field was missing or mistyped.
    #[error("invalid document: {0}")]
    Document(FieldError),

    /// The document belongs to a different user than the caller asked for.
    #[error("document user_id {found} does not match requested user {expected}")]
    UserMismatch { expected: i64, found: i64 },

    /// Strict validation rejected an exercise or set.
    #[error("invalid item at {0}")]
    InvalidItem(Diagnostic),

    #[error(transparent)]
    Capacity(#[from] CapacityExceeded),

    #[error(transparent)]
    Alloc(#[from] AllocError),
}
