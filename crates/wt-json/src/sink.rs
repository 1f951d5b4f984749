//! Bounded text sink that receives rendered JSON.

/// Default sink size in bytes.
pub const SINK_CAPACITY: usize = 8192;

/// What ended up in a sink after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// The whole text fit.
    Complete,
    /// Only a prefix fit; the rest was dropped.
    Truncated,
    /// Rendering failed and a literal diagnostic was written instead.
    Fallback,
}

/// A fixed-capacity text buffer. Writes replace the previous content and are
/// cut at the last UTF-8 boundary that fits, so the content never exceeds
/// `capacity` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSink {
    capacity: usize,
    text: String,
}

impl TextSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            text: String::with_capacity(capacity),
        }
    }

    /// Replace the content with as much of `text` as fits.
    pub fn write(&mut self, text: &str) -> SinkStatus {
        let kept = prefix_within(text, self.capacity);
        self.text.clear();
        self.text.push_str(kept);
        if kept.len() < text.len() {
            SinkStatus::Truncated
        } else {
            SinkStatus::Complete
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Default for TextSink {
    fn default() -> Self {
        Self::new(SINK_CAPACITY)
    }
}

/// Longest prefix of `text` that is at most `max` bytes and ends on a char
/// boundary.
pub(crate) fn prefix_within(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
