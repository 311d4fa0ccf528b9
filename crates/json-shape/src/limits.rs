//! Limits applied at the parser boundary.
//!
//! Decoding recurses once per level of JSON nesting, so the nesting depth of
//! untrusted input is capped before a [`Value`](crate::Value) tree is ever
//! built.

/// Default maximum nesting depth of arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum input length in bytes (16 MiB).
pub const DEFAULT_MAX_INPUT_LEN: usize = 16 * 1024 * 1024;

/// Options controlling how JSON text is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting depth of arrays and objects. The root value is at
    /// depth 1 when it is a container.
    pub max_depth: usize,

    /// Maximum input length in bytes.
    pub max_input_len: usize,

    /// Reject objects that repeat a key.
    ///
    /// When disabled, the last occurrence wins and keeps the position of
    /// the first.
    pub reject_duplicate_keys: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            reject_duplicate_keys: false,
        }
    }
}

impl ParseOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject duplicate object keys.
    pub fn strict() -> Self {
        Self {
            reject_duplicate_keys: true,
            ..Self::default()
        }
    }

    /// Sets the maximum nesting depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum input length in bytes.
    pub fn max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }
}
