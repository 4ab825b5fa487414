//! Configuration options for pathline encoding and decoding.
//!
//! The line grammar itself has no knobs; these options only bound the
//! resources a single call may use.
//!
//! ## Examples
//!
//! ```rust
//! use serde_pathline::{to_string_with_options, Options};
//!
//! let options = Options::new().with_max_depth(2);
//! let nested = vec![vec![vec![1u8]]];
//! assert!(to_string_with_options(&nested, options).is_err());
//! ```

/// Resource limits for the serializer and the decoder.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::Options;
///
/// let options = Options::new()
///     .with_max_depth(32)
///     .with_max_sequence_len(1024)
///     .with_path_capacity(64);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of nested path segments. Guards recursive types
    /// (`Box<Self>` variants) against stack exhaustion on long lines.
    pub max_depth: usize,
    /// Sequence indices at or above this are rejected with `InvalidIndex`.
    /// Sequences are grown with zero values up to the addressed index, so
    /// this caps what a single line can make the decoder allocate.
    pub max_sequence_len: usize,
    /// Initial capacity of the serializer's path buffer.
    pub path_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: 128,
            max_sequence_len: 1 << 20,
            path_capacity: 256,
        }
    }
}

impl Options {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_pathline::Options;
    ///
    /// let options = Options::new();
    /// assert_eq!(options.max_depth, 128);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_max_sequence_len(mut self, max_sequence_len: usize) -> Self {
        self.max_sequence_len = max_sequence_len;
        self
    }

    #[must_use]
    pub fn with_path_capacity(mut self, path_capacity: usize) -> Self {
        self.path_capacity = path_capacity;
        self
    }
}
