//! Error types for pathline encoding and decoding.
//!
//! Every decoding failure is a data validation failure: the offending line is
//! rejected and the error carries the byte offset where the problem was found.
//!
//! ## Error Categories
//!
//! - **Path errors**: [`Error::InvalidField`] and [`Error::InvalidIndex`] for
//!   `.name` and `[n]` segments that are missing or malformed
//! - **Value errors**: [`Error::InvalidValue`] when the `=value` terminal or its
//!   newline is missing, plus one variant per scalar kind for unparseable values
//! - **Encoding errors**: values the format cannot represent, sink failures
//!
//! ## Examples
//!
//! ```rust
//! use serde_pathline::{decode_line, Error, NumberError};
//!
//! let err = decode_line::<u8>(b"=300\n").unwrap_err();
//! assert_eq!(
//!     err,
//!     Error::InvalidIntValue { pos: 1, reason: NumberError::Overflow }
//! );
//! ```

use std::fmt;
use thiserror::Error;

/// Why a decimal literal was rejected.
///
/// Overflow and underflow are reported separately from malformed digits so
/// callers can tell "not a number" apart from "does not fit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("empty literal")]
    Empty,

    #[error("invalid digit")]
    InvalidDigit,

    #[error("value too large for target type")]
    Overflow,

    #[error("value too small for target type")]
    Underflow,
}

/// Represents all possible errors that can occur during pathline encoding/decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Expected a `.name` segment, or no union variant matched
    #[error("invalid field at byte {pos}")]
    InvalidField { pos: usize },

    /// Expected `[n]`, the bracket is missing, or `n` is not a valid in-range integer
    #[error("invalid index at byte {pos}{}", fmt_reason(.reason))]
    InvalidIndex {
        pos: usize,
        reason: Option<NumberError>,
    },

    /// Expected `=value` terminated by a newline
    #[error("invalid value at byte {pos}: expected `=` followed by a newline-terminated value")]
    InvalidValue { pos: usize },

    #[error("invalid integer value at byte {pos}: {reason}")]
    InvalidIntValue { pos: usize, reason: NumberError },

    #[error("invalid float value at byte {pos}: {reason}")]
    InvalidFloatValue { pos: usize, reason: NumberError },

    #[error("invalid bool value at byte {pos}: expected `true` or `false`")]
    InvalidBoolValue { pos: usize },

    #[error("invalid enum value at byte {pos}")]
    InvalidEnumValue { pos: usize },

    /// Nesting went deeper than [`Options::max_depth`](crate::Options::max_depth)
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    /// The value contains bytes the line grammar has no way to express
    #[error("unrepresentable: {0}")]
    Unrepresentable(String),

    /// Unsupported type for serialization
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// IO error while writing lines to the sink
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),

    /// A decoding error annotated with the 1-based line it occurred on
    #[error("line {line}: {source}")]
    AtLine { line: usize, source: Box<Error> },
}

fn fmt_reason(reason: &Option<NumberError>) -> String {
    match reason {
        Some(reason) => format!(": {}", reason),
        None => String::new(),
    }
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_pathline::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for sink write failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    pub fn unrepresentable(msg: &str) -> Self {
        Error::Unrepresentable(msg.to_string())
    }

    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Error::AtLine { .. } => self,
            other => Error::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Returns the underlying error with any line annotation stripped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_pathline::{from_str, Error};
    ///
    /// let err = from_str::<Vec<u8>>("[0]=1\n[1]=x\n").unwrap_err();
    /// assert!(matches!(err, Error::AtLine { line: 2, .. }));
    /// assert!(matches!(err.root(), Error::InvalidIntValue { .. }));
    /// ```
    pub fn root(&self) -> &Error {
        match self {
            Error::AtLine { source, .. } => source.root(),
            other => other,
        }
    }

    /// The line number attached to this error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_reason_display() {
        let err = Error::InvalidIndex {
            pos: 3,
            reason: Some(NumberError::Overflow),
        };
        assert_eq!(
            err.to_string(),
            "invalid index at byte 3: value too large for target type"
        );

        let err = Error::InvalidIndex { pos: 0, reason: None };
        assert_eq!(err.to_string(), "invalid index at byte 0");
    }

    #[test]
    fn test_at_line_does_not_nest() {
        let err = Error::InvalidField { pos: 0 }.at_line(4).at_line(9);
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.root(), &Error::InvalidField { pos: 0 });
    }
}
