//! The grammar parser.
//!
//! [`Parser`] is pull-based: callers ask for exactly the segment they expect
//! next (`[n]`, `.name`, or `=value`) and the parser either consumes it or
//! reports what was wrong. Nothing is tokenized ahead of time and nothing is
//! copied; names and values come back as slices of the input buffer.
//!
//! ```rust
//! use serde_pathline::Parser;
//!
//! let mut parser = Parser::new(b".point[1]=-7\n");
//! assert!(parser.read_named_field("point"));
//! assert_eq!(parser.read_index::<usize>().unwrap(), 1);
//! assert_eq!(parser.read_int_value::<i32>().unwrap(), -7);
//! assert!(parser.is_empty());
//! ```
//!
//! Every primitive checks its own bounds. A variant that trusts the caller to
//! have proven enough input is buffered would buy nothing here: slices are
//! bounds-checked anyway.

use crate::cursor::Cursor;
use crate::number::{Float, Integer};
use crate::{Error, Options, Result};

#[inline]
fn is_field_end(b: u8) -> bool {
    matches!(b, b'.' | b'[' | b'=')
}

/// Pull parser over a buffer of pathline text.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    line: usize,
    depth: usize,
    options: Options,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, Options::default())
    }

    pub fn with_options(input: &'a [u8], options: Options) -> Self {
        Parser {
            cursor: Cursor::new(input),
            line: 1,
            depth: 0,
            options,
        }
    }

    /// Byte offset of the next unread byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// 1-based number of the line the parser is on.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.cursor.remaining()
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// `InvalidField` at the current position.
    pub fn invalid_field(&self) -> Error {
        Error::InvalidField {
            pos: self.position(),
        }
    }

    /// Runs `f` one nesting level deeper, failing once `max_depth` is exceeded.
    ///
    /// The depth is restored whether `f` succeeds or not.
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Reads `[n]` and parses `n` as an integer of the target width.
    ///
    /// A leading `-` is only accepted when `I` is signed.
    pub fn read_index<I: Integer>(&mut self) -> Result<I> {
        let pos = self.position();
        if self.cursor.peek() != Some(b'[') {
            return Err(Error::InvalidIndex { pos, reason: None });
        }
        let close = self.cursor.find(|b| b == b']' || b == b'\n');
        let end = match close {
            Some(end) if self.cursor.peek_at(end) == Some(b']') => end,
            _ => return Err(Error::InvalidIndex { pos, reason: None }),
        };
        let literal = &self.cursor.remaining()[1..end];
        let index = I::from_decimal(literal).map_err(|reason| Error::InvalidIndex {
            pos,
            reason: Some(reason),
        })?;
        self.cursor.advance(end + 1);
        Ok(index)
    }

    /// Consumes `.name` if the input continues with it followed by one of
    /// `[`, `.` or `=`. Leaves the parser untouched and returns `false`
    /// otherwise.
    pub fn read_named_field(&mut self, name: &str) -> bool {
        match self.field_prefix_len(name) {
            Some(len) if self.cursor.peek_at(len).is_some_and(is_field_end) => {
                self.cursor.advance(len);
                true
            }
            _ => false,
        }
    }

    /// Like [`read_named_field`](Self::read_named_field), but the byte after
    /// the name must be exactly `lead`.
    ///
    /// Matching the delimiter together with the name is what lets a union
    /// tell `.int=` from `.intBar=` (and from `.int.x=`) in one compare.
    pub fn read_field_with_lead(&mut self, name: &str, lead: u8) -> bool {
        match self.field_prefix_len(name) {
            Some(len) if self.cursor.peek_at(len) == Some(lead) => {
                self.cursor.advance(len);
                true
            }
            _ => false,
        }
    }

    fn field_prefix_len(&self, name: &str) -> Option<usize> {
        let rest = self.cursor.remaining();
        let name = name.as_bytes();
        if rest.first() == Some(&b'.') && rest[1..].starts_with(name) {
            Some(1 + name.len())
        } else {
            None
        }
    }

    /// Reads `.name` for any name, stopping before the next `[`, `.` or `=`.
    pub fn read_any_field_name(&mut self) -> Result<&'a [u8]> {
        let pos = self.position();
        if self.cursor.peek() != Some(b'.') {
            return Err(Error::InvalidField { pos });
        }
        let rest = &self.cursor.remaining()[1..];
        match rest.iter().position(|&b| is_field_end(b) || b == b'\n') {
            Some(end) if rest[end] != b'\n' => {
                self.cursor.advance(1 + end);
                Ok(&rest[..end])
            }
            _ => Err(Error::InvalidField { pos }),
        }
    }

    /// Reads `=value\n` and returns `value`.
    pub fn read_value(&mut self) -> Result<&'a [u8]> {
        let pos = self.position();
        if self.cursor.peek() != Some(b'=') {
            return Err(Error::InvalidValue { pos });
        }
        let newline = self
            .cursor
            .find(|b| b == b'\n')
            .ok_or(Error::InvalidValue { pos })?;
        let line = self.cursor.take(newline + 1);
        self.line += 1;
        Ok(&line[1..newline])
    }

    /// Reads `=tag\n` where `tag` is one of `candidates`, returning its position.
    ///
    /// On a mismatch nothing is consumed, so a caller can fall back to
    /// another reading of the same value.
    pub fn read_enum_value(&mut self, candidates: &[&str]) -> Result<usize> {
        let pos = self.position();
        let rest = self.cursor.remaining();
        if rest.first() != Some(&b'=') {
            return Err(Error::InvalidValue { pos });
        }
        let value = &rest[1..];
        for (i, candidate) in candidates.iter().enumerate() {
            let candidate = candidate.as_bytes();
            if value.starts_with(candidate) && value.get(candidate.len()) == Some(&b'\n') {
                self.cursor.advance(candidate.len() + 2);
                self.line += 1;
                return Ok(i);
            }
        }
        Err(Error::InvalidEnumValue { pos: pos + 1 })
    }

    /// Reads `=true\n` or `=false\n`.
    ///
    /// Decoded as a two-case enum; a mismatch surfaces as `InvalidBoolValue`.
    pub fn read_bool_value(&mut self) -> Result<bool> {
        match self.read_enum_value(&["false", "true"]) {
            Ok(i) => Ok(i == 1),
            Err(Error::InvalidEnumValue { pos }) => Err(Error::InvalidBoolValue { pos }),
            Err(e) => Err(e),
        }
    }

    pub fn read_int_value<I: Integer>(&mut self) -> Result<I> {
        let pos = self.position() + 1;
        let value = self.read_value()?;
        I::from_decimal(value).map_err(|reason| Error::InvalidIntValue { pos, reason })
    }

    pub fn read_float_value<F: Float>(&mut self) -> Result<F> {
        let pos = self.position() + 1;
        let value = self.read_value()?;
        F::from_decimal(value).map_err(|reason| Error::InvalidFloatValue { pos, reason })
    }

    /// Reads a value as UTF-8 text.
    pub fn read_str_value(&mut self) -> Result<&'a str> {
        let pos = self.position();
        let value = self.read_value()?;
        std::str::from_utf8(value).map_err(|_| Error::InvalidValue { pos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NumberError;

    #[test]
    fn test_read_index() {
        let mut parser = Parser::new(b"[12][x]");
        assert_eq!(parser.read_index::<u32>(), Ok(12));
        assert_eq!(
            parser.read_index::<u32>(),
            Err(Error::InvalidIndex {
                pos: 4,
                reason: Some(NumberError::InvalidDigit)
            })
        );
    }

    #[test]
    fn test_read_index_errors() {
        assert_eq!(
            Parser::new(b".a").read_index::<u8>(),
            Err(Error::InvalidIndex { pos: 0, reason: None })
        );
        assert_eq!(
            Parser::new(b"[3\n]").read_index::<u8>(),
            Err(Error::InvalidIndex { pos: 0, reason: None })
        );
        assert_eq!(
            Parser::new(b"[256]").read_index::<u8>(),
            Err(Error::InvalidIndex {
                pos: 0,
                reason: Some(NumberError::Overflow)
            })
        );
        assert_eq!(Parser::new(b"[-2]").read_index::<i8>(), Ok(-2));
    }

    #[test]
    fn test_read_named_field_leaves_cursor_on_mismatch() {
        let mut parser = Parser::new(b".intBar=1\n");
        assert!(!parser.read_named_field("int"));
        assert_eq!(parser.position(), 0);
        assert!(parser.read_named_field("intBar"));
        assert_eq!(parser.remaining(), b"=1\n");
    }

    #[test]
    fn test_read_field_with_lead() {
        let mut parser = Parser::new(b".int.a=1\n");
        assert!(!parser.read_field_with_lead("int", b'='));
        assert!(parser.read_field_with_lead("int", b'.'));
        assert_eq!(parser.remaining(), b".a=1\n");
    }

    #[test]
    fn test_read_any_field_name() {
        let mut parser = Parser::new(b".name[0]=1\n");
        assert_eq!(parser.read_any_field_name(), Ok(&b"name"[..]));
        assert_eq!(parser.remaining(), b"[0]=1\n");

        assert_eq!(
            Parser::new(b".abc\n").read_any_field_name(),
            Err(Error::InvalidField { pos: 0 })
        );
        assert_eq!(
            Parser::new(b".abc").read_any_field_name(),
            Err(Error::InvalidField { pos: 0 })
        );
        assert_eq!(
            Parser::new(b"[0]").read_any_field_name(),
            Err(Error::InvalidField { pos: 0 })
        );
    }

    #[test]
    fn test_read_value() {
        let mut parser = Parser::new(b"=a b.c[d]\n=\n");
        assert_eq!(parser.read_value(), Ok(&b"a b.c[d]"[..]));
        assert_eq!(parser.line(), 2);
        assert_eq!(parser.read_value(), Ok(&b""[..]));
        assert!(parser.is_empty());

        assert_eq!(
            Parser::new(b"=no newline").read_value(),
            Err(Error::InvalidValue { pos: 0 })
        );
        assert_eq!(
            Parser::new(b".a=1\n").read_value(),
            Err(Error::InvalidValue { pos: 0 })
        );
    }

    #[test]
    fn test_read_enum_value() {
        let candidates = ["red", "redder"];
        assert_eq!(Parser::new(b"=redder\n").read_enum_value(&candidates), Ok(1));
        assert_eq!(Parser::new(b"=red\n").read_enum_value(&candidates), Ok(0));

        let mut parser = Parser::new(b"=blue\n");
        assert_eq!(
            parser.read_enum_value(&candidates),
            Err(Error::InvalidEnumValue { pos: 1 })
        );
        assert_eq!(parser.position(), 0);
    }

    #[test]
    fn test_read_bool_value() {
        assert_eq!(Parser::new(b"=true\n").read_bool_value(), Ok(true));
        assert_eq!(Parser::new(b"=false\n").read_bool_value(), Ok(false));
        assert_eq!(
            Parser::new(b"=True\n").read_bool_value(),
            Err(Error::InvalidBoolValue { pos: 1 })
        );
    }

    #[test]
    fn test_read_numbers() {
        assert_eq!(Parser::new(b"=-42\n").read_int_value::<i64>(), Ok(-42));
        assert_eq!(
            Parser::new(b"=q\n").read_int_value::<i64>(),
            Err(Error::InvalidIntValue {
                pos: 1,
                reason: NumberError::InvalidDigit
            })
        );
        assert_eq!(Parser::new(b"=2.5\n").read_float_value::<f32>(), Ok(2.5));
        assert_eq!(
            Parser::new(b"=2.5.1\n").read_float_value::<f64>(),
            Err(Error::InvalidFloatValue {
                pos: 1,
                reason: NumberError::InvalidDigit
            })
        );
    }

    #[test]
    fn test_nested_depth_limit() {
        let mut parser = Parser::with_options(b"", Options::new().with_max_depth(1));
        let result = parser.nested(|p| p.nested(|_| Ok(())));
        assert_eq!(result, Err(Error::DepthLimitExceeded { limit: 1 }));
        assert_eq!(parser.nested(|_| Ok(7)), Ok(7));
    }
}
