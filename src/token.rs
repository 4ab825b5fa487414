//! Raw tokenization of pathline text.
//!
//! [`Tokenizer`] is the schema-less view of a document: it splits lines into
//! `FIELD`, `INDEX` and `VALUE` tokens without knowing what type they will
//! decode into, and recovers from malformed lines by skipping to the next
//! newline. Typed decoding goes through [`Parser`](crate::Parser) instead.
//!
//! ```rust
//! use serde_pathline::{TokenKind, Tokenizer};
//!
//! let kinds: Vec<TokenKind> = Tokenizer::new(b".a[0]=1\n").map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Field, TokenKind::Index, TokenKind::Value, TokenKind::End]
//! );
//! ```

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `.name`; the token's bytes are `name`.
    Field,
    /// `[n]`; the token's bytes are `n`.
    Index,
    /// `=value` up to the newline; the token's bytes are `value`.
    Value,
    /// A malformed or unterminated line segment.
    Invalid,
    /// End of input. Always the last token.
    End,
}

/// A token borrowing its bytes from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub bytes: &'a [u8],
    /// Byte offset of `bytes` in the input.
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Field,
    Index,
    Value,
    Invalid,
}

/// Iterator over the tokens of a document.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a [u8],
    pos: usize,
    start: usize,
    state: State,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            input,
            pos: 0,
            start: 0,
            state: State::Start,
            finished: false,
        }
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        Token {
            kind,
            bytes: &self.input[start..end],
            offset: start,
        }
    }

    fn enter(&mut self, state: State) {
        self.state = state;
        self.start = self.pos + 1;
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        while let Some(&b) = self.input.get(self.pos) {
            let pos = self.pos;
            match (self.state, b) {
                (State::Start, b'.') => self.enter(State::Field),
                (State::Start, b'[') => self.enter(State::Index),
                (State::Start, b'=') => self.enter(State::Value),
                (State::Start, b'\n') => {
                    self.pos += 1;
                    return Some(self.token(TokenKind::Invalid, pos, pos));
                }
                (State::Start, _) => {
                    self.state = State::Invalid;
                    self.start = pos;
                }
                (State::Field, b'.' | b'[' | b'=') => {
                    let token = self.token(TokenKind::Field, self.start, pos);
                    self.enter(match b {
                        b'.' => State::Field,
                        b'[' => State::Index,
                        _ => State::Value,
                    });
                    self.pos += 1;
                    return Some(token);
                }
                (State::Index, b']') => {
                    let token = self.token(TokenKind::Index, self.start, pos);
                    self.state = State::Start;
                    self.pos += 1;
                    return Some(token);
                }
                (State::Value, b'\n') => {
                    let token = self.token(TokenKind::Value, self.start, pos);
                    self.state = State::Start;
                    self.pos += 1;
                    return Some(token);
                }
                (State::Field | State::Index | State::Invalid, b'\n') => {
                    let token = self.token(TokenKind::Invalid, self.start, pos);
                    self.state = State::Start;
                    self.pos += 1;
                    return Some(token);
                }
                _ => {}
            }
            self.pos += 1;
        }

        if self.state != State::Start {
            // Unterminated remainder; END follows on the next call.
            self.state = State::Start;
            let len = self.input.len();
            return Some(self.token(TokenKind::Invalid, self.start.min(len), len));
        }
        if self.finished {
            return None;
        }
        self.finished = true;
        let len = self.input.len();
        Some(self.token(TokenKind::End, len, len))
    }
}

/// Checks that `doc` is well-formed without decoding it, returning the
/// number of lines.
///
/// Every line must consist of zero or more `.name` / `[n]` segments followed by
/// `=value\n`. Field names and indices are not checked against any type.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::validate;
///
/// assert_eq!(validate(b".a=1\n[0].b=2\n").unwrap(), 2);
/// assert_eq!(validate(b".a=1\n[0]\n").unwrap_err().line(), Some(2));
/// ```
///
/// # Errors
///
/// `InvalidValue` at the start of the first malformed line segment, annotated
/// with its line number.
pub fn validate(doc: &[u8]) -> Result<usize> {
    let mut lines = 0;
    let mut pending = false;
    for token in Tokenizer::new(doc) {
        match token.kind {
            TokenKind::Field | TokenKind::Index => pending = true,
            TokenKind::Value => {
                lines += 1;
                pending = false;
            }
            TokenKind::Invalid => {
                return Err(Error::InvalidValue { pos: token.offset }.at_line(lines + 1));
            }
            TokenKind::End if pending => {
                return Err(Error::InvalidValue { pos: token.offset }.at_line(lines + 1));
            }
            TokenKind::End => break,
        }
    }
    Ok(lines)
}
