//! # serde_pathline
//!
//! A line-oriented `path=value` encoding for strongly typed Rust values.
//!
//! ## What is pathline?
//!
//! Every scalar leaf of a value becomes one line: the path from the root to
//! the leaf, an `=`, the leaf's text, and a newline.
//!
//! ```text
//! .name=probe-7
//! .limits[0]=10
//! .limits[1]=20
//! .mode.manual.speed=1.5
//! ```
//!
//! Paths are built from two segment kinds: `.field` for struct fields, union
//! variants and string map keys, and `[n]` for sequence positions and integer
//! map keys. Lines are independent, so a document can be replayed onto an
//! existing value one line at a time: later lines overwrite earlier ones and
//! only the addressed leaf changes.
//!
//! ## Key Features
//!
//! - **Serde encoding**: anything `Serialize` can be written
//! - **Shape-driven decoding**: the [`Decode`] trait decodes a fresh value or
//!   updates one in place, without allocating a tree
//! - **Declarative types**: [`pathline_record!`], [`pathline_union!`] and
//!   [`pathline_enum!`] define a type together with matching impls
//! - **Static line bound**: [`line_bound`] is a compile-time lower bound on the
//!   shortest line a type can emit
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_pathline = "0.1"
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde_pathline::{from_str, pathline_record, to_string};
//!
//! pathline_record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Probe {
//!         pub id: u32,
//!         pub limits: Vec<u16>,
//!         pub label: Option<String>,
//!     }
//! }
//!
//! let probe = Probe { id: 7, limits: vec![10, 20], label: None };
//!
//! let text = to_string(&probe).unwrap();
//! assert_eq!(text, ".id=7\n.limits[0]=10\n.limits[1]=20\n");
//!
//! let back: Probe = from_str(&text).unwrap();
//! assert_eq!(back, probe);
//! ```
//!
//! ### Incremental Updates
//!
//! ```rust
//! use serde_pathline::{update_line, pathline_record};
//!
//! pathline_record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Counter { pub hits: u64, pub misses: u64 }
//! }
//!
//! let mut counter = Counter { hits: 3, misses: 1 };
//! update_line(&mut counter, b".hits=4\n").unwrap();
//! assert_eq!(counter, Counter { hits: 4, misses: 1 });
//! ```
//!
//! ### Tagged Unions
//!
//! Exactly one variant of a union is written. When decoding, a variant is
//! chosen by its name together with the first byte of what follows it, so a
//! variant named `int` never swallows a line meant for `intBar`:
//!
//! ```rust
//! use serde_pathline::{decode_line, pathline_union};
//!
//! pathline_union! {
//!     #[derive(Debug, PartialEq)]
//!     pub enum Reading {
//!         Int(i32) => "int",
//!         IntBar(i32) => "intBar",
//!     }
//! }
//!
//! assert_eq!(decode_line::<Reading>(b".intBar=2\n").unwrap(), Reading::IntBar(2));
//! ```
//!
//! ## Error Handling
//!
//! Decoding errors carry the byte offset of the failing segment within the
//! input; document-level functions wrap them with the 1-based line number.
//! See [`Error`].
//!
//! ## Logging
//!
//! With the `tracing` feature enabled, the serializer and decoder emit
//! `trace`/`debug` events through the [`tracing`](https://docs.rs/tracing)
//! crate. Without it, logging compiles away.

#[macro_use]
mod tracing_macros;

pub mod cursor;
pub mod de;
pub mod error;
pub mod macros;
pub mod number;
pub mod options;
pub mod parser;
pub mod ser;
pub mod shape;
pub mod token;
pub mod wrappers;

pub use de::{
    decode_line, from_slice_with_options, lines, update_from_parser, update_from_slice,
    update_line, Accumulator, Decode, DecodeKey,
};
pub use error::{Error, NumberError, Result};
pub use options::Options;
pub use parser::Parser;
pub use ser::{Segment, Serializer};
pub use shape::{KeyKind, ScalarKind, Shape};
pub use token::{validate, Token, TokenKind, Tokenizer};
pub use wrappers::{Indexed, Named, Verbatim};

#[doc(hidden)]
pub use serde;

use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to a pathline string.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::to_string;
///
/// assert_eq!(to_string(&vec![1, 2, 3]).unwrap(), "[0]=1\n[1]=2\n[2]=3\n");
/// assert_eq!(to_string(&5u8).unwrap(), "=5\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no pathline representation (e.g. a map
/// with float keys, or a string value containing a newline).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::default())
}

/// Serialize any `T: Serialize` to a pathline string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::{to_string_with_options, Error, Options};
///
/// let nested = vec![vec![vec![1u8]]];
/// let options = Options::new().with_max_depth(2);
/// assert_eq!(
///     to_string_with_options(&nested, options),
///     Err(Error::DepthLimitExceeded { limit: 2 })
/// );
/// ```
///
/// # Errors
///
/// As [`to_string`], plus [`Error::DepthLimitExceeded`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let bytes = to_vec_with_options(value, options)?;
    String::from_utf8(bytes).map_err(Error::custom)
}

/// Serialize any `T: Serialize` to a byte vector.
///
/// # Errors
///
/// As [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, Options::default())
}

/// Serialize any `T: Serialize` to a byte vector with custom options.
///
/// # Errors
///
/// As [`to_string_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: Options) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::with_options(Vec::with_capacity(128), options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serialize any `T: Serialize` to a writer.
///
/// Each line is written with a single `write_all` call once it is complete.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &(1, "two")).unwrap();
/// assert_eq!(buffer, b"[0]=1\n[1]=two\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
/// Lines written before the failure stay written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, Options::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// As [`to_writer`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::with_options(writer, options);
    value.serialize(&mut serializer)
}

/// Decode a `T` from a document, starting from `T`'s zero value.
///
/// Lines are applied in order; lines that address the same leaf overwrite
/// each other, and leaves no line addresses keep their zero value. An empty
/// document decodes to the zero value.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::from_slice;
///
/// let value: Vec<i64> = from_slice(b"[1]=5\n[0]=4\n[1]=6\n").unwrap();
/// assert_eq!(value, vec![4, 6]);
/// ```
///
/// # Errors
///
/// The first malformed line, wrapped in [`Error::AtLine`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T: Decode>(doc: &[u8]) -> Result<T> {
    from_slice_with_options(doc, Options::default())
}

/// Decode a `T` from a document held in a string.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::from_str;
/// use std::collections::BTreeMap;
///
/// let map: BTreeMap<String, bool> = from_str(".on=true\n.off=false\n").unwrap();
/// assert_eq!(map["on"], true);
/// ```
///
/// # Errors
///
/// As [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T: Decode>(s: &str) -> Result<T> {
    from_slice(s.as_bytes())
}

/// Decode a `T` from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::from_reader;
/// use std::io::Cursor;
///
/// let value: (u8, bool) = from_reader(Cursor::new(b"[0]=9\n[1]=true\n")).unwrap();
/// assert_eq!(value, (9, true));
/// ```
///
/// # Errors
///
/// [`Error::Io`] if reading fails, otherwise as [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: Decode,
{
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&buf)
}

/// Width in bytes of the widest fixed path prefix of any line a `T` can emit.
///
/// Computed at compile time from `T`'s shape. Every scalar value counts as a
/// single byte and records and unions take their widest member, so this is
/// a sizing hint for line buffers, not a minimum line length.
///
/// ```rust
/// use serde_pathline::line_bound;
///
/// assert_eq!(line_bound::<u8>(), 1);
/// assert_eq!(line_bound::<[u8; 12]>(), 5);
/// ```
pub const fn line_bound<T: Decode>() -> usize {
    T::LINE_BOUND
}
