//! Pathline decoding.
//!
//! Decoding is driven by the [`Decode`] trait rather than serde's
//! `Deserialize`: a line only ever addresses one leaf, so a document is
//! decoded by seeding a value with [`Decode::zero`] and then *updating* it in
//! place once per line. serde has no hook for that, and the tagged-union fast
//! path below needs one.
//!
//! ## Fresh decode and incremental update
//!
//! [`Decode::decode`] builds a value from the next line alone.
//! [`Decode::update`] applies the next line to an existing value. For tagged
//! unions, `update` first checks whether the line still belongs to the
//! variant that is already active and, if it does, descends straight into
//! that variant's storage without testing any other variant. Consecutive lines
//! of one nested object therefore cost one prefix compare per level.
//!
//! ```rust
//! use serde_pathline::{from_str, pathline_record};
//!
//! pathline_record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Point { pub x: i32, pub y: i32 }
//! }
//!
//! let point: Point = from_str(".y=2\n.x=1\n").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

use crate::error::NumberError;
use crate::shape::{decimal_len, max_bound, KeyKind, ScalarKind, Shape};
use crate::{Error, Options, Parser, Result};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// A type that can be reconstructed from pathline text.
///
/// Implemented for the standard scalars and containers; use
/// [`pathline_record!`](crate::pathline_record),
/// [`pathline_union!`](crate::pathline_union) and
/// [`pathline_enum!`](crate::pathline_enum) for your own types, or implement
/// it by hand.
pub trait Decode: Sized {
    const SHAPE: Shape;

    /// First byte of this type's encoding after its parent's path.
    const LEAD: u8 = Self::SHAPE.lead();

    /// Width in bytes of the widest fixed path prefix a line of this type
    /// can start with.
    ///
    /// Scalars and dynamically sized containers count as one unit, since
    /// their length is only known by scanning. Fixed path segments add their
    /// literal length. Unions and records take the max over their children,
    /// so this is not a minimum: a valid line may be shorter.
    const LINE_BOUND: usize;

    /// The default value used to seed incremental decoding: zero, `false`,
    /// the first declared variant, an empty container, `None`.
    fn zero() -> Self;

    /// Builds a value from the next line.
    fn decode(parser: &mut Parser<'_>) -> Result<Self>;

    /// Applies the next line to `self`.
    ///
    /// On error `self` may have been partially updated.
    fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
        *self = Self::decode(parser)?;
        Ok(())
    }
}

/// Map keys: integers are addressed as `[k]`; strings, `char` and `bool` as
/// `.k`.
pub trait DecodeKey: Sized {
    const KIND: KeyKind;

    fn read_key(parser: &mut Parser<'_>) -> Result<Self>;
}

macro_rules! impl_decode_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Decode for $t {
                const SHAPE: Shape = Shape::Scalar(ScalarKind::Int);
                const LINE_BOUND: usize = 1;

                fn zero() -> Self {
                    0
                }

                fn decode(parser: &mut Parser<'_>) -> Result<Self> {
                    parser.read_int_value()
                }
            }

            impl DecodeKey for $t {
                const KIND: KeyKind = KeyKind::Index;

                fn read_key(parser: &mut Parser<'_>) -> Result<Self> {
                    parser.read_index()
                }
            }
        )*
    };
}

impl_decode_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_decode_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Decode for $t {
                const SHAPE: Shape = Shape::Scalar(ScalarKind::Float);
                const LINE_BOUND: usize = 1;

                fn zero() -> Self {
                    0.0
                }

                fn decode(parser: &mut Parser<'_>) -> Result<Self> {
                    parser.read_float_value()
                }
            }
        )*
    };
}

impl_decode_float!(f32, f64);

impl Decode for bool {
    const SHAPE: Shape = Shape::Scalar(ScalarKind::Bool);
    const LINE_BOUND: usize = 1;

    fn zero() -> Self {
        false
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        parser.read_bool_value()
    }
}

impl Decode for String {
    const SHAPE: Shape = Shape::Scalar(ScalarKind::String);
    const LINE_BOUND: usize = 1;

    fn zero() -> Self {
        String::new()
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        parser.read_str_value().map(str::to_owned)
    }
}

impl DecodeKey for String {
    const KIND: KeyKind = KeyKind::Field;

    fn read_key(parser: &mut Parser<'_>) -> Result<Self> {
        let pos = parser.position();
        let name = parser.read_any_field_name()?;
        std::str::from_utf8(name)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidField { pos })
    }
}

impl DecodeKey for char {
    const KIND: KeyKind = KeyKind::Field;

    fn read_key(parser: &mut Parser<'_>) -> Result<Self> {
        let pos = parser.position();
        let name = parser.read_any_field_name()?;
        let mut chars = std::str::from_utf8(name)
            .map_err(|_| Error::InvalidField { pos })?
            .chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::InvalidField { pos }),
        }
    }
}

impl DecodeKey for bool {
    const KIND: KeyKind = KeyKind::Field;

    fn read_key(parser: &mut Parser<'_>) -> Result<Self> {
        let pos = parser.position();
        match parser.read_any_field_name()? {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => Err(Error::InvalidField { pos }),
        }
    }
}

impl Decode for char {
    const SHAPE: Shape = Shape::Scalar(ScalarKind::String);
    const LINE_BOUND: usize = 1;

    fn zero() -> Self {
        '\0'
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let pos = parser.position();
        let text = parser.read_str_value()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::InvalidValue { pos }),
        }
    }
}

impl Decode for () {
    const SHAPE: Shape = Shape::Scalar(ScalarKind::Unit);
    const LINE_BOUND: usize = 1;

    fn zero() -> Self {}

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let pos = parser.position();
        if parser.read_value()?.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidValue { pos })
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    const SHAPE: Shape = Shape::Optional;
    const LEAD: u8 = T::LEAD;
    const LINE_BOUND: usize = T::LINE_BOUND;

    fn zero() -> Self {
        None
    }

    // Any line addressing an optional means it is present.
    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        T::decode(parser).map(Some)
    }

    fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
        match self {
            Some(inner) => inner.update(parser),
            None => {
                *self = Some(T::decode(parser)?);
                Ok(())
            }
        }
    }
}

// Indirection is how recursive types are spelled, so its bound does not look
// through to `T`; that would be a cycle.
impl<T: Decode> Decode for Box<T> {
    const SHAPE: Shape = T::SHAPE;
    const LEAD: u8 = T::LEAD;
    const LINE_BOUND: usize = 1;

    fn zero() -> Self {
        Box::new(T::zero())
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        T::decode(parser).map(Box::new)
    }

    fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
        (**self).update(parser)
    }
}

fn read_position(parser: &mut Parser<'_>, len_limit: usize) -> Result<usize> {
    let pos = parser.position();
    let index: usize = parser.read_index()?;
    if index >= len_limit {
        return Err(Error::InvalidIndex {
            pos,
            reason: Some(NumberError::Overflow),
        });
    }
    Ok(index)
}

impl<T: Decode> Decode for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;
    const LINE_BOUND: usize = 1;

    fn zero() -> Self {
        Vec::new()
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let mut value = Vec::new();
        value.update(parser)?;
        Ok(value)
    }

    /// Elements may arrive in any order; the vector grows with zero values up
    /// to the addressed index.
    fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
        let limit = parser.options().max_sequence_len;
        let index = read_position(parser, limit)?;
        if index < self.len() {
            return parser.nested(|parser| self[index].update(parser));
        }
        // Decode before growing so a bad line leaves the length untouched.
        let element = parser.nested(T::decode)?;
        trace!("growing sequence from {} to {}", self.len(), index + 1);
        self.resize_with(index, T::zero);
        self.push(element);
        Ok(())
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    const SHAPE: Shape = Shape::Sequence;
    const LINE_BOUND: usize = 2 + decimal_len(N.saturating_sub(1)) + T::LINE_BOUND;

    fn zero() -> Self {
        std::array::from_fn(|_| T::zero())
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let mut value = Self::zero();
        value.update(parser)?;
        Ok(value)
    }

    fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
        let index = read_position(parser, N)?;
        parser.nested(|parser| self[index].update(parser))
    }
}

macro_rules! impl_decode_tuple {
    ($($idx:tt $name:ident),+) => {
        impl<$($name: Decode),+> Decode for ($($name,)+) {
            const SHAPE: Shape = Shape::Sequence;
            const LINE_BOUND: usize = max_bound(&[$(3 + <$name as Decode>::LINE_BOUND),+]);

            fn zero() -> Self {
                ($(<$name as Decode>::zero(),)+)
            }

            fn decode(parser: &mut Parser<'_>) -> Result<Self> {
                let mut value = Self::zero();
                value.update(parser)?;
                Ok(value)
            }

            fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
                let pos = parser.position();
                let index: usize = parser.read_index()?;
                match index {
                    $($idx => parser.nested(|parser| self.$idx.update(parser)),)+
                    _ => Err(Error::InvalidIndex {
                        pos,
                        reason: Some(NumberError::Overflow),
                    }),
                }
            }
        }
    };
}

impl_decode_tuple!(0 A, 1 B);
impl_decode_tuple!(0 A, 1 B, 2 C);
impl_decode_tuple!(0 A, 1 B, 2 C, 3 D);

macro_rules! impl_decode_map {
    (impl [$($generics:tt)*] $map:ty, $new:expr) => {
        impl<$($generics)*> Decode for $map {
            const SHAPE: Shape = Shape::Map(K::KIND);
            const LINE_BOUND: usize = 1;

            fn zero() -> Self {
                $new
            }

            fn decode(parser: &mut Parser<'_>) -> Result<Self> {
                let mut value = Self::zero();
                value.update(parser)?;
                Ok(value)
            }

            fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
                let key = K::read_key(parser)?;
                if let Some(existing) = self.get_mut(&key) {
                    return parser.nested(|parser| existing.update(parser));
                }
                // A new key is only inserted once its value decodes.
                let value = parser.nested(V::decode)?;
                self.insert(key, value);
                Ok(())
            }
        }
    };
}

impl_decode_map!(
    impl [K: DecodeKey + Eq + Hash, V: Decode, S: BuildHasher + Default] HashMap<K, V, S>,
    HashMap::default()
);
impl_decode_map!(
    impl [K: DecodeKey + Eq + Hash, V: Decode, S: BuildHasher + Default] IndexMap<K, V, S>,
    IndexMap::default()
);
impl_decode_map!(impl [K: DecodeKey + Ord, V: Decode] BTreeMap<K, V>, BTreeMap::new());

/// Decodes exactly one line into a fresh value.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::decode_line;
///
/// let value: Vec<i32> = decode_line(b"[2]=3\n").unwrap();
/// assert_eq!(value, vec![0, 0, 3]);
/// ```
///
/// # Errors
///
/// Returns the first malformed segment of the line; bytes after the first
/// newline are rejected with `InvalidValue`.
pub fn decode_line<T: Decode>(line: &[u8]) -> Result<T> {
    let mut parser = Parser::new(line);
    let value = T::decode(&mut parser)?;
    expect_end(&parser)?;
    Ok(value)
}

/// Applies exactly one line to `value`.
///
/// # Errors
///
/// As [`decode_line`]. On error `value` may have been partially updated.
pub fn update_line<T: Decode>(value: &mut T, line: &[u8]) -> Result<()> {
    let mut parser = Parser::new(line);
    value.update(&mut parser)?;
    expect_end(&parser)
}

fn expect_end(parser: &Parser<'_>) -> Result<()> {
    if parser.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidValue {
            pos: parser.position(),
        })
    }
}

/// Applies every remaining line of `parser` to `value`, returning how many
/// lines were applied.
///
/// Errors are annotated with the line they occurred on; decoding stops at the
/// first one.
pub fn update_from_parser<T: Decode>(value: &mut T, parser: &mut Parser<'_>) -> Result<usize> {
    let mut count = 0;
    while !parser.is_empty() {
        let line = parser.line();
        value.update(parser).map_err(|e| e.at_line(line))?;
        count += 1;
    }
    Ok(count)
}

/// Applies every line of `doc` to `value`.
pub fn update_from_slice<T: Decode>(value: &mut T, doc: &[u8]) -> Result<usize> {
    update_from_parser(value, &mut Parser::new(doc))
}

pub fn from_slice_with_options<T: Decode>(doc: &[u8], options: Options) -> Result<T> {
    debug!("decoding {} byte document", doc.len());
    let mut value = T::zero();
    let count = update_from_parser(&mut value, &mut Parser::with_options(doc, options))?;
    debug!("decoded {} lines", count);
    Ok(value)
}

/// Splits a document into its lines, each including its newline.
///
/// A final line without a newline is yielded as-is; decoding it fails with
/// `InvalidValue`.
pub fn lines(doc: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    doc.split_inclusive(|&b| b == b'\n')
}

/// A value built up one line at a time.
///
/// Seeded with [`Decode::zero`]; each fed line is applied with
/// [`Decode::update`].
///
/// # Examples
///
/// ```rust
/// use serde_pathline::Accumulator;
///
/// let mut acc = Accumulator::<Vec<u8>>::new();
/// acc.feed_line(b"[1]=5\n").unwrap();
/// acc.feed_line(b"[0]=4\n").unwrap();
/// assert_eq!(acc.get(), &vec![4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct Accumulator<T> {
    value: T,
    options: Options,
    lines: usize,
}

impl<T: Decode> Default for Accumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Decode> Accumulator<T> {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self::from_value(T::zero(), options)
    }

    /// Continues from a previously decoded value.
    pub fn from_value(value: T, options: Options) -> Self {
        Accumulator {
            value,
            options,
            lines: 0,
        }
    }

    /// Applies one line.
    ///
    /// # Errors
    ///
    /// As [`update_line`], annotated with the number of the line within
    /// everything fed so far.
    pub fn feed_line(&mut self, line: &[u8]) -> Result<()> {
        let number = self.lines + 1;
        let mut parser = Parser::with_options(line, self.options);
        self.value
            .update(&mut parser)
            .and_then(|()| expect_end(&parser))
            .map_err(|e| e.at_line(number))?;
        self.lines = number;
        Ok(())
    }

    /// Applies every line in `chunk`, which must end on a line boundary.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<usize> {
        let mut fed = 0;
        for line in lines(chunk) {
            self.feed_line(line)?;
            fed += 1;
        }
        Ok(fed)
    }

    /// Number of lines applied so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

#[doc(hidden)]
pub mod __private {
    /// Logs whether a union update stayed on its active variant.
    pub fn union_fast_path(variant: &str, hit: bool) {
        if hit {
            trace!("union fast path hit for variant {}", variant);
        } else {
            trace!("union fast path miss, active variant was {}", variant);
        }
    }
}
