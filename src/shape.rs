//! Structural description of decodable types.
//!
//! A [`Shape`] says which of the eight structural kinds a type is. The decoder
//! never inspects it at runtime to pick an algorithm (each [`Decode`](crate::Decode)
//! impl already knows what it is), but two pieces of static information are
//! derived from it:
//!
//! - the *lead byte*: the first byte the type's own path segment (or value)
//!   starts with. Union and record decoding match `.name` together with the
//!   child's lead byte in one prefix compare, which is what tells variant
//!   `int` apart from variant `intBar` on the line `.intBar=1`.
//! - the *line bound*: see [`max_bound`] and [`Decode::LINE_BOUND`](crate::Decode::LINE_BOUND).

/// The scalar kinds a leaf can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    Bool,
    Enum,
    /// Any textual value, including types with a custom textual representation.
    String,
    Unit,
}

/// How a map key is addressed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Integer-like keys, written `[k]`.
    Index,
    /// String-like keys, written `.k`.
    Field,
}

/// Structural kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar(ScalarKind),
    Record,
    TaggedUnion,
    Sequence,
    Map(KeyKind),
    /// Transparent: an optional has no segment of its own, so its lead byte is
    /// its inner type's.
    Optional,
    IndexedPair,
    NamedField,
}

impl Shape {
    /// First byte of the encoding of a value of this shape, after its parent's path.
    ///
    /// [`Shape::Optional`] reports `=`; `Option<T>` overrides
    /// [`Decode::LEAD`](crate::Decode::LEAD) with `T`'s lead instead.
    pub const fn lead(self) -> u8 {
        match self {
            Shape::Scalar(_) | Shape::Optional => b'=',
            Shape::Record | Shape::TaggedUnion | Shape::NamedField => b'.',
            Shape::Map(KeyKind::Field) => b'.',
            Shape::Sequence | Shape::IndexedPair | Shape::Map(KeyKind::Index) => b'[',
        }
    }
}

/// Largest element of `bounds`, or `1` for an empty list.
///
/// Used to compute a union's (or record's) line bound as the max over its
/// variants (or fields).
pub const fn max_bound(bounds: &[usize]) -> usize {
    let mut max = 1;
    let mut i = 0;
    while i < bounds.len() {
        if bounds[i] > max {
            max = bounds[i];
        }
        i += 1;
    }
    max
}

/// Number of decimal digits in `n`.
pub const fn decimal_len(mut n: usize) -> usize {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}

/// Position of `name` in `variants`, as serde's `variant_index`.
pub fn variant_index(variants: &[&str], name: &str) -> u32 {
    variants.iter().position(|v| *v == name).unwrap_or(0) as u32
}
