//! Small wrapper types with their own path shape.
//!
//! - [`Indexed`] carries an explicit index: `[index]` + value
//! - [`Named`] carries an explicit field name: `.name` + value
//! - [`Verbatim`] writes a value as one opaque leaf using its
//!   `Display`/`FromStr` text instead of decomposing it
//!
//! ```rust
//! use serde_pathline::{to_string, Indexed};
//!
//! assert_eq!(to_string(&Indexed::new(2u32, 3u8)).unwrap(), "[2]=3\n");
//! ```

use crate::number::Integer;
use crate::shape::{ScalarKind, Shape};
use crate::{Decode, Error, Parser, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::str::FromStr;

/// A value addressed by an explicit integer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Indexed<I, V> {
    pub index: I,
    pub value: V,
}

impl<I, V> Indexed<I, V> {
    pub fn new(index: I, value: V) -> Self {
        Indexed { index, value }
    }
}

// A single-entry map: integer keys serialize as `[k]`.
impl<I: Serialize, V: Serialize> Serialize for Indexed<I, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.index, &self.value)?;
        map.end()
    }
}

impl<I, V> Decode for Indexed<I, V>
where
    I: Integer + Default,
    V: Decode,
{
    const SHAPE: Shape = Shape::IndexedPair;
    const LINE_BOUND: usize = 3 + V::LINE_BOUND;

    fn zero() -> Self {
        Indexed {
            index: I::default(),
            value: V::zero(),
        }
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let index = parser.read_index()?;
        let value = parser.nested(V::decode)?;
        Ok(Indexed { index, value })
    }

    /// Keeps updating the current value while the index stays the same;
    /// a different index replaces the pair.
    fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
        let index: I = parser.read_index()?;
        if index == self.index {
            parser.nested(|parser| self.value.update(parser))
        } else {
            self.value = parser.nested(V::decode)?;
            self.index = index;
            Ok(())
        }
    }
}

/// A value addressed by an explicit field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Named<V> {
    pub name: String,
    pub value: V,
}

impl<V> Named<V> {
    pub fn new(name: impl Into<String>, value: V) -> Self {
        Named {
            name: name.into(),
            value,
        }
    }
}

impl<V: Serialize> Serialize for Named<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.name.as_str(), &self.value)?;
        map.end()
    }
}

impl<V: Decode> Decode for Named<V> {
    const SHAPE: Shape = Shape::NamedField;
    const LINE_BOUND: usize = 2 + V::LINE_BOUND;

    fn zero() -> Self {
        Named {
            name: String::new(),
            value: V::zero(),
        }
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let pos = parser.position();
        let name = parser.read_any_field_name()?;
        let name = std::str::from_utf8(name).map_err(|_| Error::InvalidField { pos })?;
        let value = parser.nested(V::decode)?;
        Ok(Named {
            name: name.to_owned(),
            value,
        })
    }

    fn update(&mut self, parser: &mut Parser<'_>) -> Result<()> {
        if parser.read_named_field(&self.name) {
            parser.nested(|parser| self.value.update(parser))
        } else {
            *self = Self::decode(parser)?;
            Ok(())
        }
    }
}

/// A leaf written with its own textual representation.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::{decode_line, to_string, Verbatim};
/// use std::fmt;
/// use std::str::FromStr;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Version(u8, u8);
///
/// impl fmt::Display for Version {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}.{}", self.0, self.1)
///     }
/// }
///
/// impl FromStr for Version {
///     type Err = ();
///
///     fn from_str(s: &str) -> Result<Self, ()> {
///         let (major, minor) = s.split_once('.').ok_or(())?;
///         Ok(Version(major.parse().map_err(|_| ())?, minor.parse().map_err(|_| ())?))
///     }
/// }
///
/// let version = Verbatim(Version(1, 2));
/// assert_eq!(to_string(&version).unwrap(), "=1.2\n");
/// assert_eq!(decode_line::<Verbatim<Version>>(b"=1.2\n").unwrap(), version);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Verbatim<T>(pub T);

impl<T: fmt::Display> Serialize for Verbatim<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<T: FromStr + Default> Decode for Verbatim<T> {
    const SHAPE: Shape = Shape::Scalar(ScalarKind::String);
    const LINE_BOUND: usize = 1;

    fn zero() -> Self {
        Verbatim(T::default())
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let pos = parser.position();
        let text = parser.read_str_value()?;
        text.parse()
            .map(Verbatim)
            .map_err(|_| Error::InvalidValue { pos })
    }
}
