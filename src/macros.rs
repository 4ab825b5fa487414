//! Declarative macros deriving matching `Serialize` and [`Decode`](crate::Decode)
//! impls, so a type's wire names are written down exactly once.
//!
//! - [`pathline_record!`](crate::pathline_record): a struct; each field is `.field`
//! - [`pathline_union!`](crate::pathline_union): an enum with one payload per
//!   variant; exactly one `.variant` is active
//! - [`pathline_enum!`](crate::pathline_enum): a fieldless enum written as a
//!   scalar tag, optionally with a catch-all for unknown numeric values
//!
//! The first declared variant of a union or enum is its zero value, so it must
//! not be recursive.

/// Defines a struct that encodes each field as `.field`.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::{from_str, pathline_record, to_string};
///
/// pathline_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Nested { pub b: i32 }
/// }
///
/// pathline_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Outer { pub a: i32, pub nested: Nested }
/// }
///
/// let value = Outer { a: 1, nested: Nested { b: 2 } };
/// let text = to_string(&value).unwrap();
/// assert_eq!(text, ".a=1\n.nested.b=2\n");
/// assert_eq!(from_str::<Outer>(&text).unwrap(), value);
/// ```
#[macro_export]
macro_rules! pathline_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                use $crate::serde::ser::SerializeStruct;
                let fields: &[&str] = &[$(stringify!($field)),*];
                let mut state = serializer.serialize_struct(stringify!($name), fields.len())?;
                $(
                    state.serialize_field(stringify!($field), &self.$field)?;
                )*
                state.end()
            }
        }

        impl $crate::Decode for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Record;
            const LINE_BOUND: usize = $crate::shape::max_bound(&[
                $(1 + stringify!($field).len() + <$ty as $crate::Decode>::LINE_BOUND),*
            ]);

            fn zero() -> Self {
                $name {
                    $($field: <$ty as $crate::Decode>::zero(),)*
                }
            }

            fn decode(parser: &mut $crate::Parser<'_>) -> $crate::Result<Self> {
                let mut value = <Self as $crate::Decode>::zero();
                $crate::Decode::update(&mut value, parser)?;
                ::core::result::Result::Ok(value)
            }

            fn update(&mut self, parser: &mut $crate::Parser<'_>) -> $crate::Result<()> {
                $(
                    if parser.read_field_with_lead(
                        stringify!($field),
                        <$ty as $crate::Decode>::LEAD,
                    ) {
                        return parser.nested(|parser| $crate::Decode::update(&mut self.$field, parser));
                    }
                )*
                // Known name, wrong continuation: let the field report it.
                $(
                    if parser.read_named_field(stringify!($field)) {
                        return parser.nested(|parser| $crate::Decode::update(&mut self.$field, parser));
                    }
                )*
                ::core::result::Result::Err(parser.invalid_field())
            }
        }
    };
}

/// Defines a tagged union: one payload per variant, written under `.name`.
///
/// Variants are matched in declared order by their name *and* the first byte
/// their payload's encoding starts with, so `int` and `intBar` never shadow
/// each other.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::{decode_line, pathline_union, to_string};
///
/// pathline_union! {
///     #[derive(Debug, PartialEq)]
///     pub enum Message {
///         Int(i64) => "int",
///         IntBar(i64) => "intBar",
///         List(Vec<u8>) => "list",
///     }
/// }
///
/// assert_eq!(to_string(&Message::IntBar(5)).unwrap(), ".intBar=5\n");
/// assert_eq!(decode_line::<Message>(b".intBar=5\n").unwrap(), Message::IntBar(5));
/// assert_eq!(decode_line::<Message>(b".list[1]=2\n").unwrap(), Message::List(vec![0, 2]));
/// ```
#[macro_export]
macro_rules! pathline_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$first_meta:meta])*
            $first:ident($first_ty:ty) => $first_wire:literal
            $(
                ,
                $(#[$variant_meta:meta])*
                $variant:ident($ty:ty) => $wire:literal
            )*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(#[$first_meta])*
            $first($first_ty),
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )*
        }

        impl $name {
            /// Wire names of all variants, in declared order.
            pub const VARIANTS: &'static [&'static str] = &[$first_wire $(, $wire)*];

            /// Wire name of the active variant.
            pub fn variant_name(&self) -> &'static str {
                match self {
                    $name::$first(_) => $first_wire,
                    $($name::$variant(_) => $wire,)*
                }
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                match self {
                    $name::$first(inner) => serializer.serialize_newtype_variant(
                        stringify!($name),
                        0,
                        $first_wire,
                        inner,
                    ),
                    $(
                        $name::$variant(inner) => serializer.serialize_newtype_variant(
                            stringify!($name),
                            $crate::shape::variant_index(Self::VARIANTS, $wire),
                            $wire,
                            inner,
                        ),
                    )*
                }
            }
        }

        impl $crate::Decode for $name {
            const SHAPE: $crate::Shape = $crate::Shape::TaggedUnion;
            const LINE_BOUND: usize = $crate::shape::max_bound(&[
                1 + $first_wire.len() + <$first_ty as $crate::Decode>::LINE_BOUND
                $(, 1 + $wire.len() + <$ty as $crate::Decode>::LINE_BOUND)*
            ]);

            fn zero() -> Self {
                $name::$first(<$first_ty as $crate::Decode>::zero())
            }

            fn decode(parser: &mut $crate::Parser<'_>) -> $crate::Result<Self> {
                if parser.read_field_with_lead($first_wire, <$first_ty as $crate::Decode>::LEAD) {
                    return parser
                        .nested(<$first_ty as $crate::Decode>::decode)
                        .map($name::$first);
                }
                $(
                    if parser.read_field_with_lead($wire, <$ty as $crate::Decode>::LEAD) {
                        return parser
                            .nested(<$ty as $crate::Decode>::decode)
                            .map($name::$variant);
                    }
                )*
                ::core::result::Result::Err(parser.invalid_field())
            }

            fn update(&mut self, parser: &mut $crate::Parser<'_>) -> $crate::Result<()> {
                // Stay on the active variant when the line still belongs to it.
                let active = self.variant_name();
                match self {
                    $name::$first(inner) => {
                        if parser.read_field_with_lead($first_wire, <$first_ty as $crate::Decode>::LEAD) {
                            $crate::de::__private::union_fast_path(active, true);
                            return parser.nested(|parser| $crate::Decode::update(inner, parser));
                        }
                    }
                    $(
                        $name::$variant(inner) => {
                            if parser.read_field_with_lead($wire, <$ty as $crate::Decode>::LEAD) {
                                $crate::de::__private::union_fast_path(active, true);
                                return parser.nested(|parser| $crate::Decode::update(inner, parser));
                            }
                        }
                    )*
                }
                $crate::de::__private::union_fast_path(active, false);
                *self = <Self as $crate::Decode>::decode(parser)?;
                ::core::result::Result::Ok(())
            }
        }
    };
}

/// Defines a fieldless enum written as a scalar tag: `=name`.
///
/// With a `repr` type and a trailing `_ => Variant` arm the enum is
/// non-exhaustive: unknown values are kept as `Variant(raw)` and written back
/// as the raw integer. Decoding tries the tag names first and falls back to
/// the integer.
///
/// # Examples
///
/// ```rust
/// use serde_pathline::{decode_line, pathline_enum, to_string};
///
/// pathline_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Color { Red => "red", Green => "green" }
/// }
///
/// pathline_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Opcode: u16 { Ping = 1 => "ping", Pong = 2 => "pong", _ => Other }
/// }
///
/// assert_eq!(to_string(&Color::Green).unwrap(), "=green\n");
/// assert_eq!(decode_line::<Opcode>(b"=pong\n").unwrap(), Opcode::Pong);
/// assert_eq!(decode_line::<Opcode>(b"=1\n").unwrap(), Opcode::Ping);
/// assert_eq!(decode_line::<Opcode>(b"=77\n").unwrap(), Opcode::Other(77));
/// assert_eq!(to_string(&Opcode::Other(77)).unwrap(), "=77\n");
/// ```
#[macro_export]
macro_rules! pathline_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ty {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal => $wire:literal
            ),+ ,
            _ => $other:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            $other($repr),
        }

        impl $name {
            /// Tag names of the named variants, in declared order.
            pub const VARIANTS: &'static [&'static str] = &[$($wire),+];

            /// The backing integer of this value.
            pub fn to_raw(&self) -> $repr {
                match self {
                    $($name::$variant => $value,)+
                    $name::$other(raw) => *raw,
                }
            }

            /// Maps a backing integer to its named variant, if it has one.
            pub fn from_raw(raw: $repr) -> Self {
                match raw {
                    $($value => $name::$variant,)+
                    other => $name::$other(other),
                }
            }

            fn from_tag_index(i: usize) -> Self {
                match Self::VARIANTS[i] {
                    $($wire => $name::$variant,)+
                    _ => $name::$other(<$repr as $crate::Decode>::zero()),
                }
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                match self {
                    $(
                        $name::$variant => serializer.serialize_unit_variant(
                            stringify!($name),
                            $crate::shape::variant_index(Self::VARIANTS, $wire),
                            $wire,
                        ),
                    )+
                    $name::$other(raw) => $crate::serde::Serialize::serialize(raw, serializer),
                }
            }
        }

        impl $crate::Decode for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar($crate::shape::ScalarKind::Enum);
            const LINE_BOUND: usize = 1;

            fn zero() -> Self {
                Self::from_tag_index(0)
            }

            fn decode(parser: &mut $crate::Parser<'_>) -> $crate::Result<Self> {
                match parser.read_enum_value(Self::VARIANTS) {
                    ::core::result::Result::Ok(i) => ::core::result::Result::Ok(Self::from_tag_index(i)),
                    ::core::result::Result::Err($crate::Error::InvalidEnumValue { pos }) => parser
                        .read_int_value::<$repr>()
                        .map(Self::from_raw)
                        .map_err(|_| $crate::Error::InvalidEnumValue { pos }),
                    ::core::result::Result::Err(e) => ::core::result::Result::Err(e),
                }
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$first_meta:meta])*
            $first:ident => $first_wire:literal
            $(
                ,
                $(#[$variant_meta:meta])*
                $variant:ident => $wire:literal
            )*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(#[$first_meta])*
            $first,
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Tag names of all variants, in declared order.
            pub const VARIANTS: &'static [&'static str] = &[$first_wire $(, $wire)*];
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                match self {
                    $name::$first => {
                        serializer.serialize_unit_variant(stringify!($name), 0, $first_wire)
                    }
                    $(
                        $name::$variant => serializer.serialize_unit_variant(
                            stringify!($name),
                            $crate::shape::variant_index(Self::VARIANTS, $wire),
                            $wire,
                        ),
                    )*
                }
            }
        }

        impl $crate::Decode for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar($crate::shape::ScalarKind::Enum);
            const LINE_BOUND: usize = 1;

            fn zero() -> Self {
                $name::$first
            }

            fn decode(parser: &mut $crate::Parser<'_>) -> $crate::Result<Self> {
                let i = parser.read_enum_value(Self::VARIANTS)?;
                ::core::result::Result::Ok(match Self::VARIANTS[i] {
                    $($wire => $name::$variant,)*
                    _ => $name::$first,
                })
            }
        }
    };
}
