//! Pathline serialization.
//!
//! This module provides the [`Serializer`] implementation that turns any
//! `T: Serialize` into one `path=value` line per scalar leaf.
//!
//! ## Overview
//!
//! serde's data model doubles as the shape description:
//!
//! - **Structs** push `.field` per field
//! - **Newtype variants** push `.variant`; exactly one variant is ever written
//! - **Sequences and tuples** push `[i]` per element
//! - **Maps** push `[key]` for integer keys and `.key` for string keys, in the
//!   map's own iteration order
//! - **`None`** writes nothing; **`Some(v)`** writes `v` under the same path
//! - **Unit variants** are scalar enum values and write their name
//!
//! A single path buffer is reused for the whole walk: each segment is pushed
//! on the way down and truncated on the way back up, on error paths included.
//! A line reaches the sink only once it is fully composed.
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_pathline::Serializer;
//! use serde::Serialize;
//!
//! let mut serializer = Serializer::new(Vec::new());
//! vec![1, 2, 3].serialize(&mut serializer).unwrap();
//!
//! let text = String::from_utf8(serializer.into_inner()).unwrap();
//! assert_eq!(text, "[0]=1\n[1]=2\n[2]=3\n");
//! ```

use crate::{Error, Options, Result};
use serde::ser::{self, Impossible, Serialize};
use std::borrow::Cow;
use std::io::Write;

/// One path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// `.name`
    Field(Cow<'a, str>),
    /// `[literal]`, for map keys already rendered to text
    Index(Cow<'a, str>),
    /// `[n]`, for sequence positions
    Position(usize),
}

/// The pathline serializer.
///
/// Writes lines to any [`std::io::Write`] sink.
pub struct Serializer<W> {
    writer: W,
    path: Vec<u8>,
    line: Vec<u8>,
    depth: usize,
    options: Options,
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, Options::default())
    }

    pub fn with_options(writer: W, options: Options) -> Self {
        Serializer {
            writer,
            path: Vec::with_capacity(options.path_capacity),
            line: Vec::with_capacity(options.path_capacity),
            depth: 0,
            options,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Runs `f` with `segment` appended to the current path.
    ///
    /// The path is truncated back to its previous length on every exit of
    /// `f`, successful or not.
    pub fn with_segment<F>(&mut self, segment: Segment<'_>, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        let mark = self.path.len();
        self.push(&segment)?;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        self.path.truncate(mark);
        result
    }

    fn push(&mut self, segment: &Segment<'_>) -> Result<()> {
        match segment {
            Segment::Field(name) => {
                if name.bytes().any(|b| matches!(b, b'.' | b'[' | b'=' | b'\n')) {
                    return Err(Error::Unrepresentable(format!(
                        "field name {:?} contains a path delimiter",
                        name
                    )));
                }
                self.path.push(b'.');
                self.path.extend_from_slice(name.as_bytes());
            }
            Segment::Index(literal) => {
                if literal.bytes().any(|b| b == b']' || b == b'\n') {
                    return Err(Error::Unrepresentable(format!(
                        "index {:?} contains `]` or a newline",
                        literal
                    )));
                }
                self.path.push(b'[');
                self.path.extend_from_slice(literal.as_bytes());
                self.path.push(b']');
            }
            Segment::Position(n) => {
                self.path.push(b'[');
                self.path.extend_from_slice(n.to_string().as_bytes());
                self.path.push(b']');
            }
        }
        Ok(())
    }

    /// Writes `<path>=<value>\n` as a single write to the sink.
    fn emit(&mut self, value: &[u8]) -> Result<()> {
        if value.contains(&b'\n') {
            return Err(Error::unrepresentable("values cannot contain a newline"));
        }
        self.line.clear();
        self.line.extend_from_slice(&self.path);
        self.line.push(b'=');
        self.line.extend_from_slice(value);
        self.line.push(b'\n');
        trace!(
            "emit line {:?}",
            String::from_utf8_lossy(&self.line[..self.line.len() - 1])
        );
        self.writer
            .write_all(&self.line)
            .map_err(|e| Error::io(&e.to_string()))
    }

    fn emit_display(&mut self, value: impl std::fmt::Display) -> Result<()> {
        let text = value.to_string();
        self.emit(text.as_bytes())
    }
}

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a, W>;
    type SerializeTuple = SeqSerializer<'a, W>;
    type SerializeTupleStruct = SeqSerializer<'a, W>;
    type SerializeTupleVariant = VariantSerializer<'a, W>;
    type SerializeMap = MapSerializer<'a, W>;
    type SerializeStruct = StructSerializer<'a, W>;
    type SerializeStructVariant = VariantSerializer<'a, W>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.emit(if v { &b"true"[..] } else { &b"false"[..] })
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.emit_display(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.emit_display(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.emit_display(v)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.emit_display(v)
    }

    // `Display` for floats is the shortest text that parses back to the same
    // value and never uses exponent notation.
    fn serialize_f32(self, v: f32) -> Result<()> {
        self.emit_display(v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.emit_display(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.emit(v.encode_utf8(&mut buf).as_bytes())
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.emit(v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        use ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.emit(b"")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.with_segment(Segment::Field(Cow::Borrowed(variant)), |ser| {
            value.serialize(ser)
        })
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer { ser: self, index: 0 })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(SeqSerializer { ser: self, index: 0 })
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SeqSerializer { ser: self, index: 0 })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(VariantSerializer {
            ser: self,
            variant,
            index: 0,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self,
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer { ser: self })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(VariantSerializer {
            ser: self,
            variant,
            index: 0,
        })
    }
}

/// Sequences, tuples and tuple structs: one `[i]` segment per element.
pub struct SeqSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    index: usize,
}

impl<'a, W: Write> SeqSerializer<'a, W> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.index;
        self.index += 1;
        self.ser
            .with_segment(Segment::Position(index), |ser| value.serialize(ser))
    }
}

impl<'a, W: Write> ser::SerializeSeq for SeqSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> ser::SerializeTuple for SeqSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> ser::SerializeTupleStruct for SeqSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Tuple and struct variants: `.variant[i]` or `.variant.field` per element.
///
/// The variant segment is pushed per element rather than once for the whole
/// variant, so no path state outlives a single `serialize_*` call.
pub struct VariantSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    variant: &'static str,
    index: usize,
}

impl<'a, W: Write> ser::SerializeTupleVariant for VariantSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.index;
        self.index += 1;
        self.ser
            .with_segment(Segment::Field(Cow::Borrowed(self.variant)), |ser| {
                ser.with_segment(Segment::Position(index), |ser| value.serialize(ser))
            })
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> ser::SerializeStructVariant for VariantSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser
            .with_segment(Segment::Field(Cow::Borrowed(self.variant)), |ser| {
                ser.with_segment(Segment::Field(Cow::Borrowed(key)), |ser| {
                    value.serialize(ser)
                })
            })
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

pub struct StructSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
}

impl<'a, W: Write> ser::SerializeStruct for StructSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser
            .with_segment(Segment::Field(Cow::Borrowed(key)), |ser| {
                value.serialize(ser)
            })
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<()> {
        Ok(())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

pub struct MapSerializer<'a, W> {
    ser: &'a mut Serializer<W>,
    key: Option<Segment<'static>>,
}

impl<'a, W: Write> ser::SerializeMap for MapSerializer<'a, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.ser.with_segment(key, |ser| value.serialize(ser))
    }

    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<()>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        let key = key.serialize(KeySerializer)?;
        self.ser.with_segment(key, |ser| value.serialize(ser))
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Renders a map key as the segment that addresses its value.
///
/// Integer keys become `[k]`. Strings, `char`, `bool` and unit variants
/// become `.k`; all of them decode back except unit variants, which need a
/// hand-written [`DecodeKey`](crate::de::DecodeKey).
pub struct KeySerializer;

fn unsupported_key<T>(kind: &str) -> Result<T> {
    Err(Error::unsupported_type(&format!(
        "map keys must be integers or strings, found {}",
        kind
    )))
}

impl ser::Serializer for KeySerializer {
    type Ok = Segment<'static>;
    type Error = Error;

    type SerializeSeq = Impossible<Segment<'static>, Error>;
    type SerializeTuple = Impossible<Segment<'static>, Error>;
    type SerializeTupleStruct = Impossible<Segment<'static>, Error>;
    type SerializeTupleVariant = Impossible<Segment<'static>, Error>;
    type SerializeMap = Impossible<Segment<'static>, Error>;
    type SerializeStruct = Impossible<Segment<'static>, Error>;
    type SerializeStructVariant = Impossible<Segment<'static>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Ok(Segment::Field(Cow::Borrowed(if v { "true" } else { "false" })))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        Ok(Segment::Index(Cow::Owned(v.to_string())))
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok> {
        Ok(Segment::Index(Cow::Owned(v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        Ok(Segment::Index(Cow::Owned(v.to_string())))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok> {
        Ok(Segment::Index(Cow::Owned(v.to_string())))
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok> {
        unsupported_key("f32")
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok> {
        unsupported_key("f64")
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(Segment::Field(Cow::Owned(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Segment::Field(Cow::Owned(v.to_owned())))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok> {
        unsupported_key("bytes")
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        unsupported_key("none")
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        unsupported_key("unit")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        unsupported_key("unit struct")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Segment::Field(Cow::Borrowed(variant)))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        unsupported_key("newtype variant")
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        unsupported_key("sequence")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        unsupported_key("tuple")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        unsupported_key("tuple struct")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        unsupported_key("tuple variant")
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        unsupported_key("map")
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        unsupported_key("struct")
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        unsupported_key("struct variant")
    }
}
