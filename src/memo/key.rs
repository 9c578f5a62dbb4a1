//! Argument normalization: turn call arguments into a hashable, order-independent key.
//!
//! Arguments are frozen by serializing them straight into [`FrozenArg`]. Maps become
//! sorted maps (keys keep their own type), sequences stay ordered, strings are kept whole.
//! Non-finite floats have no stable identity and are rejected.

use crate::core::YfError;
use serde::Serialize;
use serde::ser::{self, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;

/// An immutable, hashable form of one argument.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrozenArg {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Bit pattern of a finite float; `-0.0` is folded into `0.0`.
    Float(u64),
    Str(String),
    Seq(Vec<FrozenArg>),
    Map(BTreeMap<FrozenArg, FrozenArg>),
}

impl FrozenArg {
    /// Freeze `value`.
    ///
    /// # Errors
    ///
    /// Returns [`YfError::Unhashable`] if `value` holds a NaN or infinite float, or if its
    /// `Serialize` impl fails.
    pub fn freeze<T: Serialize + ?Sized>(value: &T) -> Result<Self, YfError> {
        value.serialize(Freezer)
    }

    fn str(s: &str) -> Self {
        Self::Str(s.to_owned())
    }

    fn variant(name: &'static str, inner: Self) -> Self {
        Self::Map(BTreeMap::from([(Self::str(name), inner)]))
    }
}

impl ser::Error for YfError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Unhashable(msg.to_string())
    }
}

/// Serializer whose output is a [`FrozenArg`]. Enums use the externally tagged shape.
struct Freezer;

impl Serializer for Freezer {
    type Ok = FrozenArg;
    type Error = YfError;
    type SerializeSeq = SeqFreezer;
    type SerializeTuple = SeqFreezer;
    type SerializeTupleStruct = SeqFreezer;
    type SerializeTupleVariant = VariantFreezer<SeqFreezer>;
    type SerializeMap = MapFreezer;
    type SerializeStruct = MapFreezer;
    type SerializeStructVariant = VariantFreezer<MapFreezer>;

    fn serialize_bool(self, v: bool) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<FrozenArg, YfError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<FrozenArg, YfError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<FrozenArg, YfError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<FrozenArg, YfError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<FrozenArg, YfError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<FrozenArg, YfError> {
        self.serialize_u64(u64::from(v))
    }

    // unsigned values that fit share a key with the same signed value
    fn serialize_u64(self, v: u64) -> Result<FrozenArg, YfError> {
        Ok(i64::try_from(v).map_or(FrozenArg::UInt(v), FrozenArg::Int))
    }

    fn serialize_f32(self, v: f32) -> Result<FrozenArg, YfError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<FrozenArg, YfError> {
        if !v.is_finite() {
            return Err(YfError::Unhashable(format!("non-finite float {v}")));
        }
        let v = if v == 0.0 { 0.0_f64 } else { v };
        Ok(FrozenArg::Float(v.to_bits()))
    }

    fn serialize_char(self, v: char) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::str(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Seq(
            v.iter().map(|b| FrozenArg::Int(i64::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<FrozenArg, YfError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::str(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<FrozenArg, YfError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::variant(variant, value.serialize(Freezer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqFreezer, YfError> {
        Ok(SeqFreezer(Vec::with_capacity(len.unwrap_or(0))))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqFreezer, YfError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqFreezer, YfError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantFreezer<SeqFreezer>, YfError> {
        Ok(VariantFreezer {
            variant,
            inner: SeqFreezer(Vec::with_capacity(len)),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapFreezer, YfError> {
        Ok(MapFreezer::default())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<MapFreezer, YfError> {
        Ok(MapFreezer::default())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantFreezer<MapFreezer>, YfError> {
        Ok(VariantFreezer {
            variant,
            inner: MapFreezer::default(),
        })
    }
}

struct SeqFreezer(Vec<FrozenArg>);

impl SeqFreezer {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), YfError> {
        self.0.push(value.serialize(Freezer)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqFreezer {
    type Ok = FrozenArg;
    type Error = YfError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), YfError> {
        self.push(value)
    }

    fn end(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Seq(self.0))
    }
}

impl ser::SerializeTuple for SeqFreezer {
    type Ok = FrozenArg;
    type Error = YfError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), YfError> {
        self.push(value)
    }

    fn end(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Seq(self.0))
    }
}

impl ser::SerializeTupleStruct for SeqFreezer {
    type Ok = FrozenArg;
    type Error = YfError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), YfError> {
        self.push(value)
    }

    fn end(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Seq(self.0))
    }
}

#[derive(Default)]
struct MapFreezer {
    map: BTreeMap<FrozenArg, FrozenArg>,
    next_key: Option<FrozenArg>,
}

impl MapFreezer {
    fn insert<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<(), YfError> {
        self.map.insert(FrozenArg::str(key), value.serialize(Freezer)?);
        Ok(())
    }
}

impl ser::SerializeMap for MapFreezer {
    type Ok = FrozenArg;
    type Error = YfError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), YfError> {
        self.next_key = Some(key.serialize(Freezer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), YfError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| YfError::Unhashable("map value without a key".into()))?;
        self.map.insert(key, value.serialize(Freezer)?);
        Ok(())
    }

    fn end(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Map(self.map))
    }
}

impl ser::SerializeStruct for MapFreezer {
    type Ok = FrozenArg;
    type Error = YfError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), YfError> {
        self.insert(key, value)
    }

    fn end(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::Map(self.map))
    }
}

struct VariantFreezer<I> {
    variant: &'static str,
    inner: I,
}

impl ser::SerializeTupleVariant for VariantFreezer<SeqFreezer> {
    type Ok = FrozenArg;
    type Error = YfError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), YfError> {
        self.inner.push(value)
    }

    fn end(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::variant(self.variant, FrozenArg::Seq(self.inner.0)))
    }
}

impl ser::SerializeStructVariant for VariantFreezer<MapFreezer> {
    type Ok = FrozenArg;
    type Error = YfError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), YfError> {
        self.inner.insert(key, value)
    }

    fn end(self) -> Result<FrozenArg, YfError> {
        Ok(FrozenArg::variant(
            self.variant,
            FrozenArg::Map(self.inner.map),
        ))
    }
}

/// A normalized call: positional arguments in order, keyword arguments by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallKey {
    args: Vec<FrozenArg>,
    kwargs: BTreeMap<String, FrozenArg>,
}

/// Collects the arguments of a memoized call.
///
/// Serialization errors are held until [`CallArgs::freeze`] so the builder chain stays infallible.
///
/// ```
/// # use std::collections::HashMap;
/// # use yfinance_data::CallArgs;
/// let mut params = HashMap::new();
/// params.insert("modules", "price");
/// let key = CallArgs::new()
///     .arg("https://example.invalid")
///     .kwarg("params", &params)
///     .freeze()
///     .unwrap();
/// # let _ = key;
/// ```
#[derive(Debug, Default)]
pub struct CallArgs {
    args: Vec<FrozenArg>,
    kwargs: BTreeMap<String, FrozenArg>,
    error: Option<YfError>,
}

impl CallArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match FrozenArg::freeze(value) {
            Ok(v) => self.args.push(v),
            Err(e) => self.remember(e),
        }
        self
    }

    /// Set a keyword argument. Keyword order does not affect the key.
    #[must_use]
    pub fn kwarg<T: Serialize + ?Sized>(mut self, name: &str, value: &T) -> Self {
        match FrozenArg::freeze(value) {
            Ok(v) => {
                self.kwargs.insert(name.to_string(), v);
            }
            Err(e) => self.remember(e),
        }
        self
    }

    fn remember(&mut self, e: YfError) {
        if self.error.is_none() {
            self.error = Some(e);
        }
    }

    /// Finish normalization.
    ///
    /// # Errors
    ///
    /// Returns the first [`YfError::Unhashable`] raised while adding arguments.
    pub fn freeze(self) -> Result<CallKey, YfError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(CallKey {
                args: self.args,
                kwargs: self.kwargs,
            }),
        }
    }
}


