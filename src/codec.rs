//! Typed payload codec
//!
//! Converts between generic JSON values and typed payloads. Decoding never
//! fails: a value that does not fit the target type comes back as
//! [`Built::Raw`], so responses that grow new shapes keep working for callers
//! that only read what they know.

use serde::Serialize;
use serde::de::{self, DeserializeOwned, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

use crate::error::{ClientError, Result};

/// Outcome of decoding a generic value into `T`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Built<T> {
    /// The value matched `T` (strictly or after lax coercion)
    Typed(T),
    /// The value did not match `T` and is returned unchanged
    Raw(Value),
}

impl<T> Built<T> {
    /// Whether decoding produced a typed value
    #[must_use]
    pub const fn is_typed(&self) -> bool {
        matches!(self, Self::Typed(_))
    }

    /// The typed value, if any
    #[must_use]
    pub fn typed(self) -> Option<T> {
        match self {
            Self::Typed(t) => Some(t),
            Self::Raw(_) => None,
        }
    }

    /// Borrow the typed value, if any
    #[must_use]
    pub const fn as_typed(&self) -> Option<&T> {
        match self {
            Self::Typed(t) => Some(t),
            Self::Raw(_) => None,
        }
    }

    /// Map the typed value, leaving a raw value untouched
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Built<U> {
        match self {
            Self::Typed(t) => Built::Typed(f(t)),
            Self::Raw(v) => Built::Raw(v),
        }
    }
}

impl<T: DeserializeOwned> Built<T> {
    /// The typed value, or the decoding error that made it raw
    pub fn require(self) -> Result<T> {
        match self {
            Self::Typed(t) => Ok(t),
            Self::Raw(v) => serde_json::from_value(v).map_err(ClientError::from),
        }
    }
}

/// Reduce a typed value to its generic JSON form
pub fn to_jsonable<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Decode a generic value into `T`
///
/// Tries strict decoding first, then a lax pass where fields that expect
/// numbers or booleans also accept them spelled as strings; when both fail
/// the original value is returned as [`Built::Raw`].
#[must_use]
pub fn build<T: DeserializeOwned>(value: Value) -> Built<T> {
    if let Ok(typed) = serde_json::from_value::<T>(value.clone()) {
        return Built::Typed(typed);
    }
    match T::deserialize(Lax(value.clone())) {
        Ok(typed) => {
            log::trace!("payload decoded after lax coercion");
            Built::Typed(typed)
        },
        Err(_) => Built::Raw(value),
    }
}

// =============================================================================
// LAX DECODING
// =============================================================================

/// Deserializer over a JSON value that coerces scalars towards the type asked for
///
/// Only the target type decides what is coerced: a field expecting an integer
/// accepts `"10"` or `10.0`, one expecting a boolean accepts `"true"`, and a
/// string field keeps `"68688"` as is. Null object entries are skipped so
/// defaulted fields apply.
struct Lax(Value);

/// Integer spelled as a string, or an integral float
#[allow(clippy::cast_possible_truncation)]
fn lax_integer(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(Value::from)
                .or_else(|_| s.parse::<u64>().map(Value::from))
                .ok()
        },
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| Value::from(f as i64)),
        _ => None,
    }
}

fn lax_float(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

fn lax_bool(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => match s.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

macro_rules! coerce_with {
    ($coerce:ident => $($method:ident)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> serde_json::Result<V::Value> {
            $coerce(&self.0).unwrap_or(self.0).$method(visitor)
        }
    )*};
}

macro_rules! delegate {
    ($($method:ident)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> serde_json::Result<V::Value> {
            self.0.$method(visitor)
        }
    )*};
}

impl<'de> Deserializer<'de> for Lax {
    type Error = serde_json::Error;

    coerce_with!(lax_integer =>
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64);
    coerce_with!(lax_float => deserialize_f32 deserialize_f64);
    coerce_with!(lax_bool => deserialize_bool);
    delegate!(
        deserialize_char deserialize_str deserialize_string deserialize_bytes
        deserialize_byte_buf deserialize_unit deserialize_identifier deserialize_ignored_any
    );

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> serde_json::Result<V::Value> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(LaxMap::new(map)),
            Value::Array(items) => visitor.visit_seq(LaxSeq(items.into_iter())),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> serde_json::Result<V::Value> {
        if self.0.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> serde_json::Result<V::Value> {
        self.0.deserialize_unit_struct(name, visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> serde_json::Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> serde_json::Result<V::Value> {
        match self.0 {
            Value::Array(items) => visitor.visit_seq(LaxSeq(items.into_iter())),
            other => other.deserialize_seq(visitor),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> serde_json::Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> serde_json::Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> serde_json::Result<V::Value> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(LaxMap::new(map)),
            other => other.deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> serde_json::Result<V::Value> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(LaxMap::new(map)),
            other => other.deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> serde_json::Result<V::Value> {
        self.0.deserialize_enum(name, variants, visitor)
    }
}

struct LaxSeq(std::vec::IntoIter<Value>);

impl<'de> SeqAccess<'de> for LaxSeq {
    type Error = serde_json::Error;

    fn next_element_seed<S: DeserializeSeed<'de>>(
        &mut self,
        seed: S,
    ) -> serde_json::Result<Option<S::Value>> {
        self.0.next().map(|item| seed.deserialize(Lax(item))).transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

struct LaxMap {
    entries: serde_json::map::IntoIter,
    pending: Option<Value>,
}

impl LaxMap {
    fn new(map: Map<String, Value>) -> Self {
        Self {
            entries: map.into_iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for LaxMap {
    type Error = serde_json::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> serde_json::Result<Option<K::Value>> {
        match self.entries.find(|(_, value)| !value.is_null()) {
            Some((key, value)) => {
                self.pending = Some(value);
                // keys go through `Lax` too so numeric map keys parse
                seed.deserialize(Lax(Value::String(key))).map(Some)
            },
            None => Ok(None),
        }
    }

    fn next_value_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> serde_json::Result<S::Value> {
        let value = self
            .pending
            .take()
            .ok_or_else(|| <serde_json::Error as de::Error>::custom("map value requested before its key"))?;
        seed.deserialize(Lax(value))
    }
}
