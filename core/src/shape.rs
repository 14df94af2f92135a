//! JSON shape check for outgoing payloads.
//!
//! # Design
//! `serde_json` quietly writes non-finite floats as `null` and byte blobs as
//! number arrays. `check` walks a value with a serializer that produces
//! nothing and fails on both, so such payloads are refused instead of being
//! sent as something else. Map key shapes are left to `serde_json`.

use serde::ser::{self, Error as _, Serialize};

type Result<T = ()> = std::result::Result<T, serde_json::Error>;

/// Fail if `value` holds anything JSON cannot represent.
pub(crate) fn check<T>(value: &T) -> Result
where
    T: Serialize + ?Sized,
{
    value.serialize(JsonShape)
}

struct JsonShape;

fn finite(v: f64) -> Result {
    if v.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!("{v} is not a JSON number")))
    }
}

impl ser::Serializer for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Result {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Result {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Result {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result {
        finite(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result {
        finite(v)
    }

    fn serialize_char(self, _: char) -> Result {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result {
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result {
        Err(serde_json::Error::custom(format!(
            "{} bytes of binary data are not a JSON document",
            v.len()
        )))
    }

    fn serialize_none(self) -> Result {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Result {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _: &'static str, value: &T) -> Result {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(self, _: &'static str, _: u32, _: &'static str, _: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self> {
        Ok(self)
    }

    fn serialize_struct_variant(self, _: &'static str, _: u32, _: &'static str, _: usize) -> Result<Self> {
        Ok(self)
    }
}

impl ser::SerializeSeq for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        check(value)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeTuple for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        check(value)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        check(value)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        check(value)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeMap for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _: &T) -> Result {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result {
        check(value)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeStruct for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Result {
        check(value)
    }

    fn end(self) -> Result {
        Ok(())
    }
}

impl ser::SerializeStructVariant for JsonShape {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Result {
        check(value)
    }

    fn end(self) -> Result {
        Ok(())
    }
}
