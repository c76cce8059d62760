//! Type-directed encoder dispatch and per-type serializers.
//!
//! [`Value`] is a strictly owned tree — unlike a host object graph, it
//! cannot structurally contain a reference cycle. The recursion guard below
//! still exists because `encode_value` recurses on the native call stack;
//! a pathologically deep (but acyclic) tree must fail cleanly rather than
//! overflow the stack, which is the same failure mode a true cycle would
//! produce. Host bindings that build a `Value` from a graph capable of real
//! aliasing (e.g. a Python object graph) must detect cycles *before*
//! conversion, by tracking visited object identities — see `xjson-py`.

use alloc::string::String;
use alloc::vec::Vec;

use crate::buffer::Buffer;
use crate::datetime::{encode_datetime, encode_time, write_date};
use crate::error::EncodeError;
use crate::numbers::{format_float, format_integer, Integer};
use crate::numeric_array::NumericData;
use crate::options::EncodeOptions;
use crate::strings::escape_into;
use crate::value::{Object, Value};

/// A user-supplied function invoked once per value the dispatcher has no
/// native serializer for; its return value is re-dispatched.
pub type Fallback<'a> = dyn Fn(&Value) -> Option<Value> + 'a;

const FALLBACK_DEPTH_LIMIT: u32 = 5;
/// Containers nested deeper than this fail with [`EncodeError::ReferenceCycle`],
/// standing in for true cycle detection on this crate's owned tree (see
/// module docs).
const CONTAINER_DEPTH_LIMIT: u32 = 2048;

/// Encode `value` to a freshly allocated, compact UTF-8 JSON byte buffer.
pub fn encode(
    value: &Value,
    fallback: Option<&Fallback<'_>>,
    options: u32,
) -> Result<Vec<u8>, EncodeError> {
    let options = EncodeOptions::from_bits(options)?;
    let mut buf = Buffer::new();
    let mut ctx = Ctx { options, fallback };
    ctx.encode_value(&mut buf, value, 0, 0)?;
    if options.append_newline() {
        buf.push_byte(b'\n');
    }
    Ok(buf.finish())
}

struct Ctx<'a> {
    options: EncodeOptions,
    fallback: Option<&'a Fallback<'a>>,
}

impl<'a> Ctx<'a> {
    fn encode_value(
        &mut self,
        buf: &mut Buffer,
        value: &Value,
        container_depth: u32,
        fallback_depth: u32,
    ) -> Result<(), EncodeError> {
        match value {
            Value::Null => {
                buf.push_bytes(b"null");
                Ok(())
            }
            Value::Bool(b) => {
                buf.push_bytes(if *b { b"true" } else { b"false" });
                Ok(())
            }
            Value::Int(i) => self.encode_integer(buf, *i),
            Value::Float(f) => {
                self.encode_float(buf, *f);
                Ok(())
            }
            Value::Str(s) => {
                encode_string_value(buf, s);
                Ok(())
            }
            Value::Array(items) => self.encode_array(buf, items, container_depth, fallback_depth),
            Value::Object(obj) => self.encode_object(buf, obj, container_depth, fallback_depth),
            Value::Date(d) => {
                let mut s = String::new();
                write_date(&mut s, *d);
                buf.push_byte(b'"');
                buf.push_str(&s);
                buf.push_byte(b'"');
                Ok(())
            }
            Value::Time(t) => {
                if self.options.passthrough_datetime() {
                    return self.dispatch_fallback(buf, value, container_depth, fallback_depth);
                }
                let mut s = String::new();
                encode_time(&mut s, *t, self.options)?;
                buf.push_byte(b'"');
                buf.push_str(&s);
                buf.push_byte(b'"');
                Ok(())
            }
            Value::DateTime(dt) => {
                if self.options.passthrough_datetime() {
                    return self.dispatch_fallback(buf, value, container_depth, fallback_depth);
                }
                let mut s = String::new();
                encode_datetime(&mut s, *dt, self.options)?;
                buf.push_byte(b'"');
                buf.push_str(&s);
                buf.push_byte(b'"');
                Ok(())
            }
            Value::Uuid(u) => {
                let mut tmp = [0u8; 36];
                let s = u.hyphenated().encode_lower(&mut tmp);
                buf.push_byte(b'"');
                buf.push_str(s);
                buf.push_byte(b'"');
                Ok(())
            }
            Value::Record(rec) => {
                self.encode_record(buf, rec, container_depth, fallback_depth)
            }
            Value::Fragment(frag) => {
                buf.push_bytes(&frag.0);
                Ok(())
            }
            Value::NumericArray(arr) => {
                if !self.options.serialize_numeric_arrays() {
                    return Err(EncodeError::NumericArraysDisabled);
                }
                encode_numeric_array(buf, arr)
            }
        }
    }

    fn encode_integer(&self, buf: &mut Buffer, i: Integer) -> Result<(), EncodeError> {
        if self.options.strict_integer() {
            let magnitude = i.as_i128();
            const SAFE: i128 = (1i128 << 53) - 1;
            if !(-SAFE..=SAFE).contains(&magnitude) {
                return Err(EncodeError::StrictIntegerRange(magnitude));
            }
        }
        let mut s = String::new();
        format_integer(i, &mut s);
        buf.push_str(&s);
        Ok(())
    }

    fn encode_float(&self, buf: &mut Buffer, f: f64) {
        if f.is_finite() {
            let mut s = String::new();
            format_float(f, &mut s);
            buf.push_str(&s);
        } else {
            buf.push_bytes(b"null");
        }
    }

    fn encode_array(
        &mut self,
        buf: &mut Buffer,
        items: &[Value],
        container_depth: u32,
        fallback_depth: u32,
    ) -> Result<(), EncodeError> {
        if container_depth >= CONTAINER_DEPTH_LIMIT {
            return Err(EncodeError::ReferenceCycle);
        }
        let indent = self.options.indent_2();
        buf.push_byte(b'[');
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                buf.push_byte(b',');
            }
            if indent {
                push_indent(buf, container_depth + 1);
            }
            self.encode_value(buf, item, container_depth + 1, fallback_depth)?;
        }
        if indent && !items.is_empty() {
            push_indent(buf, container_depth);
        }
        buf.push_byte(b']');
        Ok(())
    }

    fn encode_object(
        &mut self,
        buf: &mut Buffer,
        obj: &Object,
        container_depth: u32,
        fallback_depth: u32,
    ) -> Result<(), EncodeError> {
        if container_depth >= CONTAINER_DEPTH_LIMIT {
            return Err(EncodeError::ReferenceCycle);
        }

        let mut entries: Vec<(&str, &Value)> =
            obj.0.iter().map(|(k, v)| (k.as_str(), v)).collect();
        if self.options.sort_keys() {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }

        let indent = self.options.indent_2();
        buf.push_byte(b'{');
        for (idx, (key, val)) in entries.iter().enumerate() {
            if idx > 0 {
                buf.push_byte(b',');
            }
            if indent {
                push_indent(buf, container_depth + 1);
            }
            encode_string_value(buf, key);
            buf.push_byte(b':');
            if indent {
                buf.push_byte(b' ');
            }
            self.encode_value(buf, val, container_depth + 1, fallback_depth)?;
        }
        if indent && !entries.is_empty() {
            push_indent(buf, container_depth);
        }
        buf.push_byte(b'}');
        Ok(())
    }

    fn encode_record(
        &mut self,
        buf: &mut Buffer,
        rec: &crate::record::Record,
        container_depth: u32,
        fallback_depth: u32,
    ) -> Result<(), EncodeError> {
        if container_depth >= CONTAINER_DEPTH_LIMIT {
            return Err(EncodeError::ReferenceCycle);
        }
        let indent = self.options.indent_2();
        buf.push_byte(b'{');
        for (idx, (name, val)) in rec.fields.iter().enumerate() {
            if idx > 0 {
                buf.push_byte(b',');
            }
            if indent {
                push_indent(buf, container_depth + 1);
            }
            encode_string_value(buf, name);
            buf.push_byte(b':');
            if indent {
                buf.push_byte(b' ');
            }
            self.encode_value(buf, val, container_depth + 1, fallback_depth)?;
        }
        if indent && !rec.fields.is_empty() {
            push_indent(buf, container_depth);
        }
        buf.push_byte(b'}');
        Ok(())
    }

    fn dispatch_fallback(
        &mut self,
        buf: &mut Buffer,
        value: &Value,
        container_depth: u32,
        fallback_depth: u32,
    ) -> Result<(), EncodeError> {
        if fallback_depth >= FALLBACK_DEPTH_LIMIT {
            return Err(EncodeError::FallbackRecursionLimit {
                limit: FALLBACK_DEPTH_LIMIT,
            });
        }
        let Some(f) = self.fallback else {
            return Err(EncodeError::UnsupportedType);
        };
        match f(value) {
            Some(replacement) => {
                self.encode_value(buf, &replacement, container_depth, fallback_depth + 1)
            }
            None => Err(EncodeError::UnsupportedType),
        }
    }
}

/// Push a newline followed by `depth * 2` spaces, for `INDENT_2` mode.
fn push_indent(buf: &mut Buffer, depth: u32) {
    buf.push_byte(b'\n');
    for _ in 0..depth {
        buf.push_bytes(b"  ");
    }
}

fn encode_string_value(buf: &mut Buffer, s: &str) {
    escape_into(buf, s);
}

fn encode_numeric_array(
    buf: &mut Buffer,
    arr: &crate::numeric_array::NumericArray,
) -> Result<(), EncodeError> {
    if !arr.is_well_formed() {
        return Err(EncodeError::UnsupportedType);
    }
    let mut cursor = 0usize;
    write_nested(buf, &arr.shape, &arr.data, &mut cursor);
    Ok(())
}

fn write_nested(buf: &mut Buffer, shape: &[usize], data: &NumericData, cursor: &mut usize) {
    match shape {
        [] => {
            write_scalar(buf, data, *cursor);
            *cursor += 1;
        }
        [n, rest @ ..] => {
            buf.push_byte(b'[');
            for i in 0..*n {
                if i > 0 {
                    buf.push_byte(b',');
                }
                write_nested(buf, rest, data, cursor);
            }
            buf.push_byte(b']');
        }
    }
}

fn write_scalar(buf: &mut Buffer, data: &NumericData, idx: usize) {
    let mut s = String::new();
    match data {
        NumericData::I32(v) => format_integer(Integer::Signed(i64::from(v[idx])), &mut s),
        NumericData::I64(v) => format_integer(Integer::Signed(v[idx]), &mut s),
        NumericData::U8(v) => format_integer(Integer::Unsigned(u64::from(v[idx])), &mut s),
        NumericData::U32(v) => format_integer(Integer::Unsigned(u64::from(v[idx])), &mut s),
        NumericData::U64(v) => format_integer(Integer::Unsigned(v[idx]), &mut s),
        NumericData::F32(v) => {
            let f = f64::from(v[idx]);
            if f.is_finite() {
                format_float(f, &mut s);
            } else {
                s.push_str("null");
            }
        }
        NumericData::F64(v) => {
            let f = v[idx];
            if f.is_finite() {
                format_float(f, &mut s);
            } else {
                s.push_str("null");
            }
        }
    }
    buf.push_str(&s);
}
