//! Conversion between Python objects and [`xjson::Value`].
//!
//! Two directions, two very different shapes:
//!
//! - `to_value` walks a Python object graph (which *can* contain real
//!   reference cycles, unlike `xjson::Value`) and builds an owned `Value`
//!   tree, detecting cycles via a stack of visited object identities before
//!   a cycle could cause unbounded recursion.
//! - `from_value` walks an already-decoded `Value` tree (acyclic by
//!   construction) and builds the corresponding Python objects.

use pyo3::exceptions::PyTypeError;
use pyo3::types::{
    PyBool, PyDate, PyDateAccess, PyDateTime, PyDict, PyFloat, PyInt, PyList, PyString, PyTime,
    PyTimeAccess, PyTuple,
};
use pyo3::prelude::*;

use xjson::{bits, DateTime as XDateTime, EncodeOptions, Fragment, Integer, Object, Record, TimeValue, Value};

use crate::exceptions::encode_error_from;
use crate::fragment::PyFragment;

const MAX_FALLBACK_DEPTH: u32 = 5;

pub struct Encoder<'py> {
    pub py: Python<'py>,
    pub default: Option<Py<PyAny>>,
    pub options: EncodeOptions,
    seen: Vec<usize>,
}

impl<'py> Encoder<'py> {
    pub fn new(py: Python<'py>, default: Option<Py<PyAny>>, options: EncodeOptions) -> Self {
        Self {
            py,
            default,
            options,
            seen: Vec::new(),
        }
    }

    pub fn convert(&mut self, obj: &Bound<'py, PyAny>) -> PyResult<Value> {
        self.convert_with_depth(obj, 0)
    }

    fn convert_with_depth(&mut self, obj: &Bound<'py, PyAny>, fallback_depth: u32) -> PyResult<Value> {
        if obj.is_none() {
            return Ok(Value::Null);
        }
        // `bool` is a subclass of `int` in Python; it must be checked first.
        if let Ok(b) = obj.downcast_exact::<PyBool>() {
            return Ok(Value::Bool(b.is_true()));
        }
        if let Ok(i) = obj.downcast_exact::<PyInt>() {
            return self.convert_int(i);
        }
        if let Ok(f) = obj.downcast_exact::<PyFloat>() {
            return Ok(Value::Float(f.value()));
        }
        if let Ok(s) = obj.downcast_exact::<PyString>() {
            let text: String = s
                .extract()
                .map_err(|_| encode_error_from(xjson::EncodeError::UnpairedSurrogate))?;
            return Ok(Value::Str(text));
        }
        if let Ok(frag) = obj.extract::<PyRef<'_, PyFragment>>() {
            return Ok(Value::Fragment(Fragment::new(frag.bytes.clone())));
        }
        if let Ok(dt) = obj.downcast_exact::<PyDateTime>() {
            if self.options.passthrough_datetime() {
                return self.dispatch_default(
                    obj,
                    fallback_depth,
                    xjson::EncodeError::UnsupportedType,
                );
            }
            return Ok(Value::DateTime(pydatetime_to_value(dt)?));
        }
        if let Ok(d) = obj.downcast_exact::<PyDate>() {
            if self.options.passthrough_datetime() {
                return self.dispatch_default(
                    obj,
                    fallback_depth,
                    xjson::EncodeError::UnsupportedType,
                );
            }
            return Ok(Value::Date(pydate_to_value(d)?));
        }
        if let Ok(t) = obj.downcast_exact::<PyTime>() {
            if self.options.passthrough_datetime() {
                return self.dispatch_default(
                    obj,
                    fallback_depth,
                    xjson::EncodeError::UnsupportedType,
                );
            }
            return Ok(Value::Time(pytime_to_value(t)?));
        }
        if let Ok(u) = uuid_from_object(obj)? {
            return Ok(Value::Uuid(u));
        }
        if obj.downcast_exact::<PyList>().is_ok() || obj.downcast_exact::<PyTuple>().is_ok() {
            return self.convert_sequence(obj, fallback_depth);
        }
        if let Ok(dict) = obj.downcast_exact::<PyDict>() {
            return self.convert_mapping(dict, fallback_depth);
        }
        if is_dataclass(obj)? {
            return self.convert_dataclass(obj, fallback_depth);
        }

        // Nothing matched by exact type. A subclass of str/int/list/dict is
        // still serializable by its parent's rule unless PASSTHROUGH_SUBCLASS
        // routes it to the fallback instead; subclasses of float and tuple
        // are never auto-serialized either way (§4.6).
        if !self.options.passthrough_subclass() {
            if obj.is_instance_of::<PyString>() {
                let s = obj.downcast::<PyString>().expect("is_instance_of::<PyString>");
                let text: String = s
                    .extract()
                    .map_err(|_| encode_error_from(xjson::EncodeError::UnpairedSurrogate))?;
                return Ok(Value::Str(text));
            }
            if obj.is_instance_of::<PyInt>() {
                let i = obj.downcast::<PyInt>().expect("is_instance_of::<PyInt>");
                return self.convert_int(i);
            }
            if obj.is_instance_of::<PyList>() {
                return self.convert_sequence(obj, fallback_depth);
            }
            if obj.is_instance_of::<PyDict>() {
                let dict = obj.downcast::<PyDict>().expect("is_instance_of::<PyDict>");
                return self.convert_mapping(dict, fallback_depth);
            }

            return self.dispatch_default(obj, fallback_depth, xjson::EncodeError::UnsupportedType);
        }

        // PASSTHROUGH_SUBCLASS is set: a subclass of one of these four types
        // is deliberately NOT serialized by its parent's rule and is routed
        // to the fallback instead, distinct from a genuinely unknown type.
        if obj.is_instance_of::<PyString>()
            || obj.is_instance_of::<PyInt>()
            || obj.is_instance_of::<PyList>()
            || obj.is_instance_of::<PyDict>()
        {
            return self.dispatch_default(
                obj,
                fallback_depth,
                xjson::EncodeError::SubclassUnderPassthrough,
            );
        }

        self.dispatch_default(obj, fallback_depth, xjson::EncodeError::UnsupportedType)
    }

    fn convert_int(&self, i: &Bound<'py, PyInt>) -> PyResult<Value> {
        // A Python int too large even for i128 is certainly outside the
        // 64-bit window; `UnsupportedType` is used here rather than
        // `IntegerOutOfRange` since the offending magnitude can't be
        // represented to put in the error.
        let magnitude: i128 = i
            .extract()
            .map_err(|_| encode_error_from(xjson::EncodeError::UnsupportedType))?;
        if magnitude < 0 {
            if magnitude < -(1i128 << 63) {
                return Err(encode_error_from(xjson::EncodeError::IntegerOutOfRange(
                    magnitude,
                )));
            }
            #[allow(clippy::cast_possible_truncation)]
            Ok(Value::Int(Integer::Signed(magnitude as i64)))
        } else {
            if magnitude > i128::from(u64::MAX) {
                return Err(encode_error_from(xjson::EncodeError::IntegerOutOfRange(
                    magnitude,
                )));
            }
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            Ok(Value::Int(Integer::Unsigned(magnitude as u64)))
        }
    }

    fn convert_sequence(&mut self, obj: &Bound<'py, PyAny>, fallback_depth: u32) -> PyResult<Value> {
        self.enter(obj)?;
        let mut items = Vec::new();
        for item in obj.try_iter()? {
            items.push(self.convert_with_depth(&item?, fallback_depth)?);
        }
        self.exit(obj);
        Ok(Value::Array(items))
    }

    fn convert_mapping(&mut self, dict: &Bound<'py, PyDict>, fallback_depth: u32) -> PyResult<Value> {
        self.enter(dict.as_any())?;
        let mut obj = Object::with_capacity(dict.len());
        for (k, v) in dict.iter() {
            let key = self.convert_key(&k)?;
            let value = self.convert_with_depth(&v, fallback_depth)?;
            obj.push(key, value);
        }
        self.exit(dict.as_any());
        Ok(Value::Object(obj))
    }

    /// Coerce a non-string key under `NON_STR_KEYS`. This dispatches on the
    /// key's *value kind*, not its exact-vs-subclass type identity:
    /// `PASSTHROUGH_SUBCLASS` is inert here (see the open question in
    /// DESIGN.md) — an `int` subclass used as a key is coerced exactly like
    /// a plain `int`, whether or not `PASSTHROUGH_SUBCLASS` is set.
    fn convert_key(&self, key: &Bound<'py, PyAny>) -> PyResult<String> {
        if let Ok(s) = key.downcast::<PyString>() {
            return s
                .extract()
                .map_err(|_| encode_error_from(xjson::EncodeError::UnpairedSurrogate));
        }
        if !self.options.non_str_keys() {
            return Err(encode_error_from(xjson::EncodeError::NonStringKey));
        }
        if let Ok(b) = key.downcast_exact::<PyBool>() {
            return Ok(if b.is_true() { "true" } else { "false" }.into());
        }
        if let Ok(i) = key.downcast::<PyInt>() {
            let magnitude: i128 = i
                .extract()
                .map_err(|_| encode_error_from(xjson::EncodeError::UnsupportedType))?;
            if !(-(1i128 << 63)..=i128::from(u64::MAX)).contains(&magnitude) {
                return Err(encode_error_from(xjson::EncodeError::IntegerOutOfRange(
                    magnitude,
                )));
            }
            return Ok(magnitude.to_string());
        }
        if let Ok(f) = key.downcast::<PyFloat>() {
            let v = f.value();
            if !v.is_finite() {
                return Ok("null".into());
            }
            let mut s = String::new();
            xjson_format_float(v, &mut s);
            return Ok(s);
        }
        if let Ok(dt) = key.downcast::<PyDateTime>() {
            let v = pydatetime_to_value(dt)?;
            let mut s = String::new();
            render_datetime(&v, self.options, &mut s);
            return Ok(s);
        }
        if let Ok(d) = key.downcast::<PyDate>() {
            let v = pydate_to_value(d)?;
            let mut s = String::new();
            render_date(&v, &mut s);
            return Ok(s);
        }
        if let Ok(u) = uuid_from_object(key)? {
            return Ok(u.hyphenated().to_string());
        }
        Err(encode_error_from(xjson::EncodeError::UnsupportedType))
    }

    fn convert_dataclass(&mut self, obj: &Bound<'py, PyAny>, fallback_depth: u32) -> PyResult<Value> {
        self.enter(obj)?;
        let fields = obj.getattr("__dataclass_fields__")?;
        let mut rec = Record::new();
        for name in fields.try_iter()? {
            let name: String = name?.extract()?;
            let value = obj.getattr(name.as_str())?;
            let converted = self.convert_with_depth(&value, fallback_depth)?;
            rec.push(name, converted);
        }
        self.exit(obj);
        Ok(Value::Record(rec))
    }

    /// Route `obj` to the user's `default` callable, re-dispatching its
    /// return value. `no_default_err` is the error raised verbatim if no
    /// `default` was supplied — callers pick it to reflect *why* `obj`
    /// reached the fallback (an unknown type vs. a subclass rejected under
    /// `PASSTHROUGH_SUBCLASS`).
    fn dispatch_default(
        &mut self,
        obj: &Bound<'py, PyAny>,
        fallback_depth: u32,
        no_default_err: xjson::EncodeError,
    ) -> PyResult<Value> {
        if fallback_depth >= MAX_FALLBACK_DEPTH {
            return Err(encode_error_from(xjson::EncodeError::FallbackRecursionLimit {
                limit: MAX_FALLBACK_DEPTH,
            }));
        }
        let Some(default) = self.default.clone() else {
            return Err(encode_error_from(no_default_err));
        };
        let replacement = default.call1(self.py, (obj,))?;
        let bound = replacement.into_bound(self.py);
        self.convert_with_depth(&bound, fallback_depth + 1)
    }

    fn enter(&mut self, obj: &Bound<'py, PyAny>) -> PyResult<()> {
        let addr = obj.as_ptr() as usize;
        if self.seen.contains(&addr) {
            return Err(encode_error_from(xjson::EncodeError::ReferenceCycle));
        }
        self.seen.push(addr);
        Ok(())
    }

    fn exit(&mut self, obj: &Bound<'py, PyAny>) {
        let addr = obj.as_ptr() as usize;
        if let Some(pos) = self.seen.iter().rposition(|&a| a == addr) {
            self.seen.remove(pos);
        }
    }
}

fn xjson_format_float(v: f64, out: &mut String) {
    // Mirrors the core crate's float formatting so keys and values agree.
    let mut buf = ryu::Buffer::new();
    out.push_str(buf.format_finite(v));
}

fn render_date(date: &xjson::time::Date, out: &mut String) {
    use core::fmt::Write;
    let _ = write!(
        out,
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    );
}

fn render_datetime(value: &XDateTime, options: EncodeOptions, out: &mut String) {
    // Keys always auto-format regardless of `passthrough_datetime`.
    let mut opts = options;
    opts = EncodeOptions::from_bits(opts.raw() & !bits::PASSTHROUGH_DATETIME).unwrap_or(opts);
    let _ = xjson_encode_datetime_into(out, *value, opts);
}

fn xjson_encode_datetime_into(out: &mut String, value: XDateTime, options: EncodeOptions) -> Result<(), xjson::EncodeError> {
    let encoded = xjson::encode(&Value::DateTime(value), None, options.raw())?;
    let s = core::str::from_utf8(&encoded).unwrap_or("");
    out.push_str(s.trim_matches('"'));
    Ok(())
}

fn pydate_to_value(d: &Bound<'_, PyDate>) -> PyResult<xjson::time::Date> {
    let year = d.get_year();
    let month = d.get_month();
    let day = d.get_day();
    let month = xjson::time::Month::try_from(month)
        .map_err(|_| PyTypeError::new_err("invalid month in date"))?;
    xjson::time::Date::from_calendar_date(year, month, day)
        .map_err(|_| PyTypeError::new_err("invalid calendar date"))
}

fn pytime_to_value(t: &Bound<'_, PyTime>) -> PyResult<TimeValue> {
    let time = xjson::time::Time::from_hms_micro(
        t.get_hour(),
        t.get_minute(),
        t.get_second(),
        t.get_microsecond(),
    )
    .map_err(|_| PyTypeError::new_err("invalid time"))?;
    let offset = py_tzinfo_offset(t.as_any())?;
    Ok(TimeValue { time, offset })
}

fn pydatetime_to_value(dt: &Bound<'_, PyDateTime>) -> PyResult<XDateTime> {
    let date = xjson::time::Date::from_calendar_date(
        dt.get_year(),
        xjson::time::Month::try_from(dt.get_month())
            .map_err(|_| PyTypeError::new_err("invalid month in datetime"))?,
        dt.get_day(),
    )
    .map_err(|_| PyTypeError::new_err("invalid calendar date"))?;
    let time = xjson::time::Time::from_hms_micro(
        dt.get_hour(),
        dt.get_minute(),
        dt.get_second(),
        dt.get_microsecond(),
    )
    .map_err(|_| PyTypeError::new_err("invalid time"))?;
    match py_tzinfo_offset(dt.as_any())? {
        Some(offset) => Ok(XDateTime::Offset(date, time, offset)),
        None => Ok(XDateTime::Naive(date, time)),
    }
}

/// Read a fixed `UtcOffset` off an object's `.tzinfo`/`.utcoffset()`, if
/// any. A non-fixed offset (e.g. an IANA zone with DST rules) is left for
/// the caller to reject at the point it tries to format it, as
/// `UnserializableTzinfo`.
fn py_tzinfo_offset(obj: &Bound<'_, PyAny>) -> PyResult<Option<xjson::time::UtcOffset>> {
    let tzinfo = obj.getattr("tzinfo")?;
    if tzinfo.is_none() {
        return Ok(None);
    }
    let delta = obj.call_method0("utcoffset")?;
    if delta.is_none() {
        return Ok(None);
    }
    let seconds: i64 = delta.call_method0("total_seconds")?.extract::<f64>()? as i64;
    let offset = xjson::time::UtcOffset::from_whole_seconds(i32::try_from(seconds).unwrap_or(0))
        .map_err(|_| PyTypeError::new_err("tzinfo offset out of range"))?;
    Ok(Some(offset))
}

fn is_dataclass(obj: &Bound<'_, PyAny>) -> PyResult<bool> {
    Ok(obj.hasattr("__dataclass_fields__")? && !obj.is_instance_of::<pyo3::types::PyType>())
}

fn uuid_from_object(obj: &Bound<'_, PyAny>) -> PyResult<Result<uuid::Uuid, ()>> {
    let py = obj.py();
    let uuid_class = py.import("uuid")?.getattr("UUID")?;
    if !obj.is_instance(&uuid_class)? {
        return Ok(Err(()));
    }
    let as_int: u128 = obj.getattr("int")?.extract()?;
    Ok(Ok(uuid::Uuid::from_u128(as_int)))
}

/// Convert a decoded [`Value`] into a native Python object.
pub fn from_value<'py>(py: Python<'py>, value: &Value) -> PyResult<Py<PyAny>> {
    Ok(match value {
        Value::Null => py.None(),
        Value::Bool(b) => b.into_pyobject(py)?.to_owned().unbind().into(),
        Value::Int(Integer::Signed(i)) => i.into_pyobject(py)?.unbind().into(),
        Value::Int(Integer::Unsigned(u)) => u.into_pyobject(py)?.unbind().into(),
        Value::Float(f) => PyFloat::new(py, *f).unbind().into(),
        Value::Str(s) => PyString::new(py, s).unbind().into(),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(from_value(py, item)?)?;
            }
            list.unbind().into()
        }
        Value::Object(obj) => {
            let dict = PyDict::new(py);
            for (k, v) in obj.iter() {
                dict.set_item(k, from_value(py, v)?)?;
            }
            dict.unbind().into()
        }
        // The decoder never produces these; only reachable if a caller
        // constructs a `Value` by hand and round-trips it through Python.
        Value::Date(_)
        | Value::Time(_)
        | Value::DateTime(_)
        | Value::Uuid(_)
        | Value::Record(_)
        | Value::Fragment(_)
        | Value::NumericArray(_) => py.None(),
    })
}
