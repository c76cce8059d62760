mod exceptions;
mod fragment;
mod pyvalue;

use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyString};

pub use exceptions::{DecodeError, EncodeError};
pub use fragment::PyFragment;

use xjson::EncodeOptions;

/// Decode a JSON document into native Python objects.
///
/// `data` may be a `str` (encoded as UTF-8) or any object supporting the
/// buffer protocol (`bytes`, `bytearray`, `memoryview`). Raises
/// `xjson.DecodeError` (a `ValueError`) on malformed input.
#[pyfunction]
#[pyo3(signature = (data, /))]
fn decode(py: Python<'_>, data: Bound<'_, PyAny>) -> PyResult<Py<PyAny>> {
    let result = if let Ok(s) = data.downcast::<PyString>() {
        xjson::decode(s.to_str()?.as_bytes())
    } else {
        let bytes: &[u8] = data.extract()?;
        xjson::decode(bytes)
    };
    let value = result.map_err(exceptions::decode_error_from)?;
    pyvalue::from_value(py, &value)
}

/// Serialize a Python object to a JSON byte string.
///
/// `default` is called for otherwise-unserializable objects and should
/// return a value that can itself be serialized, or raise. `option` is the
/// bitmask documented in `xjson.Options`.
#[pyfunction]
#[pyo3(signature = (obj, /, default=None, option=0))]
fn encode(
    py: Python<'_>,
    obj: Bound<'_, PyAny>,
    default: Option<Py<PyAny>>,
    option: u32,
) -> PyResult<Py<PyBytes>> {
    let options = EncodeOptions::from_bits(option).map_err(exceptions::encode_error_from)?;
    let mut enc = pyvalue::Encoder::new(py, default, options);
    let value = enc.convert(&obj)?;
    let bytes = xjson::encode(&value, None, option).map_err(exceptions::encode_error_from)?;
    Ok(PyBytes::new(py, &bytes).unbind())
}

#[pymodule]
pub fn xjson(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(encode, m)?)?;
    m.add_class::<PyFragment>()?;
    m.add("DecodeError", py.get_type::<DecodeError>())?;
    m.add("EncodeError", py.get_type::<EncodeError>())?;

    m.add("OPT_APPEND_NEWLINE", xjson::bits::APPEND_NEWLINE)?;
    m.add("OPT_INDENT_2", xjson::bits::INDENT_2)?;
    m.add("OPT_NAIVE_UTC", xjson::bits::NAIVE_UTC)?;
    m.add("OPT_UTC_Z", xjson::bits::UTC_Z)?;
    m.add("OPT_OMIT_MICROSECONDS", xjson::bits::OMIT_MICROSECONDS)?;
    m.add("OPT_STRICT_INTEGER", xjson::bits::STRICT_INTEGER)?;
    m.add("OPT_NON_STR_KEYS", xjson::bits::NON_STR_KEYS)?;
    m.add("OPT_SORT_KEYS", xjson::bits::SORT_KEYS)?;
    m.add("OPT_PASSTHROUGH_SUBCLASS", xjson::bits::PASSTHROUGH_SUBCLASS)?;
    m.add("OPT_PASSTHROUGH_DATETIME", xjson::bits::PASSTHROUGH_DATETIME)?;
    m.add(
        "OPT_SERIALIZE_NUMERIC_ARRAYS",
        xjson::bits::SERIALIZE_NUMERIC_ARRAYS,
    )?;
    Ok(())
}
