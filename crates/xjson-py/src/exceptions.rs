//! Python exception types raised by `decode`/`encode`.
//!
//! `DecodeError` subclasses `ValueError`, so callers already catching
//! `ValueError` for other parsers keep working. `EncodeError` subclasses
//! `TypeError`, since the overwhelming majority of encode failures are
//! "this object is not of a type I know how to serialize".

use pyo3::create_exception;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;

create_exception!(xjson, DecodeError, PyValueError);
create_exception!(xjson, EncodeError, PyTypeError);

pub fn encode_error_from(err: xjson::EncodeError) -> PyErr {
    EncodeError::new_err(err.to_string())
}

/// Render a decode failure as a `DecodeError` carrying a human-readable
/// message plus a byte offset and 1-indexed line/column.
/// `xjson::DecodeError`'s `Display` impl already embeds `position`, so this
/// is mostly a type-conversion shim.
pub fn decode_error_from(err: xjson::DecodeError) -> PyErr {
    DecodeError::new_err(err.to_string())
}
