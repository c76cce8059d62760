//! `xjson.Fragment`: a wrapper marking pre-serialized bytes that should be
//! spliced verbatim into encoder output instead of being serialized as a
//! string.

use pyo3::prelude::*;

#[pyclass(name = "Fragment", module = "xjson", frozen)]
pub struct PyFragment {
    pub bytes: Box<[u8]>,
}

#[pymethods]
impl PyFragment {
    #[new]
    fn new(contents: &[u8]) -> Self {
        Self {
            bytes: Box::from(contents),
        }
    }

    fn __repr__(&self) -> String {
        format!("Fragment({} bytes)", self.bytes.len())
    }
}
