//! Optional numeric N-D array serialization, gated by
//! [`crate::options::bits::SERIALIZE_NUMERIC_ARRAYS`].
//!
//! Arrays are stored as a typed flat buffer plus a shape, row-major, and
//! rendered as nested JSON arrays. Absent the option, encoding any
//! [`NumericArray`] is an [`crate::error::EncodeError::NumericArraysDisabled`].

use alloc::vec::Vec;

#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl NumericData {
    fn len(&self) -> usize {
        match self {
            NumericData::I32(v) => v.len(),
            NumericData::I64(v) => v.len(),
            NumericData::U8(v) => v.len(),
            NumericData::U32(v) => v.len(),
            NumericData::U64(v) => v.len(),
            NumericData::F32(v) => v.len(),
            NumericData::F64(v) => v.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    pub shape: Vec<usize>,
    pub data: NumericData,
}

impl NumericArray {
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.element_count() == self.data.len()
    }
}
