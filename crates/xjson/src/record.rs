//! Data-class-like records.
//!
//! A [`Record`] is emitted as an object whose entries are its declared
//! fields in declaration order, never reordered by `SORT_KEYS` — that
//! option is documented as a mapping-entries concern, and a record's field
//! order is part of its declaration, not an incidental insertion order.

use alloc::string::String;
use alloc::vec::Vec;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Vec<(String, Value)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[must_use]
    pub fn with_fields(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}
