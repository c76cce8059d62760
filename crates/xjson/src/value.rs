//! The value tree shared by the decoder and encoder.
//!
//! [`Object`] is a plain ordered list of `(key, value)` pairs rather than a
//! hash or btree map: this codec preserves exact insertion order *and*
//! duplicate keys, which no map type in `core`/`alloc` gives you. A `Vec`
//! is the honest representation of that contract.

use alloc::string::String;
use alloc::vec::Vec;

use crate::datetime::{DateTime, TimeValue};
use crate::fragment::Fragment;
use crate::numbers::Integer;
use crate::numeric_array::NumericArray;
use crate::record::Record;
use time::Date;
use uuid::Uuid;

/// An ordered, duplicate-preserving list of object entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object(pub Vec<(String, Value)>);

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self(Vec::with_capacity(cap))
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, (String, Value)> {
        self.0.iter()
    }

    /// The value of the *last* entry matching `key`, mirroring how most
    /// JSON consumers resolve duplicate keys (last write wins) even though
    /// the decoder keeps every entry in the tree.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = &'a (String, Value);
    type IntoIter = core::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = alloc::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Any value that can flow through the codec.
///
/// The decoder only ever produces the first seven variants ("Value
/// tree"). The remaining variants — `Date`/`Time`/`DateTime`/`Uuid`/
/// `Record`/`Fragment`/`NumericArray` — are accepted on the encoder's
/// richer input side only ("Encoder input").
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(Integer),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Object(Object),
    Date(Date),
    Time(TimeValue),
    DateTime(DateTime),
    Uuid(Uuid),
    Record(Record),
    Fragment(Fragment),
    NumericArray(NumericArray),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(Integer::Signed(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Int(Integer::Unsigned(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Self::Object(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<Fragment> for Value {
    fn from(v: Fragment) -> Self {
        Self::Fragment(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}
