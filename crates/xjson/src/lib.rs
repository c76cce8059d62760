//! `xjson`: a strict, high-throughput JSON codec for RFC 8259 documents,
//! with extensions for timestamps, UUIDs, 64-bit-window arbitrary-precision
//! integers, data-class-like records, and pre-serialized fragments.
//!
//! Two entry points cover the whole surface:
//!
//! - [`decode`] parses a byte slice into a [`Value`] tree.
//! - [`encode`] serializes a [`Value`] (optionally routing unsupported
//!   inputs through a caller-supplied [`Fallback`]) into a fresh `Vec<u8>`.
//!
//! Both are synchronous, allocate only in proportion to input/output size,
//! and never retain anything across calls. See [`DecodeError`] and
//! [`EncodeError`] for the two disjoint error taxonomies, and
//! [`EncodeOptions`] for the single bitmask that configures `encode`.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod datetime;
mod decoder;
mod encoder;
mod error;
mod fragment;
mod keycache;
mod numbers;
mod numeric_array;
mod options;
mod record;
mod strings;
mod value;

pub use datetime::{DateTime, TimeValue};
pub use decoder::decode;
pub use encoder::{encode, Fallback};
pub use error::{DecodeError, DecodeErrorKind, EncodeError, Position};
pub use fragment::Fragment;
pub use numbers::Integer;
pub use numeric_array::{NumericArray, NumericData};
pub use options::{bits, EncodeOptions};
pub use record::Record;
pub use value::{Object, Value};

pub use time;
pub use uuid;
