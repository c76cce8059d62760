//! Recursive-descent decoder.
//!
//! Depth is tracked with an explicit counter rather than relying on the
//! native call stack overflowing — the counter is checked, and the error
//! raised, *before* any allocation for the new container, so `"["` repeated
//! ten million times fails fast instead of exhausting memory.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{DecodeError, DecodeErrorKind, Position};
use crate::keycache::KeyCache;
use crate::numbers::{lex_number, position_of, Lexed};
use crate::strings::decode_string;
use crate::value::{Object, Value};

const MAX_DEPTH: u32 = 1024;

/// Decode a complete JSON document from `input`.
///
/// Leading whitespace before the top-level value, and trailing whitespace
/// after it, are permitted; any other trailing byte is a decode error.
/// Empty input is always a decode error.
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    if input.is_empty() {
        return Err(err(input, DecodeErrorKind::EmptyInput, 0));
    }

    let mut dec = Decoder {
        input,
        depth: 0,
        keys: KeyCache::new(),
    };

    let pos = skip_ws(input, 0);
    let (value, next) = dec.parse_value(pos)?;
    let trailing = skip_ws(input, next);
    if trailing != input.len() {
        return Err(err(input, DecodeErrorKind::TrailingCharacters, trailing));
    }
    Ok(value)
}

fn err(input: &[u8], kind: DecodeErrorKind, offset: usize) -> DecodeError {
    DecodeError::new(kind, position_of(input, offset))
}

#[inline]
fn skip_ws(input: &[u8], mut pos: usize) -> usize {
    while matches!(input.get(pos), Some(b' ' | b'\t' | b'\n' | b'\r')) {
        pos += 1;
    }
    pos
}

struct Decoder<'a> {
    input: &'a [u8],
    depth: u32,
    keys: KeyCache,
}

impl<'a> Decoder<'a> {
    fn parse_value(&mut self, pos: usize) -> Result<(Value, usize), DecodeError> {
        match self.input.get(pos) {
            None => Err(err(self.input, DecodeErrorKind::UnexpectedEof, pos)),
            Some(b'n') => self.parse_literal(pos, b"null", Value::Null),
            Some(b't') => self.parse_literal(pos, b"true", Value::Bool(true)),
            Some(b'f') => self.parse_literal(pos, b"false", Value::Bool(false)),
            Some(b'"') => {
                let (s, next) =
                    decode_string(self.input, pos + 1).map_err(|(k, o)| err(self.input, k, o))?;
                Ok((Value::Str(s), next))
            }
            Some(b'-' | b'0'..=b'9') => {
                let (lexed, next) =
                    lex_number(self.input, pos).map_err(|(k, o)| err(self.input, k, o))?;
                let v = match lexed {
                    Lexed::Integer(i) => Value::Int(i),
                    Lexed::Float(f) => Value::Float(f),
                };
                Ok((v, next))
            }
            Some(b'[') => self.parse_array(pos),
            Some(b'{') => self.parse_object(pos),
            Some(&b) => Err(err(
                self.input,
                DecodeErrorKind::UnexpectedCharacter(b as char),
                pos,
            )),
        }
    }

    fn parse_literal(
        &self,
        pos: usize,
        literal: &[u8],
        value: Value,
    ) -> Result<(Value, usize), DecodeError> {
        let end = pos + literal.len();
        if self.input.get(pos..end) == Some(literal) {
            Ok((value, end))
        } else {
            Err(err(self.input, DecodeErrorKind::UnexpectedEof, pos))
        }
    }

    fn enter_container(&mut self, pos: usize) -> Result<(), DecodeError> {
        if self.depth >= MAX_DEPTH {
            return Err(err(
                self.input,
                DecodeErrorKind::DepthLimitExceeded { max: MAX_DEPTH },
                pos,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_array(&mut self, pos: usize) -> Result<(Value, usize), DecodeError> {
        self.enter_container(pos)?;
        let mut items = Vec::new();
        let mut cursor = skip_ws(self.input, pos + 1);

        if self.input.get(cursor) == Some(&b']') {
            self.depth -= 1;
            return Ok((Value::Array(items), cursor + 1));
        }

        loop {
            let (value, next) = self.parse_value(cursor)?;
            items.push(value);
            cursor = skip_ws(self.input, next);
            match self.input.get(cursor) {
                Some(b',') => {
                    cursor = skip_ws(self.input, cursor + 1);
                }
                Some(b']') => {
                    self.depth -= 1;
                    return Ok((Value::Array(items), cursor + 1));
                }
                _ => {
                    return Err(err(
                        self.input,
                        DecodeErrorKind::ExpectedCommaOrClose,
                        cursor,
                    ))
                }
            }
        }
    }

    fn parse_object(&mut self, pos: usize) -> Result<(Value, usize), DecodeError> {
        self.enter_container(pos)?;
        let mut obj = Object::new();
        let mut cursor = skip_ws(self.input, pos + 1);

        if self.input.get(cursor) == Some(&b'}') {
            self.depth -= 1;
            return Ok((Value::Object(obj), cursor + 1));
        }

        loop {
            if self.input.get(cursor) != Some(&b'"') {
                return Err(err(self.input, DecodeErrorKind::ExpectedObjectKey, cursor));
            }
            let (key_text, next) =
                decode_string(self.input, cursor + 1).map_err(|(k, o)| err(self.input, k, o))?;
            let key: String = self.keys.intern(&key_text);
            cursor = skip_ws(self.input, next);

            if self.input.get(cursor) != Some(&b':') {
                return Err(err(self.input, DecodeErrorKind::ExpectedColon, cursor));
            }
            cursor = skip_ws(self.input, cursor + 1);

            let (value, next) = self.parse_value(cursor)?;
            obj.push(key, value);
            cursor = skip_ws(self.input, next);

            match self.input.get(cursor) {
                Some(b',') => {
                    cursor = skip_ws(self.input, cursor + 1);
                }
                Some(b'}') => {
                    self.depth -= 1;
                    return Ok((Value::Object(obj), cursor + 1));
                }
                _ => {
                    return Err(err(
                        self.input,
                        DecodeErrorKind::ExpectedCommaOrClose,
                        cursor,
                    ))
                }
            }
        }
    }
}

/// Re-export for callers that want an explicit position on success too
/// (unused internally, but convenient for tooling built atop this crate).
#[must_use]
pub fn decode_error_position(input: &[u8], offset: usize) -> Position {
    position_of(input, offset)
}
