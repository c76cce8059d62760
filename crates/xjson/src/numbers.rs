//! Number lexing (decode) and formatting (encode).
//!
//! Integers decode into [`Integer`], which widens to `u64` for values that
//! don't fit in `i64` rather than promoting to a bignum; anything outside
//! `[-2^63, 2^64-1]` is a decode error. Floats decode straight into `f64`
//! via `core`'s own parser. Formatting uses `itoa`/`ryu`, matching the rest
//! of the crate's reliance on those two crates for the hot path.

use alloc::string::String;

use crate::error::{DecodeErrorKind, Position};

/// A JSON integer, widened only as far as a 64-bit value requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integer {
    Signed(i64),
    Unsigned(u64),
}

impl Integer {
    #[must_use]
    pub fn as_i128(self) -> i128 {
        match self {
            Integer::Signed(v) => i128::from(v),
            Integer::Unsigned(v) => i128::from(v),
        }
    }
}

impl From<i64> for Integer {
    fn from(v: i64) -> Self {
        Integer::Signed(v)
    }
}

impl From<u64> for Integer {
    fn from(v: u64) -> Self {
        Integer::Unsigned(v)
    }
}

/// Result of lexing a JSON number token: either an integer literal or one
/// that must be parsed as a float (it had a `.` or exponent).
pub(crate) enum Lexed {
    Integer(Integer),
    Float(f64),
}

/// Scan a JSON number starting at `input[start]`, returning the lexed value
/// and the exclusive end offset. `start` must point at `-` or an ASCII
/// digit.
pub(crate) fn lex_number(
    input: &[u8],
    start: usize,
) -> Result<(Lexed, usize), (DecodeErrorKind, usize)> {
    let mut i = start;
    let negative = input.get(i) == Some(&b'-');
    if negative {
        i += 1;
    }

    let int_start = i;
    match input.get(i) {
        Some(b'0') => {
            i += 1;
            if matches!(input.get(i), Some(b'0'..=b'9')) {
                return Err((DecodeErrorKind::InvalidNumber, start));
            }
        }
        Some(b'1'..=b'9') => {
            i += 1;
            while matches!(input.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return Err((DecodeErrorKind::InvalidNumber, start)),
    }
    if i == int_start {
        return Err((DecodeErrorKind::InvalidNumber, start));
    }

    let mut is_float = false;

    if input.get(i) == Some(&b'.') {
        is_float = true;
        i += 1;
        let frac_start = i;
        while matches!(input.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == frac_start {
            return Err((DecodeErrorKind::InvalidNumber, start));
        }
    }

    if matches!(input.get(i), Some(b'e' | b'E')) {
        is_float = true;
        i += 1;
        if matches!(input.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while matches!(input.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == exp_start {
            return Err((DecodeErrorKind::InvalidNumber, start));
        }
    }

    // SAFETY: every byte scanned above is ASCII (`-`, digits, `.`, `e`/`E`,
    // `+`).
    let text = core::str::from_utf8(&input[start..i]).expect("number lexeme is ASCII");

    if is_float {
        let value: f64 = text
            .parse()
            .map_err(|_| (DecodeErrorKind::InvalidNumber, start))?;
        Ok((Lexed::Float(value), i))
    } else {
        let int = parse_integer(text, negative, int_start - start, i - start)
            .map_err(|kind| (kind, start))?;
        Ok((Lexed::Integer(int), i))
    }
}

fn parse_integer(
    text: &str,
    negative: bool,
    int_start_rel: usize,
    int_end_rel: usize,
) -> Result<Integer, DecodeErrorKind> {
    let digits = &text[int_start_rel..int_end_rel];
    if negative {
        let magnitude: u128 = digits
            .parse()
            .map_err(|_| DecodeErrorKind::IntegerOutOfRange)?;
        // [-2^63, ...]: magnitude may be up to 2^63 exactly (i64::MIN).
        if magnitude > (1u128 << 63) {
            return Err(DecodeErrorKind::IntegerOutOfRange);
        }
        if magnitude == (1u128 << 63) {
            return Ok(Integer::Signed(i64::MIN));
        }
        #[allow(clippy::cast_possible_wrap)]
        Ok(Integer::Signed(-(magnitude as i64)))
    } else {
        let value: u64 = digits
            .parse()
            .map_err(|_| DecodeErrorKind::IntegerOutOfRange)?;
        Ok(Integer::Unsigned(value))
    }
}

pub(crate) fn position_of(input: &[u8], offset: usize) -> Position {
    let mut line = 1usize;
    let mut col = 1usize;
    for &b in &input[..offset.min(input.len())] {
        if b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    Position {
        offset,
        line,
        column: col,
    }
}

/// Format an integer in its shortest decimal form (no leading zeros, no
/// `+`, `-` only when negative).
pub(crate) fn format_integer(value: Integer, out: &mut String) {
    let mut buf = itoa::Buffer::new();
    let s = match value {
        Integer::Signed(v) => buf.format(v),
        Integer::Unsigned(v) => buf.format(v),
    };
    out.push_str(s);
}

/// Format a finite `f64` as the shortest round-tripping decimal string.
/// NaN/Infinity must be handled by the caller (they encode as `null`).
pub(crate) fn format_float(value: f64, out: &mut String) {
    debug_assert!(value.is_finite());
    let mut buf = ryu::Buffer::new();
    out.push_str(buf.format_finite(value));
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    fn lex(s: &str) -> Lexed {
        lex_number(s.as_bytes(), 0).unwrap().0
    }

    #[test]
    fn lexes_plain_integers() {
        assert!(matches!(lex("0"), Lexed::Integer(Integer::Unsigned(0))));
        assert!(matches!(
            lex("18446744073709551615"),
            Lexed::Integer(Integer::Unsigned(u64::MAX))
        ));
        assert!(matches!(
            lex("-9223372036854775808"),
            Lexed::Integer(Integer::Signed(i64::MIN))
        ));
    }

    #[test]
    fn rejects_leading_zero() {
        assert!(lex_number(b"01", 0).is_err());
    }

    #[test]
    fn switches_to_float_on_dot_or_exponent() {
        assert!(matches!(lex("1.5"), Lexed::Float(_)));
        assert!(matches!(lex("1e10"), Lexed::Float(_)));
    }

    #[test]
    fn integer_overflow_is_rejected() {
        assert!(lex_number(b"18446744073709551616", 0).is_err());
        assert!(lex_number(b"-9223372036854775809", 0).is_err());
    }

    #[test]
    fn float_fixtures_round_trip() {
        for s in [
            "31.245270191439438",
            "121.48791951161945",
            "100.78399658203125",
        ] {
            let v: f64 = s.parse().unwrap();
            let mut out = String::new();
            format_float(v, &mut out);
            assert_eq!(out, s);
        }
    }

    #[test]
    fn formats_short_decimal() {
        let mut out = String::new();
        format_float(0.8701, &mut out);
        assert_eq!(out, "0.8701");
    }

    #[test]
    fn formats_integers_without_padding() {
        let mut out = String::new();
        format_integer(Integer::Signed(-42), &mut out);
        assert_eq!(out, "-42".to_string());
    }
}
