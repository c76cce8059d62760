//! Date/time value wrappers and their RFC 3339 rendering.
//!
//! These wrap the `time` crate's types rather than reimplementing calendar
//! math; the crate already appears in the dependency graph for exactly
//! this purpose.

use alloc::string::String;
use time::{Date, Time, UtcOffset};

use crate::error::EncodeError;
use crate::options::EncodeOptions;

/// A `datetime`-equivalent value: a naive (tz-less) moment or one pinned to
/// a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateTime {
    Naive(Date, Time),
    Offset(Date, Time, UtcOffset),
}

/// A `time`-equivalent value. Only a zero `UtcOffset` is serializable; any
/// other offset is a caller bug surfaced as [`EncodeError::UnserializableTzinfo`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeValue {
    pub time: Time,
    pub offset: Option<UtcOffset>,
}

pub(crate) fn write_date(out: &mut String, date: Date) {
    use core::fmt::Write;
    let _ = write!(
        out,
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    );
}

fn write_time(out: &mut String, time: Time, omit_micros: bool) {
    use core::fmt::Write;
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    );
    let micros = time.microsecond();
    if !omit_micros && micros != 0 {
        let _ = write!(out, ".{micros:06}");
    }
}

fn write_offset(out: &mut String, offset: UtcOffset, utc_z: bool) {
    if utc_z && offset == UtcOffset::UTC {
        out.push('Z');
        return;
    }
    use core::fmt::Write;
    let (h, m, _) = offset.as_hms();
    let sign = if h < 0 || (h == 0 && m < 0) { '-' } else { '+' };
    let _ = write!(out, "{sign}{:02}:{:02}", h.abs(), m.abs());
}

pub(crate) fn encode_datetime(
    out: &mut String,
    value: DateTime,
    options: EncodeOptions,
) -> Result<(), EncodeError> {
    match value {
        DateTime::Naive(date, time) => {
            write_date(out, date);
            out.push('T');
            write_time(out, time, options.omit_microseconds());
            if options.naive_utc() {
                write_offset(out, UtcOffset::UTC, options.utc_z());
            }
        }
        DateTime::Offset(date, time, offset) => {
            write_date(out, date);
            out.push('T');
            write_time(out, time, options.omit_microseconds());
            write_offset(out, offset, options.utc_z());
        }
    }
    Ok(())
}

pub(crate) fn encode_time(
    out: &mut String,
    value: TimeValue,
    options: EncodeOptions,
) -> Result<(), EncodeError> {
    if let Some(offset) = value.offset {
        if offset != UtcOffset::UTC {
            return Err(EncodeError::UnserializableTzinfo);
        }
    }
    write_time(out, value.time, options.omit_microseconds());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::from_calendar_date(y, Month::try_from(m).unwrap(), d).unwrap()
    }

    #[test]
    fn naive_utc_appends_offset() {
        let mut out = String::new();
        let dt = DateTime::Naive(date(2000, 1, 1), Time::from_hms(2, 3, 4).unwrap());
        let opts = EncodeOptions::from_bits(crate::options::bits::NAIVE_UTC).unwrap();
        encode_datetime(&mut out, dt, opts).unwrap();
        assert_eq!(out, "2000-01-01T02:03:04+00:00");
    }

    #[test]
    fn utc_z_renders_z() {
        let mut out = String::new();
        let dt = DateTime::Offset(
            date(2020, 6, 1),
            Time::from_hms(0, 0, 0).unwrap(),
            UtcOffset::UTC,
        );
        let opts = EncodeOptions::from_bits(crate::options::bits::UTC_Z).unwrap();
        encode_datetime(&mut out, dt, opts).unwrap();
        assert_eq!(out, "2020-06-01T00:00:00Z");
    }

    #[test]
    fn time_with_nonzero_offset_is_error() {
        let tv = TimeValue {
            time: Time::from_hms(1, 2, 3).unwrap(),
            offset: Some(UtcOffset::from_hms(5, 0, 0).unwrap()),
        };
        let opts = EncodeOptions::from_bits(0).unwrap();
        let mut out = String::new();
        assert!(encode_time(&mut out, tv, opts).is_err());
    }

    #[test]
    fn date_formats_plain() {
        let mut out = String::new();
        write_date(&mut out, date(1970, 1, 5));
        assert_eq!(out, "1970-01-05");
    }
}
