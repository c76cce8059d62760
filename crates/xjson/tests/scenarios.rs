//! Worked input/output examples expressible purely against the core
//! `Value` API — i.e. everything except the non-string-keys key
//! *conversion*, which is a host-binding concern (see `xjson-py`) since
//! `Object` keys are always plain `String`s by the time they reach this
//! crate.

use xjson::{bits, decode, encode, DateTime, Fragment, Object, Value};

#[test]
fn scenario_datetime_with_strict_integer_and_naive_utc() {
    use time::{Month, Time};
    let date = time::Date::from_calendar_date(2000, Month::January, 1).unwrap();
    let time = Time::from_hms(2, 3, 4).unwrap();
    let arr = Value::Array(vec![
        Value::from(1i64),
        Value::DateTime(DateTime::Naive(date, time)),
    ]);
    let out = encode(&arr, None, bits::STRICT_INTEGER | bits::NAIVE_UTC).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        r#"[1,"2000-01-01T02:03:04+00:00"]"#
    );
}

#[test]
fn scenario_sorted_date_keys_and_plain_key_coexist() {
    // The non-string key -> string conversion for `date(...)` happens at the
    // host boundary; here we model its output directly.
    let mut obj = Object::new();
    obj.push("1970-01-05", Value::from(2i64));
    obj.push("1970-01-03", Value::from(3i64));
    obj.push("other", Value::from(1i64));
    let out = encode(&Value::Object(obj), None, bits::SORT_KEYS).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        r#"{"1970-01-03":3,"1970-01-05":2,"other":1}"#
    );
}

#[test]
fn scenario_uuid_key_modeled_as_string() {
    let mut obj = Object::new();
    obj.push(
        "7202d115-7ff3-4c81-a7c1-2a1f067b1ece",
        Value::Bool(true),
    );
    let out = encode(&Value::Object(obj), None, 0).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        r#"{"7202d115-7ff3-4c81-a7c1-2a1f067b1ece":true}"#
    );
}

#[test]
fn scenario_empty_object_with_trailing_whitespace() {
    assert_eq!(decode(b"{}\n\t ").unwrap(), Value::Object(Object::new()));
    assert!(decode(b"{}\n\t a").is_err());
}

#[test]
fn scenario_nan_encodes_null_and_is_rejected_on_decode() {
    assert_eq!(
        String::from_utf8(encode(&Value::Float(f64::NAN), None, 0).unwrap()).unwrap(),
        "null"
    );
    assert!(decode(b"[NaN]").is_err());
}

#[test]
fn scenario_quote_prefixed_string_escapes_correctly() {
    let v = Value::from("\"aaaaaaabb");
    let out = encode(&v, None, 0).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\"\\\"aaaaaaabb\"");
}

#[test]
fn fragment_is_inserted_verbatim_inside_a_container() {
    let mut obj = Object::new();
    obj.push("raw", Value::Fragment(Fragment::new(&b"[1,2,3]"[..])));
    let out = encode(&Value::Object(obj), None, 0).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), r#"{"raw":[1,2,3]}"#);
}
