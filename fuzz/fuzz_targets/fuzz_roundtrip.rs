//! Generates arbitrary well-formed JSON documents (via `serde_json::Value`,
//! serialized with `serde_json::to_vec` — a trusted independent encoder) and
//! checks that, for any document `B` accepted by this codec,
//! `encode(decode(B))` is itself valid JSON and
//! `decode(encode(decode(B))) == decode(B)`.
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: i64 = u.arbitrary()?;
                Value::Number(n.into())
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

fuzz_target!(|value: ArbitraryValue| {
    let doc = serde_json::to_vec(&value.0).expect("serde_json can serialize any Value it built");

    let Ok(v1) = xjson::decode(&doc) else {
        return;
    };
    let Ok(encoded) = xjson::encode(&v1, None, 0) else {
        return;
    };
    serde_json::from_slice::<Value>(&encoded)
        .expect("re-encoded output must still be valid JSON");
    let v2 = xjson::decode(&encoded).expect("re-encoded output must still be valid JSON");
    assert_eq!(v1, v2);
});
