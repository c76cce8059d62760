//! Throughput benchmarks for the two entry points.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xjson::{bits, decode, encode, Value};

const SMALL: &str = r#"{"id":1,"name":"widget","active":true,"price":19.99,"tags":["a","b","c"]}"#;

fn nested_array_doc(depth: usize) -> String {
    let mut s = String::new();
    for _ in 0..depth {
        s.push('[');
    }
    s.push('1');
    for _ in 0..depth {
        s.push(']');
    }
    s
}

fn wide_object_doc(n: usize) -> String {
    let mut s = String::from("{");
    for i in 0..n {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!("\"key_{i}\":{i}"));
    }
    s.push('}');
    s
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (name, doc) in [
        ("small_object", SMALL.to_string()),
        ("nested_array_256", nested_array_doc(256)),
        ("wide_object_1000", wide_object_doc(1000)),
    ] {
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &doc, |b, doc| {
            b.iter(|| decode(doc.as_bytes()).unwrap());
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let small = decode(SMALL.as_bytes()).unwrap();
    group.bench_function("small_object", |b| {
        b.iter(|| encode(&small, None, 0).unwrap());
    });
    group.bench_function("small_object_sort_keys", |b| {
        b.iter(|| encode(&small, None, bits::SORT_KEYS).unwrap());
    });

    let wide = decode(wide_object_doc(1000).as_bytes()).unwrap();
    group.bench_function("wide_object_1000", |b| {
        b.iter(|| encode(&wide, None, 0).unwrap());
    });

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    c.bench_function("roundtrip_small_object", |b| {
        b.iter(|| {
            let v: Value = decode(SMALL.as_bytes()).unwrap();
            encode(&v, None, 0).unwrap()
        });
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_roundtrip);
criterion_main!(benches);
