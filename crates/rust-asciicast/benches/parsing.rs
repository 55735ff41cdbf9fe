//! Cast parsing benchmarks.
#![allow(missing_docs)]

use std::fmt::Write;
use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_asciicast::cast::{detect, parse, read_v2, to_v2_string};

fn v2_document(events: usize) -> String {
    let mut doc = String::from("{\"version\": 2, \"width\": 120, \"height\": 40}\n");
    for i in (0u32..).take(events) {
        let time = f64::from(i) * 0.01;
        let _ = writeln!(doc, "[{time}, \"o\", \"line {i} \\u001b[32mok\\u001b[0m\\r\\n\"]");
    }
    doc
}

fn bench_detect(c: &mut Criterion) {
    let doc = v2_document(1_000);
    c.bench_function("detect_v2", |b| b.iter(|| detect(black_box(&doc))));
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_v2");
    for events in [100, 1_000, 10_000] {
        let doc = v2_document(events);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("whole", events), &doc, |b, doc| {
            b.iter(|| parse(black_box(doc)));
        });
        group.bench_with_input(BenchmarkId::new("streaming", events), &doc, |b, doc| {
            b.iter(|| read_v2(Cursor::new(black_box(doc.as_bytes()))));
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let cast = parse(&v2_document(1_000)).unwrap();
    c.bench_function("write_v2", |b| b.iter(|| to_v2_string(black_box(&cast))));
}

criterion_group!(benches, bench_detect, bench_parse, bench_write);
criterion_main!(benches);
