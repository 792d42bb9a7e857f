//! Benchmarks for resolver latency and query assembly.
//!
//! Benchmark targets:
//! - Individual regex resolvers: <50us
//! - Tag cascade (pattern hit): <100us
//! - Full assembly without network collaborators: <1ms

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use eventsense::resolvers::{
    LocationResolver, TagResolver, resolve_budget, resolve_limit, resolve_radius,
    resolve_time_at,
};
use eventsense::{QueryAssembler, Taxonomy};

const SHORT_QUERY: &str = "edm party";
const TYPICAL_QUERY: &str = "free jazz night this weekend near Koramangala, just one pick";
const LONG_QUERY: &str = "looking for something fun for a team of twelve, maybe a pottery \
    workshop or a comedy show, anywhere in Bangalore from 20 Dec to 22 Dec, under 800 per \
    head, give me 5 options";
const VOCABULARY_FREE_QUERY: &str = "qzx vrrp blorf";

const QUERIES: [(&str, &str); 4] = [
    ("short", SHORT_QUERY),
    ("typical", TYPICAL_QUERY),
    ("long", LONG_QUERY),
    ("no_signal", VOCABULARY_FREE_QUERY),
];

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 4).unwrap_or_default()
}

fn bench_resolvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolvers");
    group.measurement_time(Duration::from_secs(5));
    let taxonomy = Taxonomy::builtin();

    group.bench_function("location", |b| {
        let resolver = LocationResolver::new(taxonomy);
        b.iter(|| resolver.resolve(black_box(TYPICAL_QUERY), None));
    });

    group.bench_function("radius", |b| {
        b.iter(|| resolve_radius(black_box(TYPICAL_QUERY), Some("Koramangala, Bangalore"), true));
    });

    group.bench_function("temporal", |b| {
        b.iter(|| resolve_time_at(black_box(LONG_QUERY), today()));
    });

    group.bench_function("budget", |b| {
        b.iter(|| resolve_budget(black_box(LONG_QUERY)));
    });

    group.bench_function("limit", |b| {
        b.iter(|| resolve_limit(black_box(LONG_QUERY), 3));
    });

    group.finish();
}

fn bench_tag_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_cascade");
    let resolver = TagResolver::new(Taxonomy::builtin());

    for (name, query) in QUERIES {
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, q| {
            b.iter(|| resolver.resolve(black_box(q), None));
        });
    }

    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    group.measurement_time(Duration::from_secs(5));
    let assembler = QueryAssembler::builder().build();

    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, q| {
            b.iter(|| assembler.assemble_at(black_box(q), None, today()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolvers, bench_tag_cascade, bench_assembly);
criterion_main!(benches);
