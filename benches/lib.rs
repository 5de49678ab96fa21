// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ucd_tables::interner::StringInterner;
use ucd_tables::lookup::LookupTables;
use ucd_tables::ranges::{self, Groups};

fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranges::compress");
    for &count in &[256u32, 4096, 65536] {
        // Runs of 7 codepoints separated by single gaps.
        let codepoints: Vec<u32> = (0..count).filter(|cp| cp % 8 != 7).collect();
        group.throughput(Throughput::Elements(codepoints.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &codepoints, |b, cps| {
            b.iter(|| ranges::compress(cps.iter().copied()))
        });
    }
    group.finish();

    let mut groups: Groups<u8> = Groups::new();
    for cp in 0..0x30000u32 {
        groups.entry((cp / 24 % 5) as u8).or_default().push(cp);
    }
    let mut group = c.benchmark_group("ranges::compress_by_value");
    group.throughput(Throughput::Elements(0x30000));
    group.bench_function("5 values", |b| b.iter(|| ranges::compress_by_value(groups.clone())));
    group.finish();

    let mut map = BTreeMap::new();
    for cp in (0xC0u32..0x3000).step_by(3) {
        map.insert(cp, vec![cp / 2, 0x300 + cp % 0x40, 0x301]);
    }
    let mut group = c.benchmark_group("lookup::LookupTables::build");
    group.throughput(Throughput::Elements(map.len() as u64));
    group.bench_function("3 values", |b| b.iter(|| LookupTables::build(&map)));
    group.finish();

    let strings: Vec<String> = (0..4096u32).map(|i| format!("{}{}", i % 512, "\u{DF}")).collect();
    let mut group = c.benchmark_group("interner::StringInterner::intern");
    group.throughput(Throughput::Elements(strings.len() as u64));
    group.bench_function("12.5% unique", |b| {
        b.iter(|| {
            let mut interner = StringInterner::new();
            for s in &strings {
                interner.intern(s);
            }
            interner
        })
    });
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
