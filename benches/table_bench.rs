//! Benchmarks for LinKV table operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use linkv::{Config, LinearHashTable};

const VALUE_SIZE: u32 = 16;

fn fresh_table(temp: &TempDir) -> LinearHashTable {
    let config = Config::builder()
        .data_dir(temp.path())
        .base_size(16)
        .split_threshold(85)
        .records_per_bucket(8)
        .value_size(VALUE_SIZE)
        .build();
    LinearHashTable::create(config).unwrap()
}

fn bench_put(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let mut table = fresh_table(&temp);
    let value = vec![0xABu8; VALUE_SIZE as usize];
    let mut key = 0i32;

    c.bench_function("put_sequential", |b| {
        b.iter(|| {
            table.put(black_box(key), black_box(&value)).unwrap();
            key += 1;
        })
    });
}

fn bench_get(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let mut table = fresh_table(&temp);
    let value = vec![0xABu8; VALUE_SIZE as usize];

    for key in 0..10_000 {
        table.put(key, &value).unwrap();
    }

    let mut key = 0i32;
    c.bench_function("get_hit", |b| {
        b.iter(|| {
            let found = table.get(black_box(key % 10_000)).unwrap();
            black_box(found);
            key += 1;
        })
    });
}

criterion_group!(benches, bench_put, bench_get);
criterion_main!(benches);
