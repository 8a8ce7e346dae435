//! Benchmarks for batch curve construction.
//!
//! Run with: cargo bench -p strata-engine

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use strata_engine::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn projection_curve(id: usize, shift: f64) -> Value {
    let mut helpers = vec![
        json!({ "type": "deposit", "rate": 0.031 + shift, "tenor": "3M" }),
        json!({ "type": "deposit", "rate": 0.032 + shift, "tenor": "6M" }),
    ];
    for (tenor, rate) in [("2Y", 0.033), ("5Y", 0.034), ("10Y", 0.035), ("30Y", 0.036)] {
        helpers.push(json!({
            "type": "swap", "rate": rate + shift, "tenor": tenor,
            "float_index": "EUR_6M", "discount_curve": "EUR_OIS"
        }));
    }
    json!({
        "spec": { "id": format!("CURVE_{id:04}"), "helpers": helpers },
        "query": {
            "grid": { "type": "range", "start": "2024-01-02", "end": "2054-01-02", "step": "1M" },
            "measures": [{ "measure": "discount" }, { "measure": "forward", "period": "6M" }]
        }
    })
}

fn create_request(size: usize) -> BatchRequest {
    let ois_helpers: Vec<Value> = [("1Y", 0.030), ("5Y", 0.029), ("10Y", 0.028), ("30Y", 0.027)]
        .iter()
        .map(|(tenor, rate)| {
            json!({ "type": "ois", "rate": rate, "tenor": tenor, "overnight_index": "ESTR" })
        })
        .collect();
    let mut curves = vec![json!({ "spec": { "id": "EUR_OIS", "helpers": ois_helpers } })];
    curves.extend((0..size).map(|i| projection_curve(i, i as f64 * 1e-5)));

    serde_json::from_value(json!({
        "as_of_date": "2024-01-02",
        "indices": [
            { "id": "ESTR", "kind": "overnight", "tenor": "1D", "fixing_days": 0 },
            { "id": "EUR_6M", "tenor": "6M" }
        ],
        "curves": curves
    }))
    .expect("valid request")
}

fn runner(parallel: bool) -> BatchRunner {
    BatchRunner::new(EngineConfig {
        parallel,
        ..EngineConfig::default()
    })
    .expect("valid config")
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_single_curve(c: &mut Criterion) {
    let request = create_request(1);
    let runner = runner(false);
    c.bench_function("single_curve", |b| b.iter(|| runner.run(black_box(&request))));
}

fn bench_batch_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(20);

    for size in [4, 16, 64] {
        let request = create_request(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sequential", size), &request, |b, request| {
            let runner = runner(false);
            b.iter(|| runner.run(black_box(request)));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &request, |b, request| {
            let runner = runner(true);
            b.iter(|| runner.run(black_box(request)));
        });
    }
    group.finish();
}

fn bench_cached_rebuild(c: &mut Criterion) {
    let request = create_request(16);
    let cache = Arc::new(InMemoryCurveCache::new());
    let runner = runner(true).with_cache(cache);
    runner.run(&request).expect("warm-up batch");

    c.bench_function("cached_batch_16", |b| b.iter(|| runner.run(black_box(&request))));
}

criterion_group!(benches, bench_single_curve, bench_batch_sizes, bench_cached_rebuild);
criterion_main!(benches);
