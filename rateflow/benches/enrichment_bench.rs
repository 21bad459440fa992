//! Benchmarks for the per-listing hot paths and a full in-memory run.

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rateflow::calendar::FixedClock;
use rateflow::extract::EmbeddedStateExtractor;
use rateflow::peaks::top_n;
use rateflow::pipeline::EnrichmentPipeline;
use rateflow::testing::{detail_url, listing, RatePage, StaticFetcher};

fn year_of_rates() -> Vec<f64> {
    (0..396_i32).map(|i| 80.0 + f64::from((i * 37) % 211)).collect()
}

fn begin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn peak_benchmark(c: &mut Criterion) {
    let rates = year_of_rates();
    c.bench_function("top_n_3_of_396", |b| b.iter(|| top_n(black_box(&rates), 3)));
}

fn extract_benchmark(c: &mut Criterion) {
    let html = RatePage::new(begin(), year_of_rates()).html();
    let extractor = EmbeddedStateExtractor::new();
    c.bench_function("extract_rate_summary", |b| {
        b.iter(|| extractor.extract(black_box(&html)))
    });
}

fn run_benchmark(c: &mut Criterion) {
    let ids: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    let page = RatePage::new(begin(), year_of_rates()).html();
    let fetcher = ids
        .iter()
        .fold(StaticFetcher::new(), |f, id| f.with_page(detail_url(id), page.clone()));
    let pipeline = EnrichmentPipeline::new(Arc::new(fetcher))
        .with_clock(Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default())));
    let listings: Vec<_> = ids.iter().map(|id| listing(id)).collect();

    let Ok(runtime) = tokio::runtime::Runtime::new() else {
        return;
    };
    c.bench_function("run_50_listings", |b| {
        b.iter(|| runtime.block_on(pipeline.run(black_box(&listings), 50)))
    });
}

criterion_group!(benches, peak_benchmark, extract_benchmark, run_benchmark);
criterion_main!(benches);
