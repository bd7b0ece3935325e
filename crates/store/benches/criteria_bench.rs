use criterion::{Criterion, criterion_group, criterion_main};
use serde::Serialize;
use store::{Criteria, FilterOperator, SortDirection, engine};

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Row {
    name: String,
    capacity: u32,
    status: &'static str,
    created_at: String,
}

fn rows(n: usize) -> Vec<Row> {
    const STATUSES: [&str; 4] = ["PLANTED", "GROWING", "HARVESTED", "DEAD"];
    (0..n)
        .map(|i| Row {
            name: format!("Plant {i:05}"),
            capacity: (i % 20) as u32,
            status: STATUSES[i % STATUSES.len()],
            created_at: format!("2024-01-01T00:{:02}:{:02}Z", (i / 60) % 60, i % 60),
        })
        .collect()
}

fn bench_filter_sort_paginate(c: &mut Criterion) {
    let data = rows(1_000);
    let criteria = Criteria::new()
        .filter("status", FilterOperator::In, serde_json::json!(["GROWING", "PLANTED"]))
        .filter("capacity", FilterOperator::GreaterThan, 5)
        .sort("createdAt", SortDirection::Desc)
        .paginate(2, 25);

    c.bench_function("criteria/filter_sort_paginate_1000", |b| {
        b.iter(|| engine::apply(data.clone(), &criteria).unwrap());
    });
}

fn bench_like(c: &mut Criterion) {
    let data = rows(1_000);
    let criteria = Criteria::new().filter("name", FilterOperator::Like, "plant 00%");

    c.bench_function("criteria/like_1000", |b| {
        b.iter(|| engine::apply(data.clone(), &criteria).unwrap());
    });
}

criterion_group!(benches, bench_filter_sort_paginate, bench_like);
criterion_main!(benches);
