use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use shapeless::accessor::{properties, resolve_read};
use shapeless::introspect;
use shapeless::serializer::{render_records, Rendering, Row};

// ------------- Reading -------------
#[derive(Default)]
pub struct Reading {
    sensor: String,
    value: f64,
    sequence: i64,
    note: Option<String>,
}

impl Reading {
    fn label(&self) -> String {
        format!("{}#{}", self.sensor, self.sequence)
    }
}

introspect! {
    Reading as "bench.Reading" {
        sensor: String,
        value: f64,
        sequence: i64,
        note: Option<String>,
    }
    getters {
        getLabel => label,
    }
}

fn rows(count: usize) -> Vec<Row> {
    let columns: Arc<[String]> = ["id", "sensor", "value", "note"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    (0..count)
        .map(|i| {
            Row::new(
                Arc::clone(&columns),
                vec![
                    Some(i.to_string()),
                    Some(format!("sensor-{}", i % 17)),
                    Some((i as f64 * 0.25).to_string()),
                    if i % 3 == 0 { None } else { Some("ok".to_string()) },
                ],
            )
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let reading = Reading {
        sensor: "north".into(),
        value: 21.5,
        sequence: 42,
        note: None,
    };
    c.bench_function("read field", |b| b.iter(|| resolve_read(black_box(&reading), "value")));
    c.bench_function("read accessor", |b| b.iter(|| resolve_read(black_box(&reading), "label")));
    c.bench_function("read missing", |b| b.iter(|| resolve_read(black_box(&reading), "unknown")));
    c.bench_function("properties", |b| b.iter(|| properties(black_box(&reading))));

    let r = rows(1);
    c.bench_function("render 1", |b| b.iter(|| render_records(black_box(&r), Rendering::Raw)));
    let r = rows(1_000);
    c.bench_function("render 1k", |b| b.iter(|| render_records(black_box(&r), Rendering::Raw)));
    c.bench_function("render 1k escaped", |b| b.iter(|| render_records(black_box(&r), Rendering::Escaped)));
    let r = rows(100_000);
    c.bench_function("render 100k", |b| b.iter(|| render_records(black_box(&r), Rendering::Raw)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
