use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kwtally::{count_line, KeywordProcessor, KeywordSet, LineSource, ParallelConfig};

fn sample_text(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 4 {
            0 => format!("2023-10-28 12:00:{:02} - INFO - request {} served\n", i % 60, i),
            1 => format!("2023-10-28 12:00:{:02} - ERROR - upstream {} failed\n", i % 60, i),
            2 => format!("2023-10-28 12:00:{:02} - DEBUG - cache probe {}\n", i % 60, i),
            _ => format!("2023-10-28 12:00:{:02} - TRACE - heartbeat\n", i % 60),
        })
        .collect()
}

fn bench_count_line_hit(c: &mut Criterion) {
    let keywords = KeywordSet::new(["INFO", "ERROR", "DEBUG"]).unwrap();
    let line = "2023-10-28 12:00:03 - ERROR - Database connection failed";
    c.bench_function("count_line_hit", |b| {
        b.iter(|| {
            black_box(count_line(black_box(line), &keywords));
        });
    });
}

fn bench_count_line_miss(c: &mut Criterion) {
    let keywords = KeywordSet::new(["INFO", "ERROR", "DEBUG"]).unwrap();
    let line = "2023-10-28 12:00:03 - TRACE - heartbeat from node-7";
    c.bench_function("count_line_miss", |b| {
        b.iter(|| {
            black_box(count_line(black_box(line), &keywords));
        });
    });
}

fn bench_count_line_unicode(c: &mut Criterion) {
    let keywords = KeywordSet::new(["straße", "error"]).unwrap();
    let line = "Fehler in der Straße: error code 7 🚀";
    c.bench_function("count_line_unicode", |b| {
        b.iter(|| {
            black_box(count_line(black_box(line), &keywords));
        });
    });
}

fn bench_pipeline_workers(c: &mut Criterion) {
    let text = sample_text(50_000);
    let mut group = c.benchmark_group("pipeline_workers");
    group.throughput(Throughput::Elements(50_000));
    group.sample_size(20);

    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &n| {
            b.iter(|| {
                let processor = KeywordProcessor::new(
                    ParallelConfig::with_workers(n),
                    KeywordSet::new(["INFO", "ERROR", "DEBUG"]).unwrap(),
                )
                .unwrap();
                let source =
                    LineSource::from_reader(Cursor::new(text.as_bytes().to_vec()), "bench")
                        .unwrap();
                black_box(processor.process(source).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_pipeline_batch_size(c: &mut Criterion) {
    let text = sample_text(50_000);
    let mut group = c.benchmark_group("pipeline_batch_size");
    group.sample_size(20);

    for batch_size in [10usize, 100, 1000, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &size| {
                b.iter(|| {
                    let config = ParallelConfig {
                        batch_size: size,
                        ..ParallelConfig::with_workers(4)
                    };
                    let processor = KeywordProcessor::new(
                        config,
                        KeywordSet::new(["INFO", "ERROR", "DEBUG"]).unwrap(),
                    )
                    .unwrap();
                    let source =
                        LineSource::from_reader(Cursor::new(text.as_bytes().to_vec()), "bench")
                            .unwrap();
                    black_box(processor.process(source).unwrap());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    line_counter_benches,
    bench_count_line_hit,
    bench_count_line_miss,
    bench_count_line_unicode,
    bench_pipeline_workers,
    bench_pipeline_batch_size
);
criterion_main!(line_counter_benches);
