use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weather_windower::models::{Measurements, ObservationRecord, ObservationRecordBuilder};
use weather_windower::processors::{Purger, Segmenter, Windower};
use weather_windower::{build_dataset, PipelineConfig};

// Create test data for benchmarking: every 40th day is missing so that
// segmentation sees both rollovers and gaps
fn create_test_records(location_count: usize, days: i64) -> Vec<ObservationRecord> {
    let mut records = Vec::new();

    for location in 0..location_count {
        let name = format!("Station{}", location);
        for day in (0..days).filter(|d| d % 40 != 39) {
            let base = 15.0 + (day as f64) * 0.01 + location as f64;
            let record = ObservationRecordBuilder::new()
                .location(name.as_str())
                .measurements(Measurements::from_array([
                    base - 5.0,
                    base + 5.0,
                    0.2,
                    35.0,
                    12.0,
                    18.0,
                    65.0,
                    45.0,
                    1016.0,
                    1013.0,
                    4.0,
                    5.0,
                    base - 1.0,
                    base + 4.0,
                ]))
                .day_index(day)
                .calendar(2010, 1)
                .location_hash(location as i64)
                .build()
                .unwrap();
            records.push(record);
        }
    }

    records
}

fn benchmark_segmentation(c: &mut Criterion) {
    let records = create_test_records(20, 3650);

    c.bench_function("segment_and_purge", |b| {
        b.iter(|| {
            let segmentation = Segmenter::new(14).unwrap().segment(black_box(&records));
            Purger::new(14).purge(segmentation.blocks)
        })
    });
}

fn benchmark_windowing(c: &mut Criterion) {
    let records = create_test_records(20, 3650);
    let blocks = Purger::new(14)
        .purge(Segmenter::new(14).unwrap().segment(&records).blocks)
        .retained;

    let mut group = c.benchmark_group("window_blocks");
    for workers in [1, 2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(workers), workers, |b, &workers| {
            let windower = Windower::new(14, PipelineConfig::default().field_order)
                .with_max_workers(workers);
            b.iter(|| windower.window_blocks(black_box(&blocks)).unwrap())
        });
    }
    group.finish();
}

fn benchmark_build_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_dataset");

    for locations in [5, 20, 49].iter() {
        let records = create_test_records(*locations, 1825);
        let config = PipelineConfig::default();

        group.bench_with_input(BenchmarkId::from_parameter(locations), &records, |b, records| {
            b.iter(|| build_dataset(black_box(records), &config).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_segmentation,
    benchmark_windowing,
    benchmark_build_dataset
);
criterion_main!(benches);
