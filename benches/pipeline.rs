//! Pipeline benchmark: JSON body → validation → feature vector.

use botsense::detector::BotDetector;
use botsense::inference::InferencePipeline;
use botsense::model::ModelSlot;
use botsense::schema::{TelemetrySchema, SCALAR_FIELDS};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value};

fn make_payload(clicks: usize) -> Value {
    let mut map = Map::new();
    for (i, (name, _)) in SCALAR_FIELDS.iter().enumerate() {
        map.insert(name.to_string(), json!(i as f64));
    }
    map.insert(
        "Time_per_Field".into(),
        json!({"username": 2.5, "password": 1.75, "email": 3.0}),
    );
    let labels = ["left_click", "right_click", "double_click", "middle_click", "swipe"];
    let seq: Vec<&str> = (0..clicks).map(|i| labels[i % labels.len()]).collect();
    map.insert("Sequence_of_Clicks".into(), json!(seq));
    Value::Object(map)
}

fn detector() -> BotDetector {
    let pipeline = InferencePipeline::new(
        ModelSlot::Unavailable("bench".into()),
        ModelSlot::Unavailable("bench".into()),
        ModelSlot::Unavailable("bench".into()),
    );
    BotDetector::new(TelemetrySchema::default(), pipeline)
}

fn bench_validate_and_vectorize(c: &mut Criterion) {
    let detector = detector();
    let payload = make_payload(20);
    let map = payload.as_object().unwrap().clone();

    c.bench_function("validate_vectorize_20_clicks", |b| {
        b.iter(|| {
            let record = detector.validate(black_box(&map)).unwrap();
            black_box(detector.vectorize(&record).unwrap())
        })
    });
}

fn bench_parse_body(c: &mut Criterion) {
    let body = make_payload(20).to_string().into_bytes();

    c.bench_function("parse_body", |b| b.iter(|| black_box(BotDetector::parse(black_box(&body)).unwrap())));
}

fn bench_click_sequence_length(c: &mut Criterion) {
    let detector = detector();
    let mut g = c.benchmark_group("vectorize_by_clicks");
    for n in [0, 10, 100, 1000] {
        let map = make_payload(n).as_object().unwrap().clone();
        g.bench_function(format!("clicks_{}", n).as_str(), |b| {
            b.iter(|| {
                let record = detector.validate(black_box(&map)).unwrap();
                black_box(detector.vectorize(&record).unwrap())
            })
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_validate_and_vectorize,
    bench_parse_body,
    bench_click_sequence_length
);
criterion_main!(benches);
