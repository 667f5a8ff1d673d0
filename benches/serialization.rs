use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use serde_datafmt::{
    csv, csv_by_row, json, to_csv, to_json, to_json_pretty, to_toml, to_value, to_yaml, toml,
    yaml, CsvOptions, Delimiter, Value,
};

#[derive(Serialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Clone)]
struct Deployment {
    name: String,
    replicas: u32,
    labels: Vec<String>,
    limits: Limits,
    users: Vec<User>,
}

#[derive(Serialize, Clone)]
struct Limits {
    cpu: f64,
    memory: String,
}

fn users(size: usize) -> Vec<User> {
    (0..size)
        .map(|i| User {
            id: i as u32,
            name: format!("User{}", i),
            email: format!("user{}@example.com", i),
            active: i % 2 == 0,
        })
        .collect()
}

fn document(size: usize) -> Value {
    to_value(&Deployment {
        name: "gateway".to_string(),
        replicas: 3,
        labels: vec!["edge".to_string(), "public".to_string()],
        limits: Limits {
            cpu: 1.5,
            memory: "512Mi".to_string(),
        },
        users: users(size),
    })
    .unwrap()
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [10, 100, 1000].iter() {
        let value = document(*size);
        group.bench_with_input(BenchmarkId::new("json", size), &value, |b, v| {
            b.iter(|| to_json(black_box(v)))
        });
        group.bench_with_input(BenchmarkId::new("json_pretty", size), &value, |b, v| {
            b.iter(|| to_json_pretty("  ", black_box(v)))
        });
        group.bench_with_input(BenchmarkId::new("yaml", size), &value, |b, v| {
            b.iter(|| to_yaml(black_box(v)))
        });
        group.bench_with_input(BenchmarkId::new("toml", size), &value, |b, v| {
            b.iter(|| to_toml(black_box(v)))
        });
    }
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [10, 100, 1000].iter() {
        let value = document(*size);
        let json_text = to_json(&value).unwrap();
        let yaml_text = to_yaml(&value).unwrap();
        let toml_text = to_toml(&value).unwrap();

        group.bench_with_input(BenchmarkId::new("json", size), &json_text, |b, text| {
            b.iter(|| json(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("yaml", size), &yaml_text, |b, text| {
            b.iter(|| yaml(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("toml", size), &toml_text, |b, text| {
            b.iter(|| toml(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv");
    let options = CsvOptions::new();

    for size in [10, 100, 1000].iter() {
        let mut rows = vec![vec![
            "id".to_string(),
            "name".to_string(),
            "email".to_string(),
        ]];
        rows.extend(
            users(*size)
                .into_iter()
                .map(|u| vec![u.id.to_string(), u.name, u.email]),
        );
        let text = to_csv(&rows, Delimiter::COMMA).unwrap();

        group.bench_with_input(BenchmarkId::new("matrix", size), &text, |b, text| {
            b.iter(|| csv(black_box(text), &options))
        });
        group.bench_with_input(BenchmarkId::new("by_row", size), &text, |b, text| {
            b.iter(|| csv_by_row(black_box(text), &options))
        });
        group.bench_with_input(BenchmarkId::new("encode", size), &rows, |b, rows| {
            b.iter(|| to_csv(black_box(rows), Delimiter::COMMA))
        });
    }
    group.finish();
}

fn benchmark_to_value(c: &mut Criterion) {
    let deployment = users(100);

    c.bench_function("to_value_100_users", |b| {
        b.iter(|| to_value(black_box(&deployment)))
    });
}

fn benchmark_conversion(c: &mut Criterion) {
    let yaml_text = to_yaml(&document(100)).unwrap();

    c.bench_function("yaml_to_json", |b| {
        b.iter(|| {
            let value = yaml(black_box(&yaml_text)).unwrap();
            to_json(&value).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_decode,
    benchmark_csv,
    benchmark_to_value,
    benchmark_conversion
);
criterion_main!(benches);
