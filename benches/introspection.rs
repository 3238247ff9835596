use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use structmeta::{normalize, reflect_struct, to_struct, to_structs, to_value};

reflect_struct! {
    #[derive(Clone, serde::Serialize)]
    pub struct Address => r#"vm:"address""# {
        pub street: String,
        pub city: String,
    }
}

reflect_struct! {
    #[derive(Clone, serde::Serialize)]
    pub struct Patient => r#"vm:"patient""# {
        pub id: u64 => r#"vm:"patientid""#,
        pub name: String,
        pub codes: Vec<String> => r#"export:"true""#,
        pub address: Option<Box<Address>> => r#"struct:"true""#,
        pub score: f64,
    }
}

fn patient(id: u64) -> Patient {
    Patient {
        id,
        name: format!("patient-{}", id),
        codes: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        address: Some(Box::new(Address {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
        })),
        score: id as f64 / 10.0,
    }
}

fn benchmark_normalize(c: &mut Criterion) {
    let value = patient(1);
    let nested = Some(Box::new(Some(Box::new(value.clone()))));

    let mut group = c.benchmark_group("normalize");
    group.bench_function("struct", |b| b.iter(|| normalize(black_box(&value))));
    group.bench_function("pointer_chain", |b| b.iter(|| normalize(black_box(&nested))));
    group.bench_function("nil_pointer", |b| {
        b.iter(|| normalize(black_box(&None::<Box<Patient>>)))
    });
    group.finish();
}

fn benchmark_fields(c: &mut Criterion) {
    let s = to_struct(&patient(1)).unwrap();

    let mut group = c.benchmark_group("fields");
    group.bench_function("enumerate", |b| b.iter(|| black_box(&s).fields()));
    group.bench_function("with_tag_true", |b| {
        b.iter(|| black_box(&s).fields().with_tag_true("struct"))
    });
    group.bench_function("by_names", |b| {
        b.iter(|| black_box(&s).fields().by_names(["name", "score"]))
    });
    group.bench_function("identifiers", |b| b.iter(|| black_box(&s).fields().identifiers()));
    group.finish();
}

fn benchmark_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_data_by_name");

    for size in [10, 100, 1000].iter() {
        let patients: Vec<Patient> = (0..*size).map(patient).collect();
        let structs = to_structs(&patients).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &structs, |b, structs| {
            b.iter(|| structs.extract_data_by_name(black_box(["codes", "score"])))
        });
    }

    group.finish();
}

fn benchmark_to_structs(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_structs");

    for size in [10, 100, 1000].iter() {
        let patients: Vec<Patient> = (0..*size).map(patient).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &patients, |b, patients| {
            b.iter(|| to_structs(black_box(patients)))
        });
    }

    group.finish();
}

fn benchmark_serde_bridge(c: &mut Criterion) {
    let value = patient(1);

    c.bench_function("to_value", |b| b.iter(|| to_value(black_box(&value))));
}

criterion_group!(
    benches,
    benchmark_normalize,
    benchmark_fields,
    benchmark_extract,
    benchmark_to_structs,
    benchmark_serde_bridge
);
criterion_main!(benches);
