//! Benchmarks for validity resolution.
//!
//! These benchmarks measure the per-render field check and the whole-form
//! check run on submit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use form_state::validity::{is_invalid, validator, ValidationAdapter};
use form_state::{FormData, FormDefinition};
use serde_json::json;

fn registration_data() -> FormData {
    json!({
        "email": "someone@example.com",
        "password": "correct horse",
        "password2": "correct horse",
        "terms": true,
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

fn bench_field_native(c: &mut Criterion) {
    let mut surface = FormDefinition::registration().surface().unwrap();
    let data = registration_data();

    c.bench_function("validity_field_native_email", |b| {
        b.iter(|| is_invalid(Some(&mut surface), black_box(&data), "email", None))
    });
}

fn bench_field_custom(c: &mut Criterion) {
    let mut surface = FormDefinition::registration().surface().unwrap();
    let data = registration_data();
    let matches = validator(|value, data, _| data.get("password") == Some(value));

    c.bench_function("validity_field_custom_match", |b| {
        b.iter(|| {
            is_invalid(
                Some(&mut surface),
                black_box(&data),
                "password2",
                Some(&matches),
            )
        })
    });
}

fn bench_whole_form(c: &mut Criterion) {
    let mut surface = FormDefinition::registration().surface().unwrap();
    for (name, value) in registration_data() {
        surface.write_value(&name, &value);
    }

    c.bench_function("validity_whole_form", |b| {
        b.iter(|| black_box(&surface).check_validity())
    });
}

criterion_group!(
    benches,
    bench_field_native,
    bench_field_custom,
    bench_whole_form
);
criterion_main!(benches);
