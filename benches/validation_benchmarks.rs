use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fieldwork::validators::{is_email, is_float, is_ip, is_url};
use fieldwork::*;

fn bench_email_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("email_validation");

    let valid_emails = vec![
        "user@example.com",
        "test.user+tag@domain.co.uk",
        "admin@subdomain.example.com",
    ];

    let invalid_emails = vec!["invalid-email", "@example.com", "user@"];

    group.bench_function("valid_emails", |b| {
        b.iter(|| {
            for email in &valid_emails {
                black_box(is_email(black_box(email)));
            }
        })
    });

    group.bench_function("invalid_emails", |b| {
        b.iter(|| {
            for email in &invalid_emails {
                black_box(is_email(black_box(email)));
            }
        })
    });

    group.finish();
}

fn bench_format_validators(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_validators");

    group.bench_function("url", |b| {
        b.iter(|| is_url(black_box("https://sub.example.com/path?q=1"), UrlFlags::default()))
    });

    group.bench_function("ip", |b| {
        b.iter(|| is_ip(black_box("192.168.1.10"), IpFlags::default().no_private_range()))
    });

    group.bench_function("float_thousands", |b| {
        let flags = FloatFlags {
            allow_thousand: true,
        };
        b.iter(|| is_float(black_box("1,234,567.89"), flags))
    });

    group.finish();
}

fn bench_date_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("date_conversion");
    let value = Value::from("06/15/2020 14:30");

    group.bench_function("with_format", |b| {
        b.iter(|| convert_to_date(black_box(&value), Some("m/d/Y H:i"), Timezone::Utc))
    });

    group.bench_function("free_form", |b| {
        let value = Value::from("2020-06-15T14:30:00Z");
        b.iter(|| convert_to_date(black_box(&value), None, Timezone::Utc))
    });

    group.finish();
}

fn bench_form_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("form_validation");

    let input = vec![
        ("name", " Ann Lee "),
        ("email", "ann@example.com"),
        ("age", "34"),
        ("starts", "03/01/2021"),
        ("ends", "04/01/2021"),
    ];

    group.bench_function("valid_form", |b| {
        b.iter(|| {
            let mut v = Validator::new(black_box(input.clone()));
            v.field("name").required(None, None).unwrap().length(2, 50, None).unwrap();
            v.field("email").required(None, None).unwrap().email(None).unwrap();
            v.field("age").to_int().unwrap().int_range(1, 120, None).unwrap();
            v.field("starts").to_date_time(None, None, None).unwrap();
            v.field("ends")
                .to_date_time(None, None, None)
                .unwrap()
                .after_field("starts", None)
                .unwrap();
            v.all_valid()
        })
    });

    group.bench_function("failing_form", |b| {
        b.iter(|| {
            let mut v = Validator::new(black_box(vec![("email", "nope"), ("age", "abc")]));
            v.field("email").required(None, None).unwrap().email(None).unwrap();
            v.field("age").to_int().unwrap().int_range(1, 120, None).unwrap();
            v.errors()
        })
    });

    group.finish();
}

fn bench_named_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("named_rules");

    group.bench_function("seeded_alpha", |b| {
        b.iter(|| {
            let mut v = Validator::new([("word", black_box("Fieldwork"))]);
            v.field("word").apply_named_rule("alpha", None).unwrap();
            v.is_valid()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_email_validation,
    bench_format_validators,
    bench_date_conversion,
    bench_form_validation,
    bench_named_rules,
);

criterion_main!(benches);
