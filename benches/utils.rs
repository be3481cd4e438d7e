//! 工具函数性能基准测试

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linktrio::services::metadata::extractor::extract;
use linktrio::services::{CodeGenerator, RandomCodeGenerator, bucket_by_day};
use linktrio::utils::{is_reserved_code, validate_url};
use url::Url;

// ============== 短码生成 ==============

fn bench_generate_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_code");
    let generator = RandomCodeGenerator;

    for length in [6, 8, 12, 20] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| {
                let code = generator.generate(length);
                assert_eq!(code.len(), length);
            });
        });
    }

    group.bench_function("reserved_check", |b| {
        b.iter(|| {
            assert!(is_reserved_code("Health"));
            assert!(!is_reserved_code("abc123"));
        });
    });

    group.finish();
}

// ============== validate_url ==============

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("valid_https", |b| {
        b.iter(|| {
            assert!(validate_url("https://example.com/path?query=1").is_ok());
        });
    });

    group.bench_function("invalid_scheme", |b| {
        b.iter(|| {
            assert!(validate_url("javascript:alert(1)").is_err());
        });
    });

    group.bench_function("invalid_empty", |b| {
        b.iter(|| {
            assert!(validate_url("").is_err());
        });
    });

    let long_url = format!("https://example.com/{}", "a".repeat(1000));
    group.bench_function("valid_long_url", |b| {
        b.iter(|| {
            assert!(validate_url(&long_url).is_ok());
        });
    });

    group.finish();
}

// ============== HTML 元数据提取 ==============

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata/extract");
    let page_url = Url::parse("https://example.com/article").unwrap();

    let small = r#"<html><head><title>Example</title>
        <meta name="description" content="A short page">
        <link rel="icon" href="/icon.png"></head><body></body></html>"#;
    group.bench_function("small_page", |b| {
        b.iter(|| {
            let summary = extract(small, &page_url);
            assert_eq!(summary.title, "Example");
        });
    });

    let paragraphs = "<p>Lorem ipsum dolor sit amet.</p>".repeat(2000);
    let large = format!(
        r#"<html><head><meta property="og:title" content="Big"></head><body>{}</body></html>"#,
        paragraphs
    );
    group.bench_function("large_page_og_fallback", |b| {
        b.iter(|| {
            let summary = extract(&large, &page_url);
            assert_eq!(summary.title, "Big");
        });
    });

    group.finish();
}

// ============== 点击按天分桶 ==============

fn bench_bucket_by_day(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics/bucket_by_day");
    let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
    let base = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();

    for count in [100usize, 10_000] {
        let times: Vec<_> = (0..count)
            .map(|i| base + Duration::minutes((i % (7 * 24 * 60)) as i64))
            .collect();
        group.bench_with_input(BenchmarkId::new("clicks", count), &times, |b, times| {
            b.iter(|| {
                let buckets = bucket_by_day(times, start, 7);
                assert_eq!(buckets.len(), 7);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_code,
    bench_validate_url,
    bench_extract,
    bench_bucket_by_day,
);
criterion_main!(benches);
