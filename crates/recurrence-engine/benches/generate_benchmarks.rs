use std::hint::black_box;

use chrono::{NaiveDate, Weekday};
use criterion::{criterion_group, criterion_main, Criterion};
use recurrence_engine::{generate, MonthlyPattern, RecurrenceConfig, WeeklyPattern};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn bench_daily_preview(c: &mut Criterion) {
    let config = RecurrenceConfig::daily(start());

    c.bench_function("daily_preview_50", |b| {
        b.iter(|| generate(black_box(&config), black_box(50)))
    });
}

fn bench_weekly_preview(c: &mut Criterion) {
    let pattern = WeeklyPattern::new([Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    let config = RecurrenceConfig::weekly(start(), pattern).with_interval(3);

    c.bench_function("weekly_preview_50", |b| {
        b.iter(|| generate(black_box(&config), black_box(50)))
    });
}

fn bench_empty_weekly(c: &mut Criterion) {
    let config = RecurrenceConfig::weekly(start(), WeeklyPattern::default());

    c.bench_function("weekly_empty_pattern", |b| {
        b.iter(|| generate(black_box(&config), black_box(10_000)))
    });
}

fn bench_monthly_patterns(c: &mut Criterion) {
    let fifth_monday = RecurrenceConfig::monthly(
        start(),
        MonthlyPattern::Weekday {
            weekday: 1,
            week_number: 5,
        },
    );
    // Worst case: every step misses until the consecutive-miss cap.
    let never = RecurrenceConfig::monthly(
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        MonthlyPattern::Date { day_of_month: 30 },
    )
    .with_interval(12);

    let mut group = c.benchmark_group("monthly");
    group.bench_function("fifth_monday_50", |b| {
        b.iter(|| generate(black_box(&fifth_monday), black_box(50)))
    });
    group.bench_function("unsatisfiable_day_30", |b| {
        b.iter(|| generate(black_box(&never), black_box(50)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_daily_preview,
    bench_weekly_preview,
    bench_empty_weekly,
    bench_monthly_patterns
);
criterion_main!(benches);
