//! Property-based tests for recurrence expansion using proptest.
//!
//! These tests verify invariants that should hold for *any* configuration,
//! including empty and impossible patterns, not just the examples in
//! `expander_tests.rs`.

use chrono::{Datelike, Days, Months, NaiveDate};
use proptest::prelude::*;
use recurrence_engine::calendar::{weekday_index, LAST_WEEK};
use recurrence_engine::{generate, MonthlyPattern, RecurrenceConfig, RecurrenceRule, WeeklyPattern};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Start dates between 2000-01-01 and roughly 2035.
fn arb_start() -> impl Strategy<Value = NaiveDate> {
    (0u64..12_800).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

/// Weekday index sets, deliberately including the empty set and an
/// out-of-range index.
fn arb_weekly() -> impl Strategy<Value = WeeklyPattern> {
    prop::collection::btree_set(0u8..=7, 0..=7).prop_map(|days_of_week| WeeklyPattern { days_of_week })
}

/// Monthly patterns, including some that no month can satisfy.
fn arb_monthly() -> impl Strategy<Value = MonthlyPattern> {
    prop_oneof![
        (0u32..=32).prop_map(|day_of_month| MonthlyPattern::Date { day_of_month }),
        (0u8..=7, -2i8..=6).prop_map(|(weekday, week_number)| MonthlyPattern::Weekday {
            weekday,
            week_number,
        }),
    ]
}

fn arb_rule() -> impl Strategy<Value = RecurrenceRule> {
    prop_oneof![
        Just(RecurrenceRule::Daily),
        arb_weekly().prop_map(|weekly_pattern| RecurrenceRule::Weekly { weekly_pattern }),
        arb_monthly().prop_map(|monthly_pattern| RecurrenceRule::Monthly { monthly_pattern }),
        Just(RecurrenceRule::Yearly),
    ]
}

/// End date as an optional offset from the start; negative offsets put the
/// end before the start.
fn arb_config() -> impl Strategy<Value = RecurrenceConfig> {
    (
        arb_rule(),
        0u32..=15,
        arb_start(),
        prop::option::of(-30i64..=2_000),
    )
        .prop_map(|(rule, interval, start_date, end_offset)| RecurrenceConfig {
            rule,
            interval,
            start_date,
            end_date: end_offset.and_then(|days| {
                if days >= 0 {
                    start_date.checked_add_days(Days::new(days as u64))
                } else {
                    start_date.checked_sub_days(Days::new(days.unsigned_abs()))
                }
            }),
        })
}

fn arb_max_dates() -> impl Strategy<Value = usize> {
    0usize..=80
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: never more than max_dates
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn length_bounded_by_max_dates(cfg in arb_config(), max in arb_max_dates()) {
        let dates = generate(&cfg, max);
        prop_assert!(dates.len() <= max, "got {} dates for max {}", dates.len(), max);
    }
}

// ---------------------------------------------------------------------------
// Property 2: strictly increasing, inside [start, end]
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn strictly_increasing_within_bounds(cfg in arb_config(), max in arb_max_dates()) {
        let dates = generate(&cfg, max);

        for window in dates.windows(2) {
            prop_assert!(window[0] < window[1], "not increasing: {} then {}", window[0], window[1]);
        }
        for date in &dates {
            prop_assert!(*date >= cfg.start_date, "{} before start {}", date, cfg.start_date);
            if let Some(end) = cfg.end_date {
                prop_assert!(*date <= end, "{} after end {}", date, end);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: every date satisfies the rule's pattern
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn dates_match_their_pattern(cfg in arb_config(), max in arb_max_dates()) {
        let dates = generate(&cfg, max);
        let interval = i64::from(cfg.effective_interval());

        match &cfg.rule {
            RecurrenceRule::Daily => {
                for date in &dates {
                    let days = (*date - cfg.start_date).num_days();
                    prop_assert_eq!(days % interval, 0);
                }
            }
            RecurrenceRule::Weekly { weekly_pattern } => {
                for date in &dates {
                    prop_assert!(weekly_pattern.contains(date.weekday()));
                }
                // Each date is the first pattern day after its predecessor.
                for window in dates.windows(2) {
                    let skipped = window[0]
                        .iter_days()
                        .skip(1)
                        .take_while(|d| *d < window[1])
                        .find(|d| weekly_pattern.contains(d.weekday()));
                    prop_assert_eq!(skipped, None, "pattern day skipped before {}", window[1]);
                }
            }
            RecurrenceRule::Monthly { monthly_pattern } => {
                for date in &dates {
                    match *monthly_pattern {
                        MonthlyPattern::Date { day_of_month } => {
                            prop_assert_eq!(date.day(), day_of_month);
                        }
                        MonthlyPattern::Weekday { weekday, week_number } => {
                            prop_assert_eq!(weekday_index(date.weekday()), weekday);
                            if week_number != LAST_WEEK {
                                prop_assert_eq!(date.day().div_ceil(7), week_number as u32);
                            }
                        }
                    }
                    let months = (date.year() - cfg.start_date.year()) * 12
                        + date.month() as i32
                        - cfg.start_date.month() as i32;
                    prop_assert_eq!(i64::from(months) % interval, 0);
                }
            }
            RecurrenceRule::Yearly => {
                for date in &dates {
                    prop_assert_eq!(date.month(), cfg.start_date.month());
                    let years = i64::from(date.year() - cfg.start_date.year());
                    prop_assert_eq!(years % interval, 0);
                }
                // Each date steps from the previous one, not from the start.
                let step = Months::new(cfg.effective_interval() * 12);
                for window in dates.windows(2) {
                    prop_assert_eq!(window[0].checked_add_months(step), Some(window[1]));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: unbounded daily and yearly rules always fill the cap
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn unbounded_daily_and_yearly_fill_max_dates(
        start in arb_start(),
        interval in 1u32..=15,
        yearly in any::<bool>(),
        max in arb_max_dates(),
    ) {
        let cfg = if yearly {
            RecurrenceConfig::yearly(start)
        } else {
            RecurrenceConfig::daily(start)
        }
        .with_interval(interval);

        let dates = generate(&cfg, max);
        prop_assert_eq!(dates.len(), max);
        if max > 0 {
            prop_assert_eq!(dates[0], start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: the start date leads whenever it satisfies the pattern
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn start_date_leads_when_valid(
        start in arb_start(),
        weekly in arb_weekly(),
        interval in 1u32..=15,
    ) {
        let cfg = RecurrenceConfig::weekly(start, weekly.clone()).with_interval(interval);
        let dates = generate(&cfg, 5);

        if weekly.contains(start.weekday()) {
            prop_assert_eq!(dates.first(), Some(&start));
        } else {
            prop_assert!(dates.first() != Some(&start));
        }
        if weekly.is_empty() {
            prop_assert!(dates.is_empty());
        }
    }
}
