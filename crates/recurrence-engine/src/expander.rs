//! Recurrence expansion -- turns a [`RecurrenceConfig`] into concrete dates.
//!
//! Expansion is a pure function of its inputs. It never errors and never
//! loops without bound: every configuration, including empty or impossible
//! patterns, terminates with a (possibly empty) ascending list of dates.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::calendar;
use crate::pattern::{MonthlyPattern, RecurrenceConfig, RecurrenceRule, WeeklyPattern};

/// Preview length used when the caller does not choose one.
pub const DEFAULT_MAX_DATES: usize = 50;

/// How many month steps in a row may produce no date before a monthly rule
/// is treated as exhausted. Real patterns miss far fewer: a Feb 29 rule with
/// a 12-month interval misses at most 7 in a row, a fifth-weekday rule a few
/// dozen across century boundaries.
pub const MAX_CONSECUTIVE_MISSES: u32 = 120;

/// Outcome of asking a stepped rule for its k-th candidate.
enum Step {
    /// A date that satisfies the pattern.
    Hit(NaiveDate),
    /// No date in this step; the payload is the step's anchor so the caller
    /// can still stop once anchors pass the end date.
    Miss(NaiveDate),
    /// Date arithmetic left chrono's representable range.
    Exhausted,
}

/// [`generate`] capped at [`DEFAULT_MAX_DATES`].
pub fn generate_preview(config: &RecurrenceConfig) -> Vec<NaiveDate> {
    generate(config, DEFAULT_MAX_DATES)
}

/// Expand `config` into at most `max_dates` ascending, de-duplicated dates.
///
/// Every date is on or after `start_date` and on or before `end_date` when one
/// is set. The start date leads the sequence whenever it is itself valid
/// under the rule's pattern.
///
/// Empty weekly patterns and monthly patterns no month can satisfy return an
/// empty list immediately.
pub fn generate(config: &RecurrenceConfig, max_dates: usize) -> Vec<NaiveDate> {
    if max_dates == 0 || config.is_past_end(config.start_date) {
        return Vec::new();
    }

    let mut dates = match &config.rule {
        RecurrenceRule::Daily => expand_daily(config, max_dates),
        RecurrenceRule::Weekly { weekly_pattern } => expand_weekly(config, weekly_pattern, max_dates),
        RecurrenceRule::Monthly { monthly_pattern } => {
            expand_monthly(config, monthly_pattern, max_dates)
        }
        RecurrenceRule::Yearly => expand_yearly(config, max_dates),
    };

    // Nothing past the end date, whatever the loops did.
    dates.retain(|d| !config.is_past_end(*d));

    tracing::debug!(
        frequency = %config.frequency(),
        interval = config.interval,
        start = %config.start_date,
        end = ?config.end_date,
        max_dates,
        produced = dates.len(),
        "expanded recurrence"
    );

    dates
}

// ---------------------------------------------------------------------------
// Stepped frequencies: daily, monthly, yearly
// ---------------------------------------------------------------------------

/// Drive `step(k)` for k = 0, 1, 2, ... until the cap, the end date, date
/// overflow, or too many consecutive misses stops it.
///
/// `step` must return strictly increasing hits as k grows.
fn collect_steps(
    config: &RecurrenceConfig,
    max_dates: usize,
    mut step: impl FnMut(u32) -> Step,
) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(max_dates.min(DEFAULT_MAX_DATES));
    let mut misses = 0u32;
    let mut k = 0u32;

    while dates.len() < max_dates {
        match step(k) {
            Step::Hit(date) => {
                if config.is_past_end(date) {
                    break;
                }
                misses = 0;
                if date >= config.start_date && dates.last().is_none_or(|last| date > *last) {
                    dates.push(date);
                }
            }
            Step::Miss(anchor) => {
                if config.is_past_end(anchor) {
                    break;
                }
                misses += 1;
                tracing::trace!(step = k, %anchor, misses, "no occurrence in step");
                if misses > MAX_CONSECUTIVE_MISSES {
                    tracing::debug!(step = k, "giving up after consecutive empty steps");
                    break;
                }
            }
            Step::Exhausted => break,
        }

        k = match k.checked_add(1) {
            Some(next) => next,
            None => break,
        };
    }

    dates
}

fn expand_daily(config: &RecurrenceConfig, max_dates: usize) -> Vec<NaiveDate> {
    let interval = u64::from(config.effective_interval());
    let start = config.start_date;

    collect_steps(config, max_dates, |k| {
        match start.checked_add_days(Days::new(u64::from(k) * interval)) {
            Some(date) => Step::Hit(date),
            None => Step::Exhausted,
        }
    })
}

fn expand_yearly(config: &RecurrenceConfig, max_dates: usize) -> Vec<NaiveDate> {
    let years = config.effective_interval().checked_mul(12).map(Months::new);
    let mut current = config.start_date;

    // Each step advances the previous date, so a Feb 29 start clamps to
    // Feb 28 and stays there.
    collect_steps(config, max_dates, |k| {
        if k > 0 {
            match years.and_then(|m| current.checked_add_months(m)) {
                Some(next) => current = next,
                None => return Step::Exhausted,
            }
        }
        Step::Hit(current)
    })
}

fn expand_monthly(
    config: &RecurrenceConfig,
    pattern: &MonthlyPattern,
    max_dates: usize,
) -> Vec<NaiveDate> {
    if !pattern.is_satisfiable() {
        tracing::debug!(?pattern, "monthly pattern can never match");
        return Vec::new();
    }

    let interval = config.effective_interval();
    let first_month = calendar::first_of_month(config.start_date);

    // Month 0 is the start's own month; a candidate there before the start
    // date is dropped by `collect_steps`.
    collect_steps(config, max_dates, |k| {
        let anchor = k
            .checked_mul(interval)
            .and_then(|m| first_month.checked_add_months(Months::new(m)));
        match anchor {
            Some(anchor) => match pattern.occurrence_in(anchor) {
                Some(date) => Step::Hit(date),
                None => Step::Miss(anchor),
            },
            None => Step::Exhausted,
        }
    })
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

/// Weekly expansion: the start date when its weekday is in the pattern, then
/// repeatedly the first pattern day within `7 * interval` days of the last
/// accepted date.
fn expand_weekly(
    config: &RecurrenceConfig,
    pattern: &WeeklyPattern,
    max_dates: usize,
) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(max_dates.min(DEFAULT_MAX_DATES));

    if pattern.is_empty() {
        tracing::debug!("weekly pattern has no weekdays");
        return dates;
    }

    let window = usize::try_from(7 * u64::from(config.effective_interval())).unwrap_or(usize::MAX);

    if pattern.contains(config.start_date.weekday()) {
        dates.push(config.start_date);
    }

    let mut current = config.start_date;
    while dates.len() < max_dates {
        match next_weekly(current, window, pattern) {
            Some(next) if !config.is_past_end(next) => {
                dates.push(next);
                current = next;
            }
            _ => break,
        }
    }

    dates
}

/// First day after `current`, at most `window` days ahead, whose weekday is
/// in `pattern`. A non-empty pattern matches within 7 days.
fn next_weekly(current: NaiveDate, window: usize, pattern: &WeeklyPattern) -> Option<NaiveDate> {
    current
        .iter_days()
        .skip(1)
        .take(window)
        .find(|d| pattern.contains(d.weekday()))
}
