//! RFC 5545 interop -- export a configuration as `DTSTART`/`RRULE` text and
//! import the supported subset back.
//!
//! Parsing goes through the `rrule` crate so anything it accepts is validated
//! the same way calendar clients would read it. Only rules the generator can
//! express map back: a single RRULE with DAILY/WEEKLY/MONTHLY/YEARLY
//! frequency, plain weekday lists, one BYMONTHDAY, or one ordinal weekday.

use chrono::{NaiveDate, Weekday};
use rrule::{Frequency as RuleFrequency, NWeekday, RRule, RRuleSet};

use crate::calendar::{self, LAST_WEEK};
use crate::error::{RecurrenceError, Result};
use crate::pattern::{MonthlyPattern, RecurrenceConfig, RecurrenceRule, WeeklyPattern};

const DAY_CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

/// A configuration recovered from iCalendar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedRule {
    pub config: RecurrenceConfig,
    /// The rule's COUNT, if any -- usable as the caller's `max_dates`.
    pub count: Option<u32>,
}

fn day_code(weekday: Weekday) -> &'static str {
    DAY_CODES[calendar::weekday_index(weekday) as usize]
}

fn ical_date(date: NaiveDate) -> String {
    format!("{}T000000Z", date.format("%Y%m%d"))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// The RRULE value (without the `RRULE:` prefix) for `config`.
///
/// `INTERVAL` is the configured interval. Calendar clients read a weekly
/// `INTERVAL=2` as alternating weeks, while [`generate`](crate::generate)
/// scans for the next pattern day, so previews match only for interval 1.
/// An end date becomes `UNTIL` at midnight UTC.
///
/// # Errors
/// Returns `RecurrenceError::Unsupported` for a weekly rule with no weekdays
/// or a monthly pattern no month can satisfy; RRULE has no way to say "never".
pub fn to_rrule(config: &RecurrenceConfig) -> Result<String> {
    let freq = config.frequency().to_string().to_uppercase();
    let mut parts = vec![
        format!("FREQ={}", freq),
        format!("INTERVAL={}", config.effective_interval()),
    ];

    match &config.rule {
        RecurrenceRule::Daily | RecurrenceRule::Yearly => {}
        RecurrenceRule::Weekly { weekly_pattern } => {
            if weekly_pattern.is_empty() {
                return Err(RecurrenceError::Unsupported(
                    "weekly rule with no weekdays selected".to_string(),
                ));
            }
            let days: Vec<&str> = weekly_pattern.weekdays().map(day_code).collect();
            parts.push(format!("BYDAY={}", days.join(",")));
        }
        RecurrenceRule::Monthly { monthly_pattern } => {
            if !monthly_pattern.is_satisfiable() {
                return Err(RecurrenceError::Unsupported(format!(
                    "monthly pattern {:?} matches no month",
                    monthly_pattern
                )));
            }
            match *monthly_pattern {
                MonthlyPattern::Date { day_of_month } => {
                    parts.push(format!("BYMONTHDAY={}", day_of_month));
                }
                MonthlyPattern::Weekday {
                    weekday,
                    week_number,
                } => {
                    let code = calendar::weekday_from_index(weekday)
                        .map(day_code)
                        .unwrap_or_default();
                    parts.push(format!("BYDAY={}{}", week_number, code));
                }
            }
        }
    }

    if let Some(end) = config.end_date {
        parts.push(format!("UNTIL={}", ical_date(end)));
    }

    Ok(parts.join(";"))
}

/// Full two-line iCalendar block: `DTSTART:...` then `RRULE:...`.
///
/// # Errors
/// Same as [`to_rrule`].
pub fn to_ical(config: &RecurrenceConfig) -> Result<String> {
    Ok(format!(
        "DTSTART:{}\nRRULE:{}",
        ical_date(config.start_date),
        to_rrule(config)?
    ))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse a bare RRULE value (e.g. `FREQ=WEEKLY;BYDAY=MO,WE`) anchored on `start`.
///
/// # Errors
/// See [`from_ical`].
pub fn from_rrule(rrule: &str, start: NaiveDate) -> Result<ImportedRule> {
    let rrule = rrule.trim();
    if rrule.is_empty() {
        return Err(RecurrenceError::InvalidRule("empty RRULE string".to_string()));
    }
    let value = rrule.strip_prefix("RRULE:").unwrap_or(rrule);
    from_ical(&format!("DTSTART:{}\nRRULE:{}", ical_date(start), value))
}

/// Parse iCalendar `DTSTART` + `RRULE` text into a configuration.
///
/// # Errors
/// Returns `RecurrenceError::InvalidRule` if the `rrule` crate rejects the
/// text, and `RecurrenceError::Unsupported` for valid rules this engine cannot
/// express (several RRULEs, RDATE/EXDATE, sub-daily frequencies, mixed
/// ordinal weekdays, and similar).
pub fn from_ical(text: &str) -> Result<ImportedRule> {
    let set: RRuleSet = text
        .trim()
        .parse()
        .map_err(|e| RecurrenceError::InvalidRule(format!("{}", e)))?;

    if !set.get_rdate().is_empty() || !set.get_exdate().is_empty() {
        return Err(RecurrenceError::Unsupported(
            "RDATE/EXDATE lists are not supported".to_string(),
        ));
    }
    let rule = match &set.get_rrule()[..] {
        [rule] => rule,
        rules => {
            return Err(RecurrenceError::Unsupported(format!(
                "expected exactly one RRULE, found {}",
                rules.len()
            )))
        }
    };

    let start_date = set.get_dt_start().date_naive();
    let recurrence = match rule.get_freq() {
        RuleFrequency::Daily => RecurrenceRule::Daily,
        RuleFrequency::Weekly => RecurrenceRule::Weekly {
            weekly_pattern: weekly_from(rule, start_date)?,
        },
        RuleFrequency::Monthly => RecurrenceRule::Monthly {
            monthly_pattern: monthly_from(rule, start_date)?,
        },
        RuleFrequency::Yearly => RecurrenceRule::Yearly,
        other => {
            return Err(RecurrenceError::Unsupported(format!(
                "frequency {:?}",
                other
            )))
        }
    };

    let config = RecurrenceConfig {
        rule: recurrence,
        interval: u32::from(rule.get_interval()).max(1),
        start_date,
        end_date: rule.get_until().map(|until| until.date_naive()),
    };

    tracing::debug!(?config, count = ?rule.get_count(), "imported RRULE");

    Ok(ImportedRule {
        config,
        count: rule.get_count(),
    })
}

fn weekly_from(rule: &RRule, start: NaiveDate) -> Result<WeeklyPattern> {
    let mut days = Vec::new();
    for nday in rule.get_by_weekday() {
        match nday {
            NWeekday::Every(weekday) => days.push(*weekday),
            NWeekday::Nth(..) => {
                return Err(RecurrenceError::Unsupported(
                    "ordinal BYDAY in a weekly rule".to_string(),
                ))
            }
        }
    }
    if days.is_empty() {
        return Ok(WeeklyPattern::weekday_of(start));
    }
    Ok(WeeklyPattern::new(days))
}

fn monthly_from(rule: &RRule, start: NaiveDate) -> Result<MonthlyPattern> {
    let unsupported = |what: &str| RecurrenceError::Unsupported(what.to_string());

    match (&rule.get_by_weekday()[..], &rule.get_by_set_pos()[..]) {
        ([], _) => {}
        ([NWeekday::Nth(n, weekday)], []) => return ordinal_pattern(i32::from(*n), *weekday),
        ([NWeekday::Every(weekday)], [pos]) => return ordinal_pattern(*pos, *weekday),
        _ => return Err(unsupported("monthly BYDAY other than a single ordinal weekday")),
    }

    match &rule.get_by_month_day()[..] {
        [] => Ok(MonthlyPattern::day_of_month_of(start)),
        [day] if *day > 0 => Ok(MonthlyPattern::Date {
            day_of_month: u32::from(day.unsigned_abs()),
        }),
        _ => Err(unsupported("BYMONTHDAY other than a single positive day")),
    }
}

fn ordinal_pattern(n: i32, weekday: Weekday) -> Result<MonthlyPattern> {
    let week_number = i8::try_from(n)
        .ok()
        .filter(|n| *n == LAST_WEEK || (1..=5).contains(n))
        .ok_or_else(|| {
            RecurrenceError::Unsupported(format!("weekday ordinal {} (expected 1..5 or -1)", n))
        })?;
    Ok(MonthlyPattern::Weekday {
        weekday: calendar::weekday_index(weekday),
        week_number,
    })
}
