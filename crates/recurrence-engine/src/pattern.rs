//! Recurrence configuration -- the immutable input to the generator.
//!
//! The per-frequency sub-patterns live inside [`RecurrenceRule`], so a weekly
//! rule always carries its weekdays and a daily rule can never hold a stray
//! monthly pattern.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, LAST_WEEK};

/// The four base frequencies, without their sub-patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// Unit noun for this frequency, pluralised when `interval != 1`.
    pub fn unit(self, interval: u32) -> &'static str {
        let plural = interval != 1;
        match (self, plural) {
            (Frequency::Daily, false) => "day",
            (Frequency::Daily, true) => "days",
            (Frequency::Weekly, false) => "week",
            (Frequency::Weekly, true) => "weeks",
            (Frequency::Monthly, false) => "month",
            (Frequency::Monthly, true) => "months",
            (Frequency::Yearly, false) => "year",
            (Frequency::Yearly, true) => "years",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

/// Weekdays a weekly rule fires on, as Sunday-based indices (0..=6).
///
/// Indices above 6 are kept if deserialized but never match a date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPattern {
    pub days_of_week: BTreeSet<u8>,
}

impl WeeklyPattern {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            days_of_week: days.into_iter().map(calendar::weekday_index).collect(),
        }
    }

    /// Pattern holding only the weekday of `date`.
    pub fn weekday_of(date: NaiveDate) -> Self {
        Self::new([date.weekday()])
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.days_of_week.contains(&calendar::weekday_index(weekday))
    }

    /// True when no valid weekday is selected, i.e. the pattern can never match.
    pub fn is_empty(&self) -> bool {
        self.weekdays().next().is_none()
    }

    /// Selected weekdays in Sunday-first order.
    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days_of_week
            .iter()
            .filter_map(|&i| calendar::weekday_from_index(i))
    }

    /// Add or remove a weekday.
    pub fn toggle(&mut self, weekday: Weekday, on: bool) {
        let index = calendar::weekday_index(weekday);
        if on {
            self.days_of_week.insert(index);
        } else {
            self.days_of_week.remove(&index);
        }
    }
}

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

/// Which day of each month a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum MonthlyPattern {
    /// Same numeric day every month ("the 15th"). Months without that day
    /// are skipped, never clamped.
    Date { day_of_month: u32 },
    /// Nth weekday of the month ("the second Tuesday"), or the last one
    /// when `week_number` is [`LAST_WEEK`].
    Weekday { weekday: u8, week_number: i8 },
}

impl MonthlyPattern {
    /// "On day N of every month", taking N from `date`.
    pub fn day_of_month_of(date: NaiveDate) -> Self {
        MonthlyPattern::Date {
            day_of_month: date.day(),
        }
    }

    /// "On the Nth <weekday>", taking both from `date`.
    pub fn nth_weekday_of(date: NaiveDate) -> Self {
        MonthlyPattern::Weekday {
            weekday: calendar::weekday_index(date.weekday()),
            week_number: calendar::week_number_in_month(date) as i8,
        }
    }

    /// "On the last <weekday>", taking the weekday from `date`.
    pub fn last_weekday_of(date: NaiveDate) -> Self {
        MonthlyPattern::Weekday {
            weekday: calendar::weekday_index(date.weekday()),
            week_number: LAST_WEEK,
        }
    }

    /// False when no month can ever contain a matching day.
    pub fn is_satisfiable(&self) -> bool {
        match *self {
            MonthlyPattern::Date { day_of_month } => (1..=31).contains(&day_of_month),
            MonthlyPattern::Weekday {
                weekday,
                week_number,
            } => {
                calendar::weekday_from_index(weekday).is_some()
                    && (week_number == LAST_WEEK || (1..=5).contains(&week_number))
            }
        }
    }

    /// The matching day in the month containing `month`, if that month has one.
    pub fn occurrence_in(&self, month: NaiveDate) -> Option<NaiveDate> {
        match *self {
            MonthlyPattern::Date { day_of_month } => month.with_day(day_of_month),
            MonthlyPattern::Weekday {
                weekday,
                week_number,
            } => {
                let weekday = calendar::weekday_from_index(weekday)?;
                calendar::nth_weekday_of_month(month, weekday, week_number)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rule and config
// ---------------------------------------------------------------------------

/// Frequency together with the sub-pattern that frequency requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RecurrenceRule {
    Daily,
    Weekly { weekly_pattern: WeeklyPattern },
    Monthly { monthly_pattern: MonthlyPattern },
    Yearly,
}

impl RecurrenceRule {
    pub fn frequency(&self) -> Frequency {
        match self {
            RecurrenceRule::Daily => Frequency::Daily,
            RecurrenceRule::Weekly { .. } => Frequency::Weekly,
            RecurrenceRule::Monthly { .. } => Frequency::Monthly,
            RecurrenceRule::Yearly => Frequency::Yearly,
        }
    }
}

/// A complete recurrence configuration.
///
/// Serializes with camelCase keys and the rule's `type` tag inlined:
///
/// ```json
/// {"type":"weekly","weeklyPattern":{"daysOfWeek":[1,3,5]},
///  "interval":1,"startDate":"2024-01-01","endDate":"2024-01-15"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceConfig {
    #[serde(flatten)]
    pub rule: RecurrenceRule,
    #[serde(default = "default_interval")]
    pub interval: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceConfig {
    pub fn new(rule: RecurrenceRule, start_date: NaiveDate) -> Self {
        Self {
            rule,
            interval: 1,
            start_date,
            end_date: None,
        }
    }

    pub fn daily(start_date: NaiveDate) -> Self {
        Self::new(RecurrenceRule::Daily, start_date)
    }

    pub fn weekly(start_date: NaiveDate, weekly_pattern: WeeklyPattern) -> Self {
        Self::new(RecurrenceRule::Weekly { weekly_pattern }, start_date)
    }

    pub fn monthly(start_date: NaiveDate, monthly_pattern: MonthlyPattern) -> Self {
        Self::new(RecurrenceRule::Monthly { monthly_pattern }, start_date)
    }

    pub fn yearly(start_date: NaiveDate) -> Self {
        Self::new(RecurrenceRule::Yearly, start_date)
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_end_date(mut self, end_date: Option<NaiveDate>) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn frequency(&self) -> Frequency {
        self.rule.frequency()
    }

    /// Interval as the generator uses it: never below 1.
    pub fn effective_interval(&self) -> u32 {
        self.interval.max(1)
    }

    /// Whether `date` is after the inclusive end bound.
    pub fn is_past_end(&self, date: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| date > end)
    }
}
