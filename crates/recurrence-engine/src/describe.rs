//! Human-readable summaries of a recurrence configuration.

use chrono::NaiveDate;

use crate::calendar::{self, LAST_WEEK};
use crate::format::format_date;
use crate::pattern::{Frequency, MonthlyPattern, RecurrenceConfig, RecurrenceRule, WeeklyPattern};

/// Unit label shown next to the interval input: "day", "weeks", ...
pub fn interval_unit(frequency: Frequency, interval: u32) -> &'static str {
    frequency.unit(interval)
}

/// One-line English summary of the rule, e.g.
/// "Every 2 weeks on Mon, Wed, Fri, starting Jan 01, 2024 until Mar 31, 2024".
pub fn describe(config: &RecurrenceConfig) -> String {
    let interval = config.effective_interval();
    let mut text = match &config.rule {
        RecurrenceRule::Daily | RecurrenceRule::Yearly => every(config.frequency(), interval),
        RecurrenceRule::Weekly { weekly_pattern } => describe_weekly(weekly_pattern, interval),
        RecurrenceRule::Monthly { monthly_pattern } => describe_monthly(monthly_pattern, interval),
    };

    text.push_str(", starting ");
    text.push_str(&format_date(config.start_date));
    if let Some(end) = config.end_date {
        text.push_str(" until ");
        text.push_str(&format_date(end));
    }
    text
}

/// "Every day" / "Every 3 days".
fn every(frequency: Frequency, interval: u32) -> String {
    if interval == 1 {
        format!("Every {}", frequency.unit(1))
    } else {
        format!("Every {} {}", interval, frequency.unit(interval))
    }
}

fn describe_weekly(pattern: &WeeklyPattern, interval: u32) -> String {
    let head = every(Frequency::Weekly, interval);
    if pattern.is_empty() {
        return format!("{} (no days selected)", head);
    }
    let days: Vec<&str> = pattern.weekdays().map(calendar::short_day_name).collect();
    format!("{} on {}", head, days.join(", "))
}

fn describe_monthly(pattern: &MonthlyPattern, interval: u32) -> String {
    let tail = if interval == 1 {
        "of every month".to_string()
    } else {
        format!("of every {} months", interval)
    };

    match *pattern {
        MonthlyPattern::Date { day_of_month } => format!("On day {} {}", day_of_month, tail),
        MonthlyPattern::Weekday {
            weekday,
            week_number,
        } => {
            let day = calendar::weekday_from_index(weekday)
                .map_or("(invalid weekday)", calendar::day_name);
            let which = if week_number == LAST_WEEK {
                "last".to_string()
            } else {
                calendar::ordinal_word(u32::from(week_number.unsigned_abs()))
            };
            format!("On the {} {} {}", which, day, tail)
        }
    }
}

/// Labels for the three monthly choices offered for a given start date, in
/// the order: day-of-month, Nth weekday, last weekday.
pub fn monthly_choices(start: NaiveDate) -> [(MonthlyPattern, String); 3] {
    [
        MonthlyPattern::day_of_month_of(start),
        MonthlyPattern::nth_weekday_of(start),
        MonthlyPattern::last_weekday_of(start),
    ]
    .map(|pattern| {
        let label = describe_monthly(&pattern, 1);
        (pattern, label)
    })
}
