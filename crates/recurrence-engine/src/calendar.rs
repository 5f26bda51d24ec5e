//! Calendar arithmetic shared by the generator and by preview consumers.
//!
//! Weeks start on Sunday throughout, and weekday indices run 0 (Sunday)
//! through 6 (Saturday).

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Sentinel week number meaning "the last occurrence in the month".
pub const LAST_WEEK: i8 = -1;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const ORDINALS: [&str; 6] = ["", "first", "second", "third", "fourth", "fifth"];

// ---------------------------------------------------------------------------
// Weekday indices and names
// ---------------------------------------------------------------------------

/// Sunday-based index of a weekday (Sunday = 0, Saturday = 6).
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Inverse of [`weekday_index`]. Returns `None` for indices above 6.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Full English name, e.g. "Tuesday".
pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday_index(weekday) as usize]
}

/// Three-letter English name, e.g. "Tue".
pub fn short_day_name(weekday: Weekday) -> &'static str {
    &day_name(weekday)[..3]
}

/// "first" through "fifth"; anything else falls back to "{n}th".
pub fn ordinal_word(n: u32) -> String {
    match ORDINALS.get(n as usize) {
        Some(word) if !word.is_empty() => (*word).to_string(),
        _ => format!("{}th", n),
    }
}

// ---------------------------------------------------------------------------
// Month helpers
// ---------------------------------------------------------------------------

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last calendar day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
}

/// Which week of its month a date falls in, counting from 1: ⌈day / 7⌉.
pub fn week_number_in_month(date: NaiveDate) -> u32 {
    date.day().div_ceil(7)
}

/// True when there is no later occurrence of this weekday in the same month.
pub fn is_last_weekday_of_month(date: NaiveDate) -> bool {
    match date.checked_add_days(Days::new(7)) {
        Some(next_week) => next_week.month() != date.month(),
        None => true,
    }
}

/// The `week_number`-th `weekday` of the month containing `month`, or the
/// last one for [`LAST_WEEK`]. Returns `None` when the month has no such day
/// (e.g. a fifth Monday in most months) or `week_number` is out of range.
pub fn nth_weekday_of_month(month: NaiveDate, weekday: Weekday, week_number: i8) -> Option<NaiveDate> {
    if week_number == LAST_WEEK {
        let last = last_of_month(month)?;
        let back = (weekday_index(last.weekday()) + 7 - weekday_index(weekday)) % 7;
        return last.checked_sub_days(Days::new(u64::from(back)));
    }

    let n = u8::try_from(week_number).ok().filter(|n| (1..=5).contains(n))?;
    NaiveDate::from_weekday_of_month_opt(month.year(), month.month(), weekday, n)
}

// ---------------------------------------------------------------------------
// Week helpers and month grid
// ---------------------------------------------------------------------------

/// The Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// The Saturday on or after `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let ahead = u64::from(6 - date.weekday().num_days_from_sunday());
    date.checked_add_days(Days::new(ahead)).unwrap_or(date)
}

/// Every day shown in a Sunday-start month grid for the month containing
/// `date`: from the start of the first week through the end of the last.
/// The result always spans whole weeks (28, 35 or 42 days).
pub fn calendar_days(date: NaiveDate) -> Vec<NaiveDate> {
    let grid_start = start_of_week(first_of_month(date));
    let grid_end = end_of_week(last_of_month(date).unwrap_or(date));

    grid_start
        .iter_days()
        .take_while(|day| *day <= grid_end)
        .collect()
}

/// Whether `date` is one of `dates`.
pub fn contains_date(dates: &[NaiveDate], date: NaiveDate) -> bool {
    dates.contains(&date)
}

