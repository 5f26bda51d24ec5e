//! WASM bindings for recurrence-engine.
//!
//! Exposes date generation, rule summaries, RRULE interop, and month grids to
//! JavaScript via `wasm-bindgen`. Configurations and results cross the
//! boundary as JSON strings using the same camelCase shape the CLI reads.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p recurrence-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/recurrence_engine_wasm.wasm
//! ```

use chrono::{Datelike, NaiveDate};
use recurrence_engine::calendar::{calendar_days, contains_date, first_of_month};
use recurrence_engine::format::parse_date;
use recurrence_engine::ical::{self, ImportedRule};
use recurrence_engine::{RecurrenceConfig, DEFAULT_MAX_DATES};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportedRuleDto {
    config: RecurrenceConfig,
    count: Option<u32>,
}

impl From<ImportedRule> for ImportedRuleDto {
    fn from(r: ImportedRule) -> Self {
        Self {
            config: r.config,
            count: r.count,
        }
    }
}

/// One cell of a highlighted month grid.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDayDto {
    date: String,
    in_month: bool,
    selected: bool,
}

// ---------------------------------------------------------------------------
// Plain-Rust implementations; the exports below only convert errors
// ---------------------------------------------------------------------------

fn parse_config(json: &str) -> Result<RecurrenceConfig, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid config JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn iso_dates(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().map(|d| d.to_string()).collect()
}

fn generate_dates_impl(config_json: &str, max_dates: Option<u32>) -> Result<String, String> {
    let config = parse_config(config_json)?;
    let max = max_dates.map_or(DEFAULT_MAX_DATES, |m| m as usize);
    to_json(&iso_dates(&recurrence_engine::generate(&config, max)))
}

fn describe_rule_impl(config_json: &str) -> Result<String, String> {
    Ok(recurrence_engine::describe(&parse_config(config_json)?))
}

fn to_rrule_impl(config_json: &str) -> Result<String, String> {
    let config = parse_config(config_json)?;
    ical::to_ical(&config).map_err(|e| e.to_string())
}

fn from_rrule_impl(text: &str, start: Option<&str>) -> Result<String, String> {
    let imported = match start {
        Some(start) => {
            let start = parse_date(start).map_err(|e| e.to_string())?;
            ical::from_rrule(text, start)
        }
        None => ical::from_ical(text),
    }
    .map_err(|e| e.to_string())?;
    to_json(&ImportedRuleDto::from(imported))
}

fn calendar_days_impl(month_iso: &str) -> Result<String, String> {
    let month = parse_date(month_iso).map_err(|e| e.to_string())?;
    to_json(&iso_dates(&calendar_days(first_of_month(month))))
}

fn highlight_calendar_impl(
    month_iso: &str,
    config_json: &str,
    max_dates: Option<u32>,
) -> Result<String, String> {
    let month = first_of_month(parse_date(month_iso).map_err(|e| e.to_string())?);
    let config = parse_config(config_json)?;
    let max = max_dates.map_or(DEFAULT_MAX_DATES, |m| m as usize);
    let selected = recurrence_engine::generate(&config, max);

    let days: Vec<CalendarDayDto> = calendar_days(month)
        .into_iter()
        .map(|day| CalendarDayDto {
            date: day.to_string(),
            in_month: day.year() == month.year() && day.month() == month.month(),
            selected: contains_date(&selected, day),
        })
        .collect();
    to_json(&days)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Generate the dates a configuration produces.
///
/// `config_json` is a `RecurrenceConfig` object, e.g.
/// `{"type":"weekly","weeklyPattern":{"daysOfWeek":[1,3]},"startDate":"2024-01-01"}`.
/// Returns a JSON array of `YYYY-MM-DD` strings, at most `max_dates` long
/// (50 when omitted).
#[wasm_bindgen(js_name = "generateDates")]
pub fn generate_dates(config_json: &str, max_dates: Option<u32>) -> Result<String, JsValue> {
    generate_dates_impl(config_json, max_dates).map_err(|e| JsValue::from_str(&e))
}

/// One-line English summary of a configuration.
#[wasm_bindgen(js_name = "describeRule")]
pub fn describe_rule(config_json: &str) -> Result<String, JsValue> {
    describe_rule_impl(config_json).map_err(|e| JsValue::from_str(&e))
}

/// Export a configuration as `DTSTART:...\nRRULE:...` text.
#[wasm_bindgen(js_name = "toRRule")]
pub fn to_rrule(config_json: &str) -> Result<String, JsValue> {
    to_rrule_impl(config_json).map_err(|e| JsValue::from_str(&e))
}

/// Import iCalendar recurrence text.
///
/// `text` is either full `DTSTART`/`RRULE` lines, or a bare RRULE value when
/// `start` (a `YYYY-MM-DD` date) is given. Returns `{"config": ..., "count": n|null}`.
#[wasm_bindgen(js_name = "fromRRule")]
pub fn from_rrule(text: &str, start: Option<String>) -> Result<String, JsValue> {
    from_rrule_impl(text, start.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// The Sunday-to-Saturday grid of whole weeks covering the month of `month_iso`.
#[wasm_bindgen(js_name = "calendarDays")]
pub fn calendar_days_for(month_iso: &str) -> Result<String, JsValue> {
    calendar_days_impl(month_iso).map_err(|e| JsValue::from_str(&e))
}

/// The month grid of `month_iso` with each day flagged as inside the month
/// and as one of the dates `config_json` generates (first `max_dates`, 50
/// when omitted). Returns `[{"date", "inMonth", "selected"}, ...]`.
#[wasm_bindgen(js_name = "highlightCalendar")]
pub fn highlight_calendar(
    month_iso: &str,
    config_json: &str,
    max_dates: Option<u32>,
) -> Result<String, JsValue> {
    highlight_calendar_impl(month_iso, config_json, max_dates).map_err(|e| JsValue::from_str(&e))
}
