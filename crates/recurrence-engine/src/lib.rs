//! # recurrence-engine
//!
//! Bounded expansion of calendar recurrence rules into concrete dates.
//!
//! A [`RecurrenceConfig`] describes a daily, weekly, monthly or yearly rule
//! with an interval, an inclusive start date, and an optional inclusive end
//! date. [`generate`] turns it into at most `max_dates` ascending dates. It
//! never fails and never hangs: empty and impossible patterns simply produce
//! fewer (or zero) dates.
//!
//! ## Modules
//!
//! - [`pattern`] -- configuration types (rule, weekly and monthly patterns)
//! - [`expander`] -- config → bounded list of dates
//! - [`calendar`] -- month grids, weekday names, Nth-weekday arithmetic
//! - [`format`] -- date display formats and ISO parsing
//! - [`describe`] -- English summaries of a rule
//! - [`store`] -- owned configuration store driven by commands
//! - [`ical`] -- RFC 5545 `RRULE` export and import
//! - [`error`] -- Error types

pub mod calendar;
pub mod describe;
pub mod error;
pub mod expander;
pub mod format;
pub mod ical;
pub mod pattern;
pub mod store;

pub use describe::describe;
pub use error::RecurrenceError;
pub use expander::{generate, generate_preview, DEFAULT_MAX_DATES};
pub use pattern::{Frequency, MonthlyPattern, RecurrenceConfig, RecurrenceRule, WeeklyPattern};
pub use store::{RecurrenceStore, SavedRecurrence, StoreCommand};
