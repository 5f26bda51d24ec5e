//! Owned configuration store with command dispatch.
//!
//! The store holds the current [`RecurrenceConfig`] and the preview dates it
//! implies. Each [`StoreCommand`] produces a new configuration and exactly one
//! regeneration. Weekly and monthly patterns are kept as drafts so switching
//! frequency away and back restores what was last edited.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::expander::{self, DEFAULT_MAX_DATES};
use crate::pattern::{Frequency, MonthlyPattern, RecurrenceConfig, RecurrenceRule, WeeklyPattern};

/// One user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    SetFrequency(Frequency),
    /// Values below 1 are clamped to 1.
    SetInterval(u32),
    SetStartDate(NaiveDate),
    SetEndDate(Option<NaiveDate>),
    SetWeeklyPattern(WeeklyPattern),
    SetMonthlyPattern(MonthlyPattern),
    /// Add (`true`) or remove (`false`) one weekday from the weekly draft.
    ToggleWeekday(Weekday, bool),
    /// Back to the defaults for the store's `today`, with an empty preview.
    Reset,
}

/// What a save hands to its caller: the rule and the dates it showed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecurrence {
    pub config: RecurrenceConfig,
    pub preview_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct RecurrenceStore {
    today: NaiveDate,
    max_dates: usize,
    frequency: Frequency,
    interval: u32,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    weekly_draft: WeeklyPattern,
    monthly_draft: MonthlyPattern,
    config: RecurrenceConfig,
    preview: Vec<NaiveDate>,
}

impl RecurrenceStore {
    /// Store with default settings anchored on `today`: daily, every day,
    /// starting today, weekly draft on today's weekday, monthly draft on
    /// today's day of month. The preview starts empty until the first
    /// [`refresh`](Self::refresh) or command.
    pub fn new(today: NaiveDate) -> Self {
        Self::with_max_dates(today, DEFAULT_MAX_DATES)
    }

    pub fn with_max_dates(today: NaiveDate, max_dates: usize) -> Self {
        let weekly_draft = WeeklyPattern::weekday_of(today);
        let monthly_draft = MonthlyPattern::day_of_month_of(today);
        Self {
            today,
            max_dates,
            frequency: Frequency::Daily,
            interval: 1,
            start_date: today,
            end_date: None,
            weekly_draft,
            monthly_draft,
            config: RecurrenceConfig::daily(today),
            preview: Vec::new(),
        }
    }

    /// Store seeded with an existing configuration; its pattern becomes the
    /// matching draft. The preview is generated immediately.
    pub fn from_config(today: NaiveDate, config: RecurrenceConfig, max_dates: usize) -> Self {
        let mut store = Self::with_max_dates(today, max_dates);
        match &config.rule {
            RecurrenceRule::Weekly { weekly_pattern } => store.weekly_draft = weekly_pattern.clone(),
            RecurrenceRule::Monthly { monthly_pattern } => store.monthly_draft = *monthly_pattern,
            RecurrenceRule::Daily | RecurrenceRule::Yearly => {}
        }
        store.frequency = config.frequency();
        store.interval = config.effective_interval();
        store.start_date = config.start_date;
        store.end_date = config.end_date;
        store.rebuild();
        store.refresh();
        store
    }

    pub fn config(&self) -> &RecurrenceConfig {
        &self.config
    }

    pub fn preview(&self) -> &[NaiveDate] {
        &self.preview
    }

    pub fn weekly_draft(&self) -> &WeeklyPattern {
        &self.weekly_draft
    }

    pub fn monthly_draft(&self) -> MonthlyPattern {
        self.monthly_draft
    }

    /// Saving is only offered while the rule produces at least one date.
    pub fn can_save(&self) -> bool {
        !self.preview.is_empty()
    }

    /// Snapshot for a save handler, or `None` when there is nothing to save.
    pub fn save(&self) -> Option<SavedRecurrence> {
        self.can_save().then(|| SavedRecurrence {
            config: self.config.clone(),
            preview_dates: self.preview.clone(),
        })
    }

    /// Regenerate the preview from the current configuration.
    pub fn refresh(&mut self) -> &[NaiveDate] {
        self.preview = expander::generate(&self.config, self.max_dates);
        &self.preview
    }

    /// Apply one command, rebuild the configuration, and regenerate.
    pub fn dispatch(&mut self, command: StoreCommand) -> &[NaiveDate] {
        tracing::debug!(?command, "applying store command");

        match command {
            StoreCommand::SetFrequency(frequency) => self.frequency = frequency,
            StoreCommand::SetInterval(interval) => self.interval = interval.max(1),
            StoreCommand::SetStartDate(date) => self.start_date = date,
            StoreCommand::SetEndDate(date) => self.end_date = date,
            StoreCommand::SetWeeklyPattern(pattern) => self.weekly_draft = pattern,
            StoreCommand::SetMonthlyPattern(pattern) => self.monthly_draft = pattern,
            StoreCommand::ToggleWeekday(weekday, on) => self.weekly_draft.toggle(weekday, on),
            StoreCommand::Reset => {
                *self = Self::with_max_dates(self.today, self.max_dates);
                return &self.preview;
            }
        }

        self.rebuild();
        self.refresh()
    }

    fn rebuild(&mut self) {
        let rule = match self.frequency {
            Frequency::Daily => RecurrenceRule::Daily,
            Frequency::Weekly => RecurrenceRule::Weekly {
                weekly_pattern: self.weekly_draft.clone(),
            },
            Frequency::Monthly => RecurrenceRule::Monthly {
                monthly_pattern: self.monthly_draft,
            },
            Frequency::Yearly => RecurrenceRule::Yearly,
        };
        self.config = RecurrenceConfig {
            rule,
            interval: self.interval,
            start_date: self.start_date,
            end_date: self.end_date,
        };
    }
}
