//! `recur` CLI -- preview, describe, and convert recurrence rules from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Next 50 days starting today
//! recur preview
//!
//! # Mon/Wed/Fri until the end of March
//! recur preview --frequency weekly --days mon,wed,fri \
//!     --start 2024-01-01 --end 2024-03-31
//!
//! # Second Tuesday of every month, as JSON
//! recur preview --frequency monthly --weekday tue --week-number 2 \
//!     --start 2024-01-09 --max 12 --json
//!
//! # Rule from a JSON config file (or '-' for stdin)
//! recur preview -i rule.json
//!
//! # One-line English summary
//! recur describe --frequency monthly --weekday fri --week-number last --start 2024-01-26
//!
//! # Convert to and from RFC 5545 text
//! recur export --frequency daily --interval 3 --start 2024-01-01 -o rule.ics
//! echo 'DTSTART:20240109T000000Z
//! RRULE:FREQ=MONTHLY;BYDAY=2TU' | recur import
//! ```
//!
//! Logging goes to stderr; set `RECUR_LOG` (e.g. `RECUR_LOG=debug`) or pass
//! `-v` to see what the engine is doing.

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand, ValueEnum};
use recurrence_engine::calendar::{week_number_in_month, weekday_index, LAST_WEEK};
use recurrence_engine::format::{format_long_date, parse_date};
use recurrence_engine::{
    ical, MonthlyPattern, RecurrenceConfig, RecurrenceRule, WeeklyPattern, DEFAULT_MAX_DATES,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "recur",
    version,
    about = "Preview and convert calendar recurrence rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine activity to stderr at debug level (overrides RECUR_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dates a rule produces
    Preview {
        #[command(flatten)]
        rule: RuleArgs,
        /// Maximum number of dates to generate
        #[arg(long, default_value_t = DEFAULT_MAX_DATES)]
        max: usize,
        /// Print a JSON array of ISO dates instead of one date per line
        #[arg(long)]
        json: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print a one-line English summary of a rule
    Describe {
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Convert a rule to RFC 5545 DTSTART/RRULE text
    Export {
        #[command(flatten)]
        rule: RuleArgs,
        /// Print only the RRULE value, without DTSTART
        #[arg(long)]
        rrule_only: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Read RFC 5545 text and print the equivalent JSON config
    Import {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Start date for a bare RRULE value that has no DTSTART line
        #[arg(long)]
        start: Option<String>,
        /// Print the rule's dates instead of its config (COUNT caps the list)
        #[arg(long)]
        preview: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FrequencyArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Rule given either as a JSON config or as individual flags.
#[derive(Args)]
struct RuleArgs {
    /// JSON config file ('-' for stdin); the other rule flags are ignored
    #[arg(short, long)]
    input: Option<String>,
    #[arg(short, long, value_enum, default_value = "daily")]
    frequency: FrequencyArg,
    /// Step size in units of the frequency
    #[arg(long, default_value_t = 1)]
    interval: u32,
    /// First date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    start: Option<String>,
    /// Last allowed date, YYYY-MM-DD (inclusive)
    #[arg(long)]
    end: Option<String>,
    /// Weekly: comma-separated weekdays, e.g. mon,wed,fri (defaults to the start's weekday)
    #[arg(long, value_delimiter = ',')]
    days: Vec<String>,
    /// Monthly: fixed day of the month (defaults to the start's day)
    #[arg(long, conflicts_with = "weekday")]
    day_of_month: Option<u32>,
    /// Monthly: weekday for an "Nth weekday" rule, e.g. tue
    #[arg(long)]
    weekday: Option<String>,
    /// Monthly: which occurrence of --weekday, 1-5 or "last" (defaults from the start date)
    #[arg(long, requires = "weekday", allow_hyphen_values = true)]
    week_number: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Preview {
            rule,
            max,
            json,
            output,
        } => {
            let config = rule.to_config()?;
            let dates = recurrence_engine::generate(&config, max);
            write_output(output.as_deref(), &render_dates(&dates, json)?)?;
        }
        Commands::Describe { rule } => {
            let config = rule.to_config()?;
            println!("{}", recurrence_engine::describe(&config));
        }
        Commands::Export {
            rule,
            rrule_only,
            output,
        } => {
            let config = rule.to_config()?;
            let text = if rrule_only {
                ical::to_rrule(&config)
            } else {
                ical::to_ical(&config)
            }
            .context("Failed to export rule")?;
            write_output(output.as_deref(), &format!("{}\n", text))?;
        }
        Commands::Import {
            input,
            start,
            preview,
        } => {
            let text = read_input(input.as_deref())?;
            let imported = match start {
                Some(start) => ical::from_rrule(&text, parse_date(&start)?),
                None => ical::from_ical(&text),
            }
            .context("Failed to import RRULE")?;

            if preview {
                let max = imported
                    .count
                    .map_or(DEFAULT_MAX_DATES, |count| count as usize);
                let dates = recurrence_engine::generate(&imported.config, max);
                print!("{}", render_dates(&dates, false)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&imported.config)?);
            }
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `-v` forces debug; otherwise `RECUR_LOG`
/// decides, defaulting to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("RECUR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

impl RuleArgs {
    fn to_config(&self) -> Result<RecurrenceConfig> {
        if let Some(path) = self.input.as_deref() {
            let json = read_input(Some(path).filter(|p| *p != "-"))?;
            let config: RecurrenceConfig =
                serde_json::from_str(&json).context("Failed to parse rule JSON")?;
            tracing::debug!(?config, "loaded rule from JSON");
            return Ok(config);
        }

        let start = match self.start.as_deref() {
            Some(s) => parse_date(s)?,
            None => Local::now().date_naive(),
        };
        let end = self.end.as_deref().map(parse_date).transpose()?;

        let rule = match self.frequency {
            FrequencyArg::Daily => RecurrenceRule::Daily,
            FrequencyArg::Weekly => RecurrenceRule::Weekly {
                weekly_pattern: self.weekly_pattern(start)?,
            },
            FrequencyArg::Monthly => RecurrenceRule::Monthly {
                monthly_pattern: self.monthly_pattern(start)?,
            },
            FrequencyArg::Yearly => RecurrenceRule::Yearly,
        };

        Ok(RecurrenceConfig::new(rule, start)
            .with_interval(self.interval)
            .with_end_date(end))
    }

    fn weekly_pattern(&self, start: NaiveDate) -> Result<WeeklyPattern> {
        if self.days.is_empty() {
            return Ok(WeeklyPattern::weekday_of(start));
        }
        let days = self
            .days
            .iter()
            .map(String::as_str)
            .map(parse_weekday)
            .collect::<Result<Vec<_>>>()?;
        Ok(WeeklyPattern::new(days))
    }

    fn monthly_pattern(&self, start: NaiveDate) -> Result<MonthlyPattern> {
        let Some(weekday) = self.weekday.as_deref() else {
            return Ok(match self.day_of_month {
                Some(day) => {
                    anyhow::ensure!(
                        (1..=31).contains(&day),
                        "Invalid --day-of-month {} (expected 1-31)",
                        day
                    );
                    MonthlyPattern::Date { day_of_month: day }
                }
                None => MonthlyPattern::day_of_month_of(start),
            });
        };

        let weekday = parse_weekday(weekday)?;
        let week_number = match self.week_number.as_deref() {
            Some(raw) => parse_week_number(raw)?,
            None => week_number_in_month(start) as i8,
        };
        Ok(MonthlyPattern::Weekday {
            weekday: weekday_index(weekday),
            week_number,
        })
    }
}

fn parse_weekday(raw: &str) -> Result<Weekday> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| anyhow::anyhow!("Unknown weekday: '{}'. Use mon, tue, ... or full names", raw))
}

/// "1".."5", "last", or "-1".
fn parse_week_number(raw: &str) -> Result<i8> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("last") {
        return Ok(LAST_WEEK);
    }
    let n: i8 = raw
        .parse()
        .with_context(|| format!("Invalid --week-number: '{}'", raw))?;
    anyhow::ensure!(
        n == LAST_WEEK || (1..=5).contains(&n),
        "Invalid --week-number {} (expected 1-5 or last)",
        n
    );
    Ok(n)
}

fn render_dates(dates: &[NaiveDate], json: bool) -> Result<String> {
    if json {
        let iso: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
        return Ok(format!("{}\n", serde_json::to_string(&iso)?));
    }
    Ok(dates
        .iter()
        .map(|d| format!("{}\n", format_long_date(*d)))
        .collect())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
