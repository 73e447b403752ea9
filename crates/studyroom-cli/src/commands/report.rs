use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use clap::{Args, Subcommand};
use serde::Serialize;
use studyroom_core::{
    format_minutes, parse_duration_to_minutes, Config, RecordSnapshot, ReportAggregator, Subject,
};

#[derive(Args)]
pub struct SnapshotArgs {
    /// JSON file with subjects, sessions, tasks and plans
    #[arg(long)]
    records: PathBuf,
    /// Evaluate the week as of this RFC 3339 instant instead of the clock
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<FixedOffset>>,
    /// IANA time zone for week boundaries (e.g. America/Sao_Paulo).
    /// Defaults to the system zone, or to the fixed offset of --now.
    #[arg(long, value_parser = parse_tz)]
    tz: Option<Tz>,
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Full weekly report: totals, weekday breakdown and per-subject rollups
    Week {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
    /// Rollup for a single subject
    Subject {
        /// Subject name as used on sessions and tasks
        name: String,
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
    /// Minutes per weekday (1 = Sunday .. 7 = Saturday)
    Daily {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
    /// Show how a free-text estimate is read
    ParseDuration {
        text: String,
    },
}

#[derive(Serialize)]
struct ParsedDuration {
    minutes: u32,
    display: String,
}

/// What to print once records and the reporting week are known.
enum View {
    Week,
    Subject(String),
    Daily,
}

fn parse_now(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

fn parse_tz(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>().map_err(|e| format!("unknown time zone '{s}': {e}"))
}

pub fn run(action: ReportAction) -> Result<(), Box<dyn std::error::Error>> {
    let (view, args) = match action {
        ReportAction::Week { snapshot } => (View::Week, snapshot),
        ReportAction::Subject { name, snapshot } => (View::Subject(name), snapshot),
        ReportAction::Daily { snapshot } => (View::Daily, snapshot),
        ReportAction::ParseDuration { text } => {
            let minutes = parse_duration_to_minutes(&text);
            let parsed = ParsedDuration {
                minutes,
                display: format_minutes(minutes),
            };
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            return Ok(());
        }
    };

    let records = RecordSnapshot::load(&args.records)?;
    match (args.tz, args.now) {
        (Some(tz), Some(now)) => render(&view, &records, ReportAggregator::at(now.with_timezone(&tz))),
        (Some(tz), None) => render(&view, &records, ReportAggregator::at(Utc::now().with_timezone(&tz))),
        (None, Some(now)) => render(&view, &records, ReportAggregator::at(now)),
        (None, None) => render(&view, &records, ReportAggregator::local()),
    }
}

fn render<Z: TimeZone>(
    view: &View,
    records: &RecordSnapshot,
    aggregator: ReportAggregator<Z>,
) -> Result<(), Box<dyn std::error::Error>> {
    match view {
        View::Week => {
            let config = Config::load()?;
            let report = aggregator.weekly_report(records, config.report.default_weekly_goal_hours);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        View::Subject(name) => {
            let config = Config::load()?;
            // Sessions may reference subjects missing from the subject list.
            let subject = records
                .subjects
                .iter()
                .find(|s| s.name == *name)
                .cloned()
                .unwrap_or_else(|| Subject {
                    id: name.clone(),
                    name: name.clone(),
                    weekly_goal_hours: None,
                });
            let rollup =
                aggregator.rollup_for(&subject, records, config.report.default_weekly_goal_hours);
            println!("{}", serde_json::to_string_pretty(&rollup)?);
        }
        View::Daily => {
            let daily = aggregator.daily_breakdown(&records.sessions, &records.tasks, &records.plans);
            println!("{}", serde_json::to_string_pretty(&daily)?);
        }
    }
    Ok(())
}
