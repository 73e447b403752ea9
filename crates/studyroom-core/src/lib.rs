//! # Studyroom Core Library
//!
//! Core logic behind the Studyroom study companion: the Pomodoro focus timer
//! and the weekly study report. Screens, authentication and the document
//! store live elsewhere; this crate only sees the values they hand it.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven countdown state machine. Ticks come
//!   from a cancellable [`Ticker`] port, so tests drive it synchronously and
//!   the CLI drives it with tokio.
//! - **Report Aggregator**: pure functions over record snapshots that bucket
//!   study time into the current Sunday-to-Saturday week and by weekday.
//! - **Storage**: TOML configuration and the persisted focus counters.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`FocusController`]: Engine + counters + ticker, owned by one screen
//! - [`ReportAggregator`]: Weekly rollups for a fixed "now"
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod report;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, TimerError};
pub use events::Event;
pub use report::{
    format_minutes, parse_duration_to_minutes, subject_rollup, DailyBreakdown, PomodoroSession,
    RecordSnapshot, ReportAggregator, StudyPlan, StudyPlanDay, StudyTask, Subject, SubjectRollup,
    WeekWindow, WeeklyReport,
};
pub use storage::{Config, CountersFile};
pub use timer::{
    FocusController, FocusCounters, ManualTicker, TickToken, Ticker, TimerEngine, TimerState,
    TokioTicker,
};
