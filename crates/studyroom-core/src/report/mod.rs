//! Weekly study reports.
//!
//! Pure functions over record snapshots fetched by the caller: week-window
//! classification, free-text duration parsing, and per-subject / per-weekday
//! rollups. Nothing here is cached or persisted; every call recomputes from
//! the snapshot it is given.

mod aggregator;
mod duration;
mod records;
mod week;

pub use aggregator::{subject_rollup, DailyBreakdown, ReportAggregator, SubjectRollup, WeeklyReport};
pub use duration::{format_minutes, parse_duration_to_minutes};
pub use records::{PomodoroSession, RecordSnapshot, StudyPlan, StudyPlanDay, StudyTask, Subject};
pub use week::{parse_due_date, weekday_number, WeekWindow};

/// `round(100 * part / whole)` with halves rounded up, clamped to 0..=100.
/// A zero `whole` yields 0.
pub(crate) fn percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = part
        .saturating_mul(200)
        .saturating_add(whole)
        / whole.saturating_mul(2);
    rounded.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::percent;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(9, 4), 100);
        assert_eq!(percent(5, 0), 0);
    }
}
