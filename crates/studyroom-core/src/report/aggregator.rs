//! Weekly study-time aggregation.
//!
//! Three sources feed every total:
//! - **Pomodoro sessions**: their minutes, at `completed_at`
//! - **Completed tasks**: their parsed estimate, at completion time or else
//!   09:00 on the due date
//! - **Completed study-plan days**: `hours_per_day * 60`, at `completed_at`
//!
//! A completed plan day without `completed_at` still counts toward weekly
//! totals but never appears in the weekday breakdown.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::duration::parse_duration_to_minutes;
use super::percent;
use super::records::{PomodoroSession, RecordSnapshot, StudyPlan, StudyTask, Subject};
use super::week::{weekday_number, WeekWindow};

/// Minutes studied per weekday, Sunday = 1 through Saturday = 7.
/// Every weekday is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyBreakdown(BTreeMap<u8, u32>);

impl DailyBreakdown {
    fn empty() -> Self {
        Self((1..=7).map(|day| (day, 0)).collect())
    }

    fn add(&mut self, weekday: u8, minutes: u32) {
        let slot = self.0.entry(weekday).or_insert(0);
        *slot = slot.saturating_add(minutes);
    }

    /// Minutes on `weekday` (1..=7); 0 for anything else.
    pub fn minutes_on(&self, weekday: u8) -> u32 {
        self.0.get(&weekday).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.0.iter().map(|(day, minutes)| (*day, *minutes))
    }

    pub fn total(&self) -> u32 {
        self.0.values().fold(0, |acc, m| acc.saturating_add(*m))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRollup {
    pub subject_id: String,
    pub total_weekly_minutes: u32,
    /// Share of this week's tasks already completed, 0..=100.
    pub completion_percentage: u8,
    /// Weekly minutes against the weekly goal, 0..=100.
    pub general_progress_percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub total_minutes: u32,
    pub daily: DailyBreakdown,
    pub subjects: Vec<SubjectRollup>,
    pub sessions_this_week: usize,
    pub tasks_completed_this_week: usize,
}

/// Per-subject rollup from already computed inputs.
///
/// `tasks_this_week` are the subject's tasks for the week, completed or not.
pub fn subject_rollup<'a>(
    subject_id: &str,
    weekly_minutes: u32,
    weekly_goal_hours: u32,
    tasks_this_week: impl IntoIterator<Item = &'a StudyTask>,
) -> SubjectRollup {
    let (done, total) = tasks_this_week
        .into_iter()
        .fold((0u64, 0u64), |(done, total), task| {
            (done + u64::from(task.completed), total + 1)
        });
    SubjectRollup {
        subject_id: subject_id.to_string(),
        total_weekly_minutes: weekly_minutes,
        completion_percentage: percent(done, total),
        general_progress_percentage: percent(
            u64::from(weekly_minutes),
            u64::from(weekly_goal_hours) * 60,
        ),
    }
}

/// When a contribution happened, as far as the reports are concerned.
#[derive(Debug, Clone, Copy)]
enum Stamp {
    At(DateTime<Utc>),
    /// Completed plan day with no completion time.
    Undated,
    /// Nothing usable; never counted.
    Missing,
}

#[derive(Debug, Clone, Copy)]
struct Contribution {
    minutes: u32,
    stamp: Stamp,
}

/// Computes reports for the week containing a fixed "now".
///
/// Holds no record data, so the same aggregator over the same snapshot
/// always yields the same output.
#[derive(Debug, Clone)]
pub struct ReportAggregator<Tz: TimeZone> {
    tz: Tz,
    window: WeekWindow,
}

impl ReportAggregator<Local> {
    /// Aggregator for the current local week.
    pub fn local() -> Self {
        Self::at(Local::now())
    }
}

impl<Tz: TimeZone> ReportAggregator<Tz> {
    pub fn at(now: DateTime<Tz>) -> Self {
        let window = WeekWindow::containing(&now);
        Self {
            tz: now.timezone(),
            window,
        }
    }

    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn classify_into_current_week(&self, at: Option<DateTime<Utc>>) -> bool {
        at.is_some_and(|at| self.window.contains(&at))
    }

    /// Weekday (1 = Sunday) of `at` in the reporting time zone.
    pub fn weekday_of(&self, at: &DateTime<Utc>) -> u8 {
        weekday_number(at, &self.tz)
    }

    pub fn weekly_minutes_for_subject(
        &self,
        subject: &str,
        sessions: &[PomodoroSession],
        tasks: &[StudyTask],
        plans: &[StudyPlan],
    ) -> u32 {
        self.weekly_total(self.contributions(Some(subject), sessions, tasks, plans))
    }

    /// Weekly minutes across every subject, with the same rules as
    /// [`weekly_minutes_for_subject`](Self::weekly_minutes_for_subject).
    pub fn total_weekly_minutes(
        &self,
        sessions: &[PomodoroSession],
        tasks: &[StudyTask],
        plans: &[StudyPlan],
    ) -> u32 {
        self.weekly_total(self.contributions(None, sessions, tasks, plans))
    }

    pub fn daily_breakdown(
        &self,
        sessions: &[PomodoroSession],
        tasks: &[StudyTask],
        plans: &[StudyPlan],
    ) -> DailyBreakdown {
        let mut daily = DailyBreakdown::empty();
        for contribution in self.contributions(None, sessions, tasks, plans) {
            if let Stamp::At(at) = contribution.stamp {
                if self.window.contains(&at) {
                    daily.add(self.weekday_of(&at), contribution.minutes);
                }
            }
        }
        daily
    }

    /// Tasks of `subject`, completed or not, whose effective timestamp falls
    /// in this week.
    pub fn tasks_this_week<'a>(&self, subject: &str, tasks: &'a [StudyTask]) -> Vec<&'a StudyTask> {
        tasks
            .iter()
            .filter(|task| task.subject == subject)
            .filter(|task| self.classify_into_current_week(task.effective_timestamp(&self.tz)))
            .collect()
    }

    /// Rollup for one subject straight from a snapshot.
    ///
    /// Subjects without their own weekly goal use `default_goal_hours`.
    pub fn rollup_for(
        &self,
        subject: &Subject,
        snapshot: &RecordSnapshot,
        default_goal_hours: u32,
    ) -> SubjectRollup {
        let minutes = self.weekly_minutes_for_subject(
            &subject.name,
            &snapshot.sessions,
            &snapshot.tasks,
            &snapshot.plans,
        );
        subject_rollup(
            &subject.id,
            minutes,
            subject.weekly_goal_hours.unwrap_or(default_goal_hours),
            self.tasks_this_week(&subject.name, &snapshot.tasks),
        )
    }

    pub fn weekly_report(&self, snapshot: &RecordSnapshot, default_goal_hours: u32) -> WeeklyReport {
        let RecordSnapshot {
            subjects,
            sessions,
            tasks,
            plans,
        } = snapshot;

        WeeklyReport {
            week_start: self.window.start,
            week_end: self.window.end,
            total_minutes: self.total_weekly_minutes(sessions, tasks, plans),
            daily: self.daily_breakdown(sessions, tasks, plans),
            subjects: subjects
                .iter()
                .map(|subject| self.rollup_for(subject, snapshot, default_goal_hours))
                .collect(),
            sessions_this_week: sessions
                .iter()
                .filter(|s| self.window.contains(&s.completed_at))
                .count(),
            tasks_completed_this_week: tasks
                .iter()
                .filter(|t| t.completed)
                .filter(|t| self.classify_into_current_week(t.effective_timestamp(&self.tz)))
                .count(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn weekly_total(&self, contributions: impl Iterator<Item = Contribution>) -> u32 {
        contributions
            .filter(|c| match c.stamp {
                Stamp::At(at) => self.window.contains(&at),
                Stamp::Undated => true,
                Stamp::Missing => false,
            })
            .fold(0, |acc, c| acc.saturating_add(c.minutes))
    }

    /// Every record's contribution, optionally limited to one subject.
    fn contributions<'a>(
        &'a self,
        subject: Option<&'a str>,
        sessions: &'a [PomodoroSession],
        tasks: &'a [StudyTask],
        plans: &'a [StudyPlan],
    ) -> impl Iterator<Item = Contribution> + 'a {
        let matches = move |name: &str| subject.map_or(true, |s| s == name);

        let from_sessions = sessions
            .iter()
            .filter(move |s| matches(&s.subject))
            .map(|s| Contribution {
                minutes: s.minutes,
                stamp: Stamp::At(s.completed_at),
            });

        let from_tasks = tasks
            .iter()
            .filter(move |t| t.completed && matches(&t.subject))
            .map(move |t| {
                let stamp = match t.effective_timestamp(&self.tz) {
                    Some(at) => Stamp::At(at),
                    None => {
                        debug!(task = %t.title, due_date = %t.due_date, "task has no usable timestamp");
                        Stamp::Missing
                    }
                };
                Contribution {
                    minutes: parse_duration_to_minutes(&t.estimated_duration),
                    stamp,
                }
            });

        let from_plans = plans
            .iter()
            .filter(move |p| matches(&p.subject_name))
            .flat_map(|plan| {
                let minutes = plan.minutes_per_day();
                plan.days
                    .iter()
                    .filter(|day| day.completed)
                    .map(move |day| Contribution {
                        minutes,
                        stamp: day.completed_at.map_or(Stamp::Undated, Stamp::At),
                    })
            });

        from_sessions.chain(from_tasks).chain(from_plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::records::StudyPlanDay;
    use chrono::FixedOffset;

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn local(d: u32, h: u32) -> DateTime<Utc> {
        tz().with_ymd_and_hms(2024, 3, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Wednesday 2024-03-13 in a week running Sun 10 .. Sat 16.
    fn aggregator() -> ReportAggregator<FixedOffset> {
        ReportAggregator::at(tz().with_ymd_and_hms(2024, 3, 13, 15, 0, 0).unwrap())
    }

    fn session(subject: &str, minutes: u32, at: DateTime<Utc>) -> PomodoroSession {
        PomodoroSession {
            subject: subject.into(),
            minutes,
            completed_at: at,
        }
    }

    fn task(subject: &str, estimate: &str, due: &str, completed: bool) -> StudyTask {
        StudyTask {
            subject: subject.into(),
            title: format!("{subject} {estimate}"),
            estimated_duration: estimate.into(),
            due_date: due.into(),
            completed,
            completed_at: None,
        }
    }

    fn plan(subject: &str, hours: u32, days: Vec<StudyPlanDay>) -> StudyPlan {
        StudyPlan {
            subject_name: subject.into(),
            hours_per_day: hours,
            days,
        }
    }

    fn plan_day(day: u32, completed: bool, at: Option<DateTime<Utc>>) -> StudyPlanDay {
        StudyPlanDay {
            day,
            topic: String::new(),
            completed,
            completed_at: at,
        }
    }

    #[test]
    fn sessions_outside_week_are_ignored() {
        let agg = aggregator();
        let sessions = vec![
            session("Matemática", 25, local(11, 10)),
            session("Matemática", 25, local(9, 10)),
            session("Matemática", 25, local(17, 10)),
            session("História", 50, local(11, 10)),
        ];
        assert_eq!(agg.weekly_minutes_for_subject("Matemática", &sessions, &[], &[]), 25);
    }

    #[test]
    fn tasks_fall_back_to_due_date() {
        let agg = aggregator();
        let tasks = vec![
            task("Física", "1h30min", "14/03/2024", true),
            task("Física", "2h", "20/03/2024", true),
            task("Física", "3h", "12/03/2024", false),
            task("Física", "1h", "whenever", true),
        ];
        assert_eq!(agg.weekly_minutes_for_subject("Física", &[], &tasks, &[]), 90);
    }

    #[test]
    fn undated_plan_days_count_toward_week_only() {
        let agg = aggregator();
        let plans = vec![plan(
            "Química",
            2,
            vec![
                plan_day(1, true, Some(local(12, 20))),
                plan_day(2, true, None),
                plan_day(3, true, Some(local(3, 20))),
                plan_day(4, false, Some(local(13, 8))),
            ],
        )];

        assert_eq!(agg.weekly_minutes_for_subject("Química", &[], &[], &plans), 240);

        let daily = agg.daily_breakdown(&[], &[], &plans);
        assert_eq!(daily.minutes_on(3), 120);
        assert_eq!(daily.total(), 120);
    }

    #[test]
    fn daily_breakdown_has_all_weekdays() {
        let daily = aggregator().daily_breakdown(&[], &[], &[]);
        assert_eq!(daily.iter().count(), 7);
        assert!(daily.iter().all(|(_, minutes)| minutes == 0));
        assert_eq!(daily.minutes_on(0), 0);
        assert_eq!(daily.minutes_on(8), 0);
    }

    #[test]
    fn daily_breakdown_buckets_by_local_weekday() {
        let agg = aggregator();
        let sessions = vec![
            session("Matemática", 25, local(10, 8)),
            session("História", 30, local(10, 21)),
            session("Matemática", 45, local(16, 22)),
        ];
        let tasks = vec![task("Física", "1h", "13/03/2024", true)];
        let daily = agg.daily_breakdown(&sessions, &tasks, &[]);
        assert_eq!(daily.minutes_on(1), 55);
        assert_eq!(daily.minutes_on(4), 60);
        assert_eq!(daily.minutes_on(7), 45);
    }

    #[test]
    fn rollup_percentages_round_half_up() {
        let tasks = [
            task("Matemática", "1h", "11/03/2024", true),
            task("Matemática", "1h", "12/03/2024", false),
            task("Matemática", "1h", "13/03/2024", false),
        ];
        let rollup = subject_rollup("mat", 135, 4, &tasks);
        assert_eq!(rollup.general_progress_percentage, 56);
        assert_eq!(rollup.completion_percentage, 33);

        let halves = [tasks[0].clone(), tasks[1].clone()];
        assert_eq!(subject_rollup("mat", 0, 4, &halves).completion_percentage, 50);
        // 30 of 240 minutes is 12.5%
        assert_eq!(subject_rollup("mat", 30, 4, &halves).general_progress_percentage, 13);
    }

    #[test]
    fn rollup_handles_zero_denominators_and_clamps() {
        let rollup = subject_rollup("mat", 135, 0, std::iter::empty());
        assert_eq!(rollup.general_progress_percentage, 0);
        assert_eq!(rollup.completion_percentage, 0);

        let over = subject_rollup("mat", 600, 2, std::iter::empty());
        assert_eq!(over.general_progress_percentage, 100);
    }

    #[test]
    fn tasks_this_week_includes_open_tasks() {
        let agg = aggregator();
        let tasks = vec![
            task("Matemática", "1h", "11/03/2024", true),
            task("Matemática", "1h", "15/03/2024", false),
            task("Matemática", "1h", "18/03/2024", false),
            task("Física", "1h", "12/03/2024", false),
        ];
        assert_eq!(agg.tasks_this_week("Matemática", &tasks).len(), 2);
    }

    #[test]
    fn rollup_for_uses_default_goal_when_missing() {
        let agg = aggregator();
        let snapshot = RecordSnapshot {
            subjects: vec![Subject {
                id: "mat".into(),
                name: "Matemática".into(),
                weekly_goal_hours: None,
            }],
            sessions: vec![session("Matemática", 60, local(11, 10))],
            ..RecordSnapshot::default()
        };
        let rollup = agg.rollup_for(&snapshot.subjects[0], &snapshot, 2);
        assert_eq!(rollup.total_weekly_minutes, 60);
        assert_eq!(rollup.general_progress_percentage, 50);
    }

    #[test]
    fn empty_snapshot_yields_zero_report() {
        let report = aggregator().weekly_report(&RecordSnapshot::default(), 10);
        assert_eq!(report.total_minutes, 0);
        assert_eq!(report.daily.total(), 0);
        assert!(report.subjects.is_empty());
        assert_eq!(report.sessions_this_week, 0);
        assert_eq!(report.tasks_completed_this_week, 0);
    }

    #[test]
    fn local_aggregator_covers_current_instant() {
        let agg = ReportAggregator::local();
        assert!(agg.classify_into_current_week(Some(Utc::now())));
        assert_eq!(agg.weekday_of(&Utc::now()), weekday_number(&Utc::now(), &Local));
    }

    #[test]
    fn zoned_week_excludes_previous_saturday_across_dst() {
        use chrono_tz::America::New_York;

        let agg = ReportAggregator::at(New_York.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap());
        // Sat 23:30 EST and Sun 00:30 EST, hours before clocks spring forward.
        let saturday = Utc.with_ymd_and_hms(2024, 3, 10, 4, 30, 0).unwrap();
        let sunday = Utc.with_ymd_and_hms(2024, 3, 10, 5, 30, 0).unwrap();
        let sessions = vec![session("Física", 30, saturday), session("Física", 45, sunday)];

        assert!(!agg.classify_into_current_week(Some(saturday)));
        assert_eq!(agg.weekly_minutes_for_subject("Física", &sessions, &[], &[]), 45);
        assert_eq!(agg.daily_breakdown(&sessions, &[], &[]).minutes_on(1), 45);
    }
}
