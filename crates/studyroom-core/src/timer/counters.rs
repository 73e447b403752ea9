//! Focus counters owned by the screen-level controller.
//!
//! Replaces process-wide mutable preferences: whoever hosts the timer owns
//! one `FocusCounters` and lends it to the engine on every tick.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusCounters {
    /// Monotonic count of finished focus sessions.
    completed_sessions: u32,
    /// Minutes focused on `day`.
    focused_minutes_today: u32,
    /// Calendar day the minutes belong to, once known.
    #[serde(default)]
    day: Option<NaiveDate>,
}

impl FocusCounters {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn focused_minutes_today(&self) -> u32 {
        self.focused_minutes_today
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn record_completion(&mut self, minutes: u32) {
        self.completed_sessions = self.completed_sessions.saturating_add(1);
        self.focused_minutes_today = self.focused_minutes_today.saturating_add(minutes);
    }

    /// Move the counters to `today`, clearing today's minutes when the day
    /// changed. Returns true if a rollover happened.
    ///
    /// The session count is never cleared.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        match self.day {
            Some(day) if day == today => false,
            previous => {
                debug!(?previous, %today, "rolling focus counters over to a new day");
                self.day = Some(today);
                self.focused_minutes_today = 0;
                previous.is_some()
            }
        }
    }

    /// Percentage (0..=100, round-half-up) of the daily session goal reached,
    /// measured in focused minutes against `goal_sessions * focus_minutes`.
    pub fn daily_goal_progress(&self, goal_sessions: u32, focus_minutes: u32) -> u8 {
        let target = u64::from(goal_sessions) * u64::from(focus_minutes);
        crate::report::percent(u64::from(self.focused_minutes_today), target)
    }
}
