//! Record snapshots fetched by the caller from the document store.
//!
//! The aggregator only reads these. Field names follow the stored documents,
//! so a JSON export of a user's data deserializes directly.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::week::parse_due_date;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Hours the student aims to study this subject per week.
    #[serde(default)]
    pub weekly_goal_hours: Option<u32>,
}

/// A finished Pomodoro focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub subject: String,
    pub minutes: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyTask {
    pub subject: String,
    #[serde(default)]
    pub title: String,
    /// Free-text estimate, e.g. "1h30min".
    #[serde(default)]
    pub estimated_duration: String,
    /// `dd/mm/yyyy`
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StudyTask {
    /// Completion time if recorded, otherwise the due date at 09:00 local.
    pub fn effective_timestamp<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        self.completed_at
            .or_else(|| parse_due_date(&self.due_date, tz))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub subject_name: String,
    pub hours_per_day: u32,
    #[serde(default)]
    pub days: Vec<StudyPlanDay>,
}

impl StudyPlan {
    /// Minutes one completed day of this plan is worth.
    pub fn minutes_per_day(&self) -> u32 {
        self.hours_per_day.saturating_mul(60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlanDay {
    /// 1-based position within the plan.
    pub day: u32,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Everything the reports are computed from, fetched in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub sessions: Vec<PomodoroSession>,
    #[serde(default)]
    pub tasks: Vec<StudyTask>,
    #[serde(default)]
    pub plans: Vec<StudyPlan>,
}

impl RecordSnapshot {
    /// Read a JSON snapshot from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
