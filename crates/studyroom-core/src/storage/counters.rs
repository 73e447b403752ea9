//! Focus counters persisted between CLI runs as `counters.json`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;

use super::data_dir;
use crate::error::Result;
use crate::timer::FocusCounters;

#[derive(Debug, Clone)]
pub struct CountersFile {
    path: PathBuf,
}

impl CountersFile {
    /// `counters.json` in the data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("counters.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the counters and roll them over to `today`.
    ///
    /// A missing or unreadable file starts fresh counters.
    pub fn load(&self, today: NaiveDate) -> FocusCounters {
        let mut counters = match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt counters file");
                FocusCounters::default()
            }),
            Err(_) => FocusCounters::default(),
        };
        counters.roll_over(today);
        counters
    }

    pub fn save(&self, counters: &FocusCounters) -> Result<()> {
        let json = serde_json::to_string_pretty(counters)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let file = CountersFile::at(dir.path().join("counters.json"));
        let counters = file.load(day(4));
        assert_eq!(counters, FocusCounters::new(day(4)));
    }

    #[test]
    fn saved_counters_survive_same_day_and_roll_next_day() {
        let dir = tempfile::tempdir().unwrap();
        let file = CountersFile::at(dir.path().join("counters.json"));

        let mut counters = file.load(day(4));
        counters.record_completion(25);
        file.save(&counters).unwrap();

        let same_day = file.load(day(4));
        assert_eq!(same_day.focused_minutes_today(), 25);

        let next_day = file.load(day(5));
        assert_eq!(next_day.focused_minutes_today(), 0);
        assert_eq!(next_day.completed_sessions(), 1);
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counters.json");
        std::fs::write(&path, "{ not json").unwrap();
        let counters = CountersFile::at(&path).load(day(4));
        assert_eq!(counters.completed_sessions(), 0);
    }
}
