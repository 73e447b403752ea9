//! Sunday-to-Saturday week windows and weekday numbering.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Hour of day assigned to tasks that only carry a due date.
const DUE_DATE_HOUR: u32 = 9;

/// The week containing "now": Sunday 00:00:00.000 through Saturday
/// 23:59:59.999 in the reporting time zone, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekWindow {
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let back = u64::from(today.weekday().num_days_from_sunday());
        let sunday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        let next_sunday = sunday.checked_add_days(Days::new(7)).unwrap_or(sunday);

        let start = local_instant(&tz, sunday.and_time(NaiveTime::MIN));
        let next_start = local_instant(&tz, next_sunday.and_time(NaiveTime::MIN));
        Self {
            start,
            end: next_start - chrono::Duration::milliseconds(1),
        }
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start && *at <= self.end
    }
}

/// Weekday number of `at` in `tz`, Sunday = 1 through Saturday = 7.
pub fn weekday_number<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> u8 {
    // num_days_from_sunday is 0..=6
    at.with_timezone(tz).weekday().num_days_from_sunday() as u8 + 1
}

/// Parse a `dd/mm/yyyy` due date as 09:00:00 local time.
pub fn parse_due_date<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()?;
    let time = NaiveTime::from_hms_opt(DUE_DATE_HOUR, 0, 0)?;
    Some(local_instant(tz, date.and_time(time)))
}

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times take the earlier instant. Times skipped by a DST jump
/// resolve to the first valid time an hour later.
fn local_instant<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
