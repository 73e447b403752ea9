//! Free-text study durations.
//!
//! Task estimates are typed by hand ("2h", "1h30min", "45min", "90") and
//! are read back as whole minutes. Anything unreadable counts as zero.

use tracing::debug;

/// Parse a free-text duration into minutes. Never fails.
///
/// With an `h` present, the digits before the first `h` are hours and the
/// digits after it are minutes. Otherwise all digits are minutes.
pub fn parse_duration_to_minutes(text: &str) -> u32 {
    let normalized = text.trim().to_lowercase();
    let minutes = match normalized.split_once('h') {
        Some((hours, rest)) => digits(hours).saturating_mul(60).saturating_add(digits(rest)),
        None => digits(&normalized),
    };
    if minutes == 0 && !normalized.is_empty() {
        debug!(text, "duration text has no usable digits, counting as 0 minutes");
    }
    minutes
}

/// Render minutes the way estimates are usually typed.
///
/// The output always parses back to the same value.
pub fn format_minutes(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{m}min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}min"),
    }
}

fn digits(s: &str) -> u32 {
    let only: String = s.chars().filter(char::is_ascii_digit).collect();
    only.parse().unwrap_or(0)
}
