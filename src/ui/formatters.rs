use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

/// How the weekday is rendered in the clock field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayStyle {
    /// `Mon`, `Tue`, ...
    #[default]
    English,
    /// `月`, `火`, ...
    Kanji,
}

const KANJI_WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Cut `text` to at most `max_len` bytes without splitting a character.
pub fn truncate_at_boundary(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Format the clock field, e.g. `W12 Tue 14 Mar 09:05`.
///
/// The week number is `%W` (Monday-based, week 00 before the first Monday).
pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>, style: WeekdayStyle) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let weekday = match style {
        WeekdayStyle::English => time.format("%a").to_string(),
        WeekdayStyle::Kanji => {
            KANJI_WEEKDAYS[time.weekday().num_days_from_sunday() as usize].to_string()
        }
    };

    format!(
        "{} {} {}",
        time.format("W%W"),
        weekday,
        time.format("%d %b %H:%M")
    )
}
