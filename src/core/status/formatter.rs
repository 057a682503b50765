//! Status line composition.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::reading::{MetricReading, ERR_TOKEN};
use crate::ui::formatters::truncate_at_boundary;

/// Upper bound of the root window title, in bytes.
pub const DEFAULT_MAX_STATUS_LEN: usize = 128;

pub const SEPARATOR: &str = " | ";

/// Label printed in front of each sensor slot, in display order.
///
/// brightness, battery, volume, keyboard, tunnel. The clock follows the last
/// slot without a label.
pub const SLOT_LABELS: [&str; 5] = ["☀ ", "🔋 ", "🔊 ", "⌨ ", ""];

/// The text published for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub text: String,
    pub cycle_timestamp: DateTime<Local>,
}

/// Builds status lines with a fixed layout and a hard length limit.
#[derive(Debug, Clone)]
pub struct StatusFormatter {
    max_len: usize,
}

impl Default for StatusFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STATUS_LEN)
    }
}

impl StatusFormatter {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Compose the status text.
    ///
    /// Readings fill the slots in order. A missing reading shows `err`,
    /// readings beyond the last slot are ignored, so the output always has
    /// the same fields and separators. The result is cut at `max_len` bytes
    /// on a character boundary.
    pub fn compose(&self, readings: &[MetricReading], time_text: &str) -> String {
        let mut text = String::with_capacity(self.max_len);
        text.push(' ');

        for (i, label) in SLOT_LABELS.iter().enumerate() {
            let token = readings
                .get(i)
                .map(|r| r.token.as_str())
                .unwrap_or(ERR_TOKEN);
            text.push_str(label);
            text.push_str(token);
            text.push_str(SEPARATOR);
        }
        text.push_str(time_text);

        let end = truncate_at_boundary(&text, self.max_len).len();
        text.truncate(end);
        text
    }

    /// Compose the status line for the cycle that started at `cycle_timestamp`.
    pub fn format(
        &self,
        readings: &[MetricReading],
        time_text: &str,
        cycle_timestamp: DateTime<Local>,
    ) -> StatusLine {
        StatusLine {
            text: self.compose(readings, time_text),
            cycle_timestamp,
        }
    }
}
