use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ui::formatters::truncate_at_boundary;

/// Longest token a single sensor may contribute, in bytes.
pub const MAX_TOKEN_LEN: usize = 16;

/// Generic sentinel for a source that could not produce a value.
pub const ERR_TOKEN: &str = "err";

/// The fixed, compiled set of metric sources, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Brightness,
    Battery,
    Volume,
    Keyboard,
    Tunnel,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Brightness,
        Metric::Battery,
        Metric::Volume,
        Metric::Keyboard,
        Metric::Tunnel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Brightness => "brightness",
            Metric::Battery => "battery",
            Metric::Volume => "volume",
            Metric::Keyboard => "keyboard",
            Metric::Tunnel => "tunnel",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sensor's result for one cycle.
///
/// Readings are created fresh every cycle and dropped once the status line
/// has been formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricReading {
    pub token: String,
    pub ok: bool,
}

impl MetricReading {
    pub fn ok<S: AsRef<str>>(token: S) -> Self {
        Self {
            token: truncate_at_boundary(token.as_ref(), MAX_TOKEN_LEN).to_string(),
            ok: true,
        }
    }

    /// A failed reading rendered with a source-specific sentinel.
    pub fn sentinel<S: AsRef<str>>(token: S) -> Self {
        Self {
            token: truncate_at_boundary(token.as_ref(), MAX_TOKEN_LEN).to_string(),
            ok: false,
        }
    }

    /// A failed reading rendered with the generic `err` sentinel.
    pub fn unavailable() -> Self {
        Self::sentinel(ERR_TOKEN)
    }
}

/// Format a `current / max` pair as a rounded percentage token.
pub fn percent_token(current: f64, max: f64) -> Option<String> {
    if max.is_nan() || max <= 0.0 || !current.is_finite() {
        return None;
    }
    Some(format!("{}%", (current / max * 100.0).round() as i64))
}
