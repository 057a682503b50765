// Formatting helpers shared by the status line and the CLI

pub mod formatters;

pub use formatters::{format_clock, truncate_at_boundary, WeekdayStyle};
