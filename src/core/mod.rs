// Core business logic module

pub mod config;
pub mod status;

// Re-export commonly used items
pub use config::Config;
pub use status::{ScheduleState, StatusEngine, StatusFormatter, StatusLine};
