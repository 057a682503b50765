// Command handlers module
pub mod config;
pub mod run;

// Re-exports for cleaner imports
pub use run::{execute as run, RunOptions};
