// Platform-specific code module

pub mod command;
pub mod sysfs;

pub use command::{run_for_stdout, run_with_env, run_with_timeout};
pub use sysfs::{read_first_number, read_number, read_trimmed};
