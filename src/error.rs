use std::time::Duration;
use thiserror::Error;

use crate::core::status::Metric;

/// Custom error type for dwmstat
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{metric} unavailable: {reason}")]
    SourceUnavailable { metric: Metric, reason: String },

    #[error("{0} not present")]
    SourceAbsent(Metric),

    #[error("{metric} did not answer within {after:?}")]
    SourceTimeout { metric: Metric, after: Duration },

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Display sink unavailable: {0}")]
    DisplaySink(String),

    #[error("Signal registration failed: {0}")]
    SignalRegistration(String),
}

/// Result type alias for dwmstat
pub type Result<T> = std::result::Result<T, StatusError>;

impl StatusError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        StatusError::Config(msg.into())
    }

    /// Create a source unavailable error
    pub fn unavailable<S: Into<String>>(metric: Metric, reason: S) -> Self {
        StatusError::SourceUnavailable {
            metric,
            reason: reason.into(),
        }
    }

    pub fn publish<S: Into<String>>(msg: S) -> Self {
        StatusError::Publish(msg.into())
    }

    pub fn display_sink<S: Into<String>>(msg: S) -> Self {
        StatusError::DisplaySink(msg.into())
    }

    pub fn signal_registration<S: Into<String>>(msg: S) -> Self {
        StatusError::SignalRegistration(msg.into())
    }

    /// Whether the error happened before the cycle loop could start.
    pub fn is_bootstrap(&self) -> bool {
        matches!(
            self,
            StatusError::DisplaySink(_)
                | StatusError::SignalRegistration(_)
                | StatusError::Config(_)
        )
    }

    /// Process exit code for this error.
    ///
    /// Bootstrap failures each get their own code; anything else that reaches
    /// the top level (a failed `--once` publish) exits with 4.
    pub fn exit_code(&self) -> i32 {
        match self {
            StatusError::DisplaySink(_) => 1,
            StatusError::SignalRegistration(_) => 2,
            StatusError::Config(_) => 3,
            _ => 4,
        }
    }
}
