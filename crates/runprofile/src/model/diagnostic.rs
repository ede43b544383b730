use serde::{Deserialize, Serialize};

/// Message shown when the runner executable could not be launched.
pub const RUNNER_NOT_INSTALLED: &str = "Robot Framework installation not found.\n\
To run tests, you need to install Robot Framework separately.\n\
See http://robotframework.org for installation instructions.";

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    #[default]
    Info,
    Warn,
    Error,
}

/// Category assigned to a failed run by [`crate::profile::RunProfile::classify_failure`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RunnerNotInstalled,
}

/// User-facing log entry produced while interpreting a run's aftermath.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogMessage {
    pub kind: FailureKind,
    pub message: String,
    pub level: LogLevel,
    /// Whether the host should surface the message in a notification
    /// instead of only writing it to the log.
    pub notify_user: bool,
}

impl LogMessage {
    #[must_use]
    pub fn runner_not_installed() -> Self {
        Self {
            kind: FailureKind::RunnerNotInstalled,
            message: RUNNER_NOT_INSTALLED.to_string(),
            level: LogLevel::Error,
            notify_user: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
}
