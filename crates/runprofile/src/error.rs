use miette::Diagnostic;
use serde_json::Value;
use std::fmt;

use crate::model::ErrorInfo;

pub type ProfileResult<T> = Result<T, ProfileError>;

/// Error raised by settings persistence, configuration loading, and profile
/// updates. Codes are stable `E_*` identifiers suitable for JSON output.
#[derive(Debug)]
pub struct ProfileError {
    pub code: String,
    pub message: String,
    pub context: Option<Value>,
}

impl ProfileError {
    pub fn unsupported_setting(
        message: impl Into<String>,
        context: impl Into<Option<Value>>,
    ) -> Self {
        Self {
            code: "E_SETTING_UNSUPPORTED".to_string(),
            message: message.into(),
            context: context.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, context: impl Into<Option<Value>>) -> Self {
        Self {
            code: "E_NOT_FOUND".to_string(),
            message: message.into(),
            context: context.into(),
        }
    }

    pub fn cli_invalid_arg(message: impl Into<String>) -> Self {
        Self {
            code: "E_CLI_INVALID_ARG".to_string(),
            message: message.into(),
            context: None,
        }
    }

    pub fn io(
        code: impl Into<String>,
        message: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: Some(serde_json::json!({ "source": err.to_string() })),
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.code.as_str() {
            "E_CLI_INVALID_ARG" | "E_SETTING_UNSUPPORTED" => 2,
            "E_IO" => 3,
            "E_PROTOCOL" | "E_CONFIG" => 4,
            "E_NOT_FOUND" => 5,
            _ => 1,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code.clone(),
            message: self.message.clone(),
            context: self.context.clone(),
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl Diagnostic for ProfileError {}
