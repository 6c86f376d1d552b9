use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZintError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Format error: {0}")]
    FormatError(String),

    #[error("Validation failed: {}", summarize(.0))]
    ValidationError(BTreeMap<String, Vec<String>>),

    #[error("zint reported an error (exit code {}): {stderr}", exit_code_str(.exit_code))]
    ToolError {
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("Launch error: {0}")]
    LaunchError(String),

    #[error("zint did not finish within {timeout_ms} ms and was killed")]
    Timeout { timeout_ms: u128 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn summarize(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn exit_code_str(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

/// Generates factory methods for [`ZintError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl ZintError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a format (structural parse) error.
    format => FormatError,
    /// Create a launch error.
    launch => LaunchError,
}

impl From<serde_yml::Error> for ZintError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for ZintError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ZintError>;
