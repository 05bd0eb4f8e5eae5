use serde::Serialize;
use thiserror::Error;

/// One deviation between the model output and the expected response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub expected: String,
    pub received: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Provider rejected credentials (HTTP {status}): {message}")]
    UpstreamAuth { status: u16, message: String },

    #[error("Provider request failed{}: {message}", status_suffix(.status))]
    Upstream { status: Option<u16>, message: String },

    #[error("Model output is not valid JSON: {message}")]
    MalformedJson { message: String },

    #[error("Model output violates response schema ({} violation(s))", .violations.len())]
    SchemaViolation { violations: Vec<Violation> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Inventory error: {message}")]
    InventoryError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller can fix the request.
    Client,
    /// Operator must fix configuration or credentials.
    Configuration,
    /// Provider call failed.
    Upstream,
    /// Provider answered, but not in the agreed format.
    ModelOutput,
}

impl ScoutError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// The provider did not answer within the request deadline.
    pub fn timed_out(after: std::time::Duration) -> Self {
        Self::upstream(
            None,
            format!("Provider call timed out after {}s", after.as_secs_f32()),
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest { .. } => ErrorCategory::Client,
            Self::UpstreamAuth { .. } => ErrorCategory::Configuration,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::MalformedJson { .. } | Self::SchemaViolation { .. } => {
                ErrorCategory::ModelOutput
            }
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InventoryError { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP status surfaced to the caller. Everything the caller cannot fix is a 500.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client => 400,
            _ => 500,
        }
    }

    /// The `error` field of the response body.
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest { message } => message.clone(),
            Self::UpstreamAuth { .. } => {
                "Invalid OpenAI API key. Please check your OPENAI_API_KEY environment variable."
                    .to_string()
            }
            Self::SchemaViolation { .. } => "Invalid AI response format".to_string(),
            _ => "Failed to process search request".to_string(),
        }
    }

    /// The optional `details` field of the response body.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::BadRequest { .. } | Self::UpstreamAuth { .. } => None,
            Self::SchemaViolation { violations } => serde_json::to_value(violations).ok(),
            Self::Upstream { message, .. } | Self::MalformedJson { message } => {
                Some(serde_json::Value::String(message.clone()))
            }
            other => Some(serde_json::Value::String(other.to_string())),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "Send a JSON body with a non-empty \"query\" string",
            Self::UpstreamAuth { .. } => {
                "Check that OPENAI_API_KEY holds a valid key for the configured provider"
            }
            Self::Upstream { .. } => "The provider may be unavailable; retry the request later",
            Self::MalformedJson { .. } | Self::SchemaViolation { .. } => {
                "The model ignored the response contract; retrying may succeed"
            }
            Self::MissingConfigError { .. } => {
                "Set the missing value in the config file or environment"
            }
            Self::InventoryError { .. } => "Fix the inventory file and restart",
            _ => "Review the configuration and restart",
        }
    }

    /// Process exit code for one-shot CLI usage.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Client => 2,
            ErrorCategory::Upstream | ErrorCategory::ModelOutput => 1,
            ErrorCategory::Configuration => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_by_category() {
        assert_eq!(ScoutError::bad_request("empty").status_code(), 400);
        assert_eq!(ScoutError::upstream(Some(503), "down").status_code(), 500);
        let auth = ScoutError::UpstreamAuth {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(auth.status_code(), 500);
        assert_eq!(auth.category(), ErrorCategory::Configuration);
        let malformed = ScoutError::MalformedJson {
            message: "expected value".to_string(),
        };
        assert_eq!(malformed.status_code(), 500);
        assert_eq!(malformed.category(), ErrorCategory::ModelOutput);
    }

    #[test]
    fn test_auth_error_hides_provider_message() {
        let err = ScoutError::UpstreamAuth {
            status: 401,
            message: "Incorrect API key provided: sk-abc".to_string(),
        };
        assert!(err.details().is_none());
        assert!(!err.public_message().contains("sk-abc"));
    }

    #[test]
    fn test_schema_violation_details_list_every_violation() {
        let err = ScoutError::SchemaViolation {
            violations: vec![
                Violation {
                    path: "matches[0].id".to_string(),
                    expected: "integer".to_string(),
                    received: "string".to_string(),
                    message: "Expected integer, received string".to_string(),
                },
                Violation {
                    path: "message".to_string(),
                    expected: "string".to_string(),
                    received: "null".to_string(),
                    message: "Expected string, received null".to_string(),
                },
            ],
        };
        let details = err.details().unwrap();
        assert_eq!(details.as_array().unwrap().len(), 2);
        assert_eq!(details[0]["path"], "matches[0].id");
        assert_eq!(err.public_message(), "Invalid AI response format");
        assert_eq!(
            err.to_string(),
            "Model output violates response schema (2 violation(s))"
        );
    }

    #[test]
    fn test_upstream_display_with_and_without_status() {
        assert_eq!(
            ScoutError::upstream(Some(502), "bad gateway").to_string(),
            "Provider request failed (HTTP 502): bad gateway"
        );
        assert_eq!(
            ScoutError::upstream(None, "connection refused").to_string(),
            "Provider request failed: connection refused"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ScoutError::bad_request("x").exit_code(), 2);
        assert_eq!(ScoutError::upstream(None, "x").exit_code(), 1);
        let missing = ScoutError::MissingConfigError {
            field: "provider.api_key".to_string(),
        };
        assert_eq!(missing.exit_code(), 3);
    }
}
