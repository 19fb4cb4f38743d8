use std::fmt;
use std::error::Error as StdError;
use serde::{Deserialize, Serialize};
use crate::enums::store_error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReviewError {
    // Configuration errors
    ConfigurationError {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
    ConfigurationFileError {
        path: String,
        reason: String,
    },

    // Remote API errors
    ApiError {
        operation: String,
        status_code: u16,
        message: String,
    },
    NetworkError {
        operation: String,
        url: Option<String>,
        status_code: Option<u16>,
        reason: String,
    },
    AuthenticationError {
        reason: String,
    },

    // File operation errors
    FileOperationError {
        file_path: String,
        operation: String,
        reason: String,
    },

    // Parser errors
    ParseError {
        content_type: String,
        line_number: Option<usize>,
        reason: String,
        context: Option<String>,
    },

    // Review session errors
    SessionNotFound {
        session_id: String,
    },
    InvalidTransition {
        session_id: String,
        state: String,
        action: String,
    },

    // Validation errors
    ValidationError {
        field: String,
        value: String,
        constraint: String,
        suggestion: Option<String>,
    },

    // System errors
    SystemError {
        operation: String,
        reason: String,
    },

    // User input errors
    UserInputError {
        input: String,
        expected: String,
        suggestion: String,
    },

    // Multiple errors (for batch operations)
    MultipleErrors {
        errors: Vec<ReviewError>,
        context: String,
    },
}

impl ReviewError {
    pub fn config_error(message: &str, field: Option<&str>, suggestion: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.map(|s| s.to_string()),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    pub fn api_error(operation: &str, status_code: u16, message: &str) -> Self {
        Self::ApiError {
            operation: operation.to_string(),
            status_code,
            message: message.to_string(),
        }
    }

    pub fn file_error(file_path: &str, operation: &str, reason: &str) -> Self {
        Self::FileOperationError {
            file_path: file_path.to_string(),
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn system_error(operation: &str, reason: &str) -> Self {
        Self::SystemError {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn session_not_found(session_id: &str) -> Self {
        Self::SessionNotFound {
            session_id: session_id.to_string(),
        }
    }

    pub fn invalid_transition(session_id: &str, state: &str, action: &str) -> Self {
        Self::InvalidTransition {
            session_id: session_id.to_string(),
            state: state.to_string(),
            action: action.to_string(),
        }
    }

    pub fn validation_error(field: &str, value: &str, constraint: &str, suggestion: Option<&str>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    pub fn user_input_error(input: &str, expected: &str, suggestion: &str) -> Self {
        Self::UserInputError {
            input: input.to_string(),
            expected: expected.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NetworkError { .. } => true,
            Self::ApiError { status_code, .. } => *status_code >= 500 || *status_code == 429,
            Self::UserInputError { .. } => true,
            Self::ValidationError { .. } => true,
            Self::ConfigurationError { .. } => true,
            Self::InvalidTransition { .. } => true,
            Self::AuthenticationError { .. } => false,
            Self::SessionNotFound { .. } => false,
            Self::SystemError { .. } => false,
            Self::MultipleErrors { errors, .. } => errors.iter().any(|e| e.is_recoverable()),
            _ => false,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SystemError { .. } => ErrorSeverity::Critical,
            Self::FileOperationError { .. } => ErrorSeverity::High,
            Self::ConfigurationFileError { .. } => ErrorSeverity::High,
            Self::AuthenticationError { .. } => ErrorSeverity::High,
            Self::ApiError { .. } => ErrorSeverity::Medium,
            Self::NetworkError { .. } => ErrorSeverity::Medium,
            Self::ParseError { .. } => ErrorSeverity::Medium,
            Self::SessionNotFound { .. } => ErrorSeverity::Medium,
            Self::InvalidTransition { .. } => ErrorSeverity::Low,
            Self::ValidationError { .. } => ErrorSeverity::Low,
            Self::ConfigurationError { .. } => ErrorSeverity::Low,
            Self::UserInputError { .. } => ErrorSeverity::Low,
            Self::MultipleErrors { errors, .. } => {
                errors.iter()
                    .map(|e| e.severity())
                    .max()
                    .unwrap_or(ErrorSeverity::Low)
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { message, field, suggestion } => {
                let mut msg = format!("Configuration Error: {}", message);
                if let Some(field) = field {
                    msg.push_str(&format!(" (field: {})", field));
                }
                if let Some(suggestion) = suggestion {
                    msg.push_str(&format!("\n💡 Suggestion: {}", suggestion));
                }
                msg
            }
            Self::ConfigurationFileError { path, reason } => {
                format!("Configuration file error at '{}': {}\n💡 Check file permissions and syntax", path, reason)
            }
            Self::ApiError { operation, status_code, message } => {
                let mut msg = format!("API error during {} (Status: {}): {}", operation, status_code, message);
                if *status_code == 401 || *status_code == 403 {
                    msg.push_str("\n💡 Run 'parfum-review login' to refresh your token");
                }
                msg
            }
            Self::NetworkError { operation, url, status_code, reason } => {
                let mut msg = format!("Network error during {}: {}", operation, reason);
                if let Some(url) = url {
                    msg.push_str(&format!(" (URL: {})", url));
                }
                if let Some(code) = status_code {
                    msg.push_str(&format!(" (Status: {})", code));
                }
                msg.push_str("\n💡 Check your internet connection and try again");
                msg
            }
            Self::AuthenticationError { reason } => {
                format!("Authentication failed: {}\n💡 Run 'parfum-review login' to sign in again", reason)
            }
            Self::FileOperationError { file_path, operation, reason } => {
                format!("File operation '{}' failed for '{}': {}\n💡 Check file permissions and path", operation, file_path, reason)
            }
            Self::ParseError { content_type, line_number, reason, context } => {
                let mut msg = format!("Parse error in {}: {}", content_type, reason);
                if let Some(line) = line_number {
                    msg.push_str(&format!(" (line {})", line));
                }
                if let Some(ctx) = context {
                    msg.push_str(&format!("\nContext: {}", ctx));
                }
                msg.push_str("\n💡 Check the format and syntax of the input");
                msg
            }
            Self::SessionNotFound { session_id } => {
                format!("Review session '{}' not found\n💡 The session may have been closed", session_id)
            }
            Self::InvalidTransition { session_id, state, action } => {
                format!("Cannot {} review session '{}' while it is {}", action, session_id, state)
            }
            Self::ValidationError { field, value, constraint, suggestion } => {
                let mut msg = format!("Validation error for field '{}': value '{}' violates constraint '{}'", field, value, constraint);
                if let Some(suggestion) = suggestion {
                    msg.push_str(&format!("\n💡 Suggestion: {}", suggestion));
                }
                msg
            }
            Self::SystemError { operation, reason } => {
                format!("System error during {}: {}\n💡 This may require administrator intervention", operation, reason)
            }
            Self::UserInputError { input, expected, suggestion } => {
                format!("Invalid input '{}': expected {}\n💡 {}", input, expected, suggestion)
            }
            Self::MultipleErrors { errors, context } => {
                let mut msg = format!("Multiple errors occurred during {}:\n", context);
                for (i, error) in errors.iter().enumerate() {
                    msg.push_str(&format!("  {}. {}\n", i + 1, error.user_message().replace('\n', "\n     ")));
                }
                msg
            }
        }
    }

    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }

    pub fn with_context(self, context: &str) -> Self {
        match self {
            Self::MultipleErrors { errors, context: existing_context } => {
                Self::MultipleErrors {
                    errors,
                    context: format!("{} -> {}", existing_context, context),
                }
            }
            _ => Self::MultipleErrors {
                errors: vec![self],
                context: context.to_string(),
            }
        }
    }
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl StdError for ReviewError {}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🟠",
            Self::Critical => "🔴",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Result type alias for review operations
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Error handler for consistent error processing
pub struct ErrorHandler;

impl ErrorHandler {
    /// Handle error with appropriate logging and user feedback
    pub fn handle_error(error: &ReviewError) {
        let severity = error.severity();

        log::error!("[{}] {}", severity.name(), error.technical_details());

        eprintln!("{} {}", severity.emoji(), error.user_message());

        if error.is_recoverable() {
            eprintln!("🔄 This error is recoverable - you can retry the operation");
        }
    }
}

/// Extension trait for Result to add context
pub trait ResultExt<T> {
    fn with_context(self, context: &str) -> ReviewResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ReviewError>,
{
    fn with_context(self, context: &str) -> ReviewResult<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

/// Convert from standard library errors
impl From<std::io::Error> for ReviewError {
    fn from(error: std::io::Error) -> Self {
        ReviewError::SystemError {
            operation: "I/O operation".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReviewError {
    fn from(error: serde_json::Error) -> Self {
        ReviewError::ParseError {
            content_type: "JSON".to_string(),
            line_number: Some(error.line()),
            reason: error.to_string(),
            context: None,
        }
    }
}

impl From<toml::de::Error> for ReviewError {
    fn from(error: toml::de::Error) -> Self {
        ReviewError::ParseError {
            content_type: "TOML".to_string(),
            line_number: None,
            reason: error.message().to_string(),
            context: None,
        }
    }
}

impl From<toml::ser::Error> for ReviewError {
    fn from(error: toml::ser::Error) -> Self {
        ReviewError::SystemError {
            operation: "TOML serialization".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for ReviewError {
    fn from(error: reqwest::Error) -> Self {
        ReviewError::NetworkError {
            operation: "HTTP request".to_string(),
            url: error.url().map(|u| u.to_string()),
            status_code: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }
}

impl From<StoreError> for ReviewError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Api { operation, status, message } => ReviewError::ApiError {
                operation,
                status_code: status,
                message,
            },
            StoreError::Unauthorized(reason) => ReviewError::AuthenticationError { reason },
            StoreError::Transport(reqwest_error) => reqwest_error.into(),
            StoreError::Decode { operation, reason } => ReviewError::ParseError {
                content_type: format!("{} response", operation),
                line_number: None,
                reason,
                context: None,
            },
        }
    }
}
