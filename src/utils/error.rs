use thiserror::Error;

fn status_detail(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum PathplanError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Analysis service unreachable: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}{}", status_detail(.message))]
    ServiceError {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },

    #[error("{endpoint} returned a body that is not valid JSON: {source}")]
    DecodeError {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{entity} is missing required field `{field}`")]
    MissingFieldError { entity: &'static str, field: &'static str },

    #[error("{entity} field `{field}` is invalid: {reason}")]
    InvalidFieldError {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Session store error: {message}")]
    StoreError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Upstream,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PathplanError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::TransportError(_) => ErrorCategory::Network,
            Self::ServiceError { .. } | Self::DecodeError { .. } => ErrorCategory::Upstream,
            Self::MissingFieldError { .. }
            | Self::InvalidFieldError { .. }
            | Self::SerializationError(_) => ErrorCategory::Data,
            Self::IoError(_) | Self::StoreError { .. } => ErrorCategory::Storage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            // the user re-triggers the action; nothing retries automatically
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the user. Decode failures read the same as service failures.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::TransportError(_) => {
                "The analysis service could not be reached. Backend may be offline.".to_string()
            }
            Self::ServiceError { message: Some(m), .. } => {
                format!("The analysis service rejected the request: {}", m)
            }
            Self::ServiceError { status, .. } => {
                format!("The analysis service failed (status {}).", status)
            }
            Self::DecodeError { .. } => {
                "The analysis service failed (unreadable response).".to_string()
            }
            Self::MissingFieldError { entity, .. } | Self::InvalidFieldError { entity, .. } => {
                format!("The {} returned by the service is incomplete.", entity)
            }
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::SerializationError(_) | Self::StoreError { .. } => {
                "Session data could not be read or written.".to_string()
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Provide the missing input, or run `pathplan analyze --resume <file>` first."
            }
            ErrorCategory::Network => {
                "Check that the analysis service is running and --api-base-url points at it, then try again."
            }
            ErrorCategory::Upstream | ErrorCategory::Data => {
                "Try the action again; if it keeps failing, start over with `pathplan analyze`."
            }
            ErrorCategory::Storage => {
                "Check the session file location, or run `pathplan restart --clear`."
            }
            ErrorCategory::Configuration => "Fix the configuration value and run the command again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, PathplanError>;
