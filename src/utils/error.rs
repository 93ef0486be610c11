use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("RPC call {method} failed ({code}): {message}")]
    RpcError {
        method: String,
        code: i64,
        message: String,
    },

    #[error("Authentication failed for '{login}' on database '{database}'")]
    AuthenticationError { database: String, login: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Could not decode {entity} record: {message}")]
    DecodeError { entity: String, message: String },

    #[error("{entity} record {id} not found")]
    RecordNotFound { entity: String, id: i64 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown time zone: {name}")]
    UnknownTimeZone { name: String },

    #[error("Action {action} failed: {message}")]
    ActionError { action: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    DataSource,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::ApiError(_) => ErrorCategory::Network,
            DashboardError::RpcError { .. }
            | DashboardError::AuthenticationError { .. }
            | DashboardError::RecordNotFound { .. }
            | DashboardError::ActionError { .. } => ErrorCategory::DataSource,
            DashboardError::SerializationError(_) | DashboardError::DecodeError { .. } => {
                ErrorCategory::Data
            }
            DashboardError::ConfigError { .. }
            | DashboardError::MissingConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::UnknownTimeZone { .. } => ErrorCategory::Configuration,
            DashboardError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DashboardError::RecordNotFound { .. } | DashboardError::ActionError { .. } => {
                ErrorSeverity::Low
            }
            DashboardError::ApiError(_) | DashboardError::RpcError { .. } => ErrorSeverity::Medium,
            DashboardError::SerializationError(_)
            | DashboardError::DecodeError { .. }
            | DashboardError::AuthenticationError { .. }
            | DashboardError::ConfigError { .. }
            | DashboardError::MissingConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::UnknownTimeZone { .. } => ErrorSeverity::High,
            DashboardError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the server URL is reachable and try again",
            ErrorCategory::DataSource => match self {
                DashboardError::AuthenticationError { .. } => {
                    "Verify the database name, login and password in [source]"
                }
                _ => "Check that the hotel_manager module is installed and the user can read its models",
            },
            ErrorCategory::Data => "The server returned records in an unexpected shape; check the module version",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::ApiError(e) if e.is_timeout() => {
                "The hotel server did not answer in time".to_string()
            }
            DashboardError::ApiError(_) => "Could not reach the hotel server".to_string(),
            DashboardError::AuthenticationError { login, .. } => {
                format!("Login rejected for user '{}'", login)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
