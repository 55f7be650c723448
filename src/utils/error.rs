use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    TransportError(#[from] reqwest::Error),

    #[error("{message}")]
    ApiError {
        status: u16,
        message: String,
        detail: Option<serde_json::Value>,
    },

    #[error("Response decoding error: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Data,
    Configuration,
    Usage,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::TransportError(_) => ErrorCategory::Network,
            ClientError::ApiError { .. } => ErrorCategory::Server,
            ClientError::DecodeError(_) | ClientError::UnexpectedResponse { .. } => {
                ErrorCategory::Data
            }
            ClientError::IoError(_) => ErrorCategory::System,
            ClientError::ConfigValidationError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ClientError::InvalidArgument { .. } => ErrorCategory::Usage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ClientError::TransportError(e) if e.is_timeout() || e.is_connect() => {
                ErrorSeverity::Medium
            }
            ClientError::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            ClientError::TransportError(_)
            | ClientError::ApiError { .. }
            | ClientError::DecodeError(_)
            | ClientError::UnexpectedResponse { .. }
            | ClientError::InvalidArgument { .. } => ErrorSeverity::High,
            ClientError::IoError(_)
            | ClientError::ConfigValidationError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Failures raised by a request; these were already shown through the notifier.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            ClientError::TransportError(_)
                | ClientError::ApiError { .. }
                | ClientError::DecodeError(_)
                | ClientError::UnexpectedResponse { .. }
        )
    }

    /// 顯示給使用者的訊息：優先使用伺服器回傳的 detail
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Request failed".to_string()
        } else {
            message
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::TransportError(e) if e.is_timeout() => {
                "The server did not answer in time".to_string()
            }
            ClientError::TransportError(e) if e.is_connect() => {
                "Could not connect to the data server".to_string()
            }
            ClientError::ApiError { status, message, .. } => {
                format!("Server rejected the request ({}): {}", status, message)
            }
            _ => self.display_message(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ClientError::TransportError(_) => {
                "Check that the backend is running and that --host / --base-url point at it"
            }
            ClientError::ApiError { status, .. } if *status == 404 => {
                "Run 'list' to see which files exist on the server"
            }
            ClientError::ApiError { status, .. } if *status >= 500 => {
                "Retry later or inspect the backend logs"
            }
            ClientError::ApiError { .. } => "Check the filename and the values you sent",
            ClientError::DecodeError(_) | ClientError::UnexpectedResponse { .. } => {
                "The server answered with an unexpected payload; check client and server versions"
            }
            ClientError::IoError(_) => "Check file paths and permissions",
            ClientError::ConfigValidationError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::MissingConfigError { .. } => "Fix the configuration file or CLI flags",
            ClientError::InvalidArgument { .. } => "Run with --help to see the expected arguments",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
