pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// general errors
    #[error("illegal state: {0}")]
    IllegalStateError(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("config file error: {0}")]
    ConfigFileError(#[from] ::config::ConfigError),

    /// marker error, the buffer does not hold a complete frame yet
    #[error("incomplete frame")]
    Incomplete,

    /// wire errors, always fatal to the connection
    #[error("framing error: {0}")]
    FramingError(String),

    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    #[error("timed out: {0}")]
    Timeout(String),

    /// handler errors
    #[error("game not found: {0}")]
    GameNotFound(String),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// structured error reply received by the client
    #[error("service replied with {kind}: {message}")]
    RemoteError { kind: String, message: String },
}

impl AppError {
    /// Stable tag used in log fields and in structured error replies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::IllegalStateError(_) => "illegal_state",
            AppError::InvalidValue(_) => "invalid_value",
            AppError::IoError(_) => "io",
            AppError::JsonError(_) => "json",
            AppError::ConfigFileError(_) => "config",
            AppError::Incomplete => "incomplete",
            AppError::FramingError(_) => "framing",
            AppError::ConnectionClosed(_) => "connection_closed",
            AppError::Timeout(_) => "timeout",
            AppError::GameNotFound(_) => "not_found",
            AppError::UnknownTask(_) => "unknown_task",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::RemoteError { .. } => "remote",
        }
    }

    /// Errors raised while handling a well-formed frame. These may be answered
    /// with an error reply; everything else tears the connection down.
    pub fn is_handler_error(&self) -> bool {
        matches!(
            self,
            AppError::GameNotFound(_) | AppError::UnknownTask(_) | AppError::InvalidRequest(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_errors_are_classified() {
        assert!(AppError::GameNotFound("x".into()).is_handler_error());
        assert!(AppError::UnknownTask("x".into()).is_handler_error());
        assert!(AppError::InvalidRequest("x".into()).is_handler_error());
        assert!(!AppError::FramingError("x".into()).is_handler_error());
        assert!(!AppError::Incomplete.is_handler_error());
    }

    #[test]
    fn kind_tags() {
        assert_eq!(AppError::GameNotFound("x".into()).kind(), "not_found");
        assert_eq!(AppError::FramingError("x".into()).kind(), "framing");
    }
}
