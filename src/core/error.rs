//! Error types for the logging pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration document failed to parse as JSON
    #[error("configuration parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration schema version is not supported
    #[error("unsupported configuration version {0} (expected 1)")]
    UnsupportedVersion(u32),

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A logger references a handler that is not defined
    #[error("logger '{logger}' references undefined handler '{handler}'")]
    UnknownHandler { handler: String, logger: String },

    /// A handler references a formatter that is not defined
    #[error("handler '{handler}' references undefined formatter '{formatter}'")]
    UnknownFormatter { formatter: String, handler: String },

    /// Handlers are singly owned; one entry cannot serve two loggers
    #[error("handler '{handler}' is attached to more than one logger")]
    HandlerReused { handler: String },

    /// Writer error (generic)
    #[error("writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
