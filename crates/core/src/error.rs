/// Result alias that carries the custom [`DanceError`] type.
pub type Result<T> = std::result::Result<T, DanceError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum DanceError {
    /// Free-form failure raised by glue code such as lock handling.
    #[error("{0}")]
    Message(String),
    /// Input rejected at the ingestion boundary before it can reach the
    /// classifiers: malformed landmark frames, out-of-order timestamps or
    /// configuration values the timing arithmetic cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration documents that fail to parse.
    #[error("{0}")]
    Config(#[from] serde_json::Error),
}

impl DanceError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for DanceError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for DanceError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
