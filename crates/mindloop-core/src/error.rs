use thiserror::Error;

/// A convenience `Result` alias using [`MindloopError`].
pub type MindloopResult<T> = Result<T, MindloopError>;

/// Top-level error type for the Mindloop agent loop.
///
/// Each variant corresponds to one failure kind with its own recovery
/// policy: [`Backend`](MindloopError::Backend) and
/// [`Tool`](MindloopError::Tool) failures abort the owning job,
/// [`MalformedOutput`](MindloopError::MalformedOutput) is recovered at the
/// parsing boundary with a fallback value, and
/// [`Storage`](MindloopError::Storage) failures are logged and swallowed by
/// the memory store.
#[derive(Error, Debug)]
pub enum MindloopError {
    /// The text backend call itself failed (network, quota, timeout).
    #[error("Backend error: {0}")]
    Backend(String),

    /// The backend answered, but the text did not match the expected schema.
    #[error("Malformed backend output: {0}")]
    MalformedOutput(String),

    /// A tool invocation failed.
    #[error("Tool error: {0}")]
    Tool(String),

    /// The memory store or its vector backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the HTTP gateway layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// The owning job was cancelled.
    #[error("Job cancelled")]
    Cancelled,

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MindloopError::Backend("connection refused".into());
        assert_eq!(err.to_string(), "Backend error: connection refused");
        assert_eq!(MindloopError::Cancelled.to_string(), "Job cancelled");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json")
            .map_err(MindloopError::from)
            .unwrap_err();
        assert!(matches!(parse_err, MindloopError::Json(_)));
    }
}
