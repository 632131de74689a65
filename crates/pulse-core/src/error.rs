/// Core error types for the Pulse player.

/// A specialized Result type for Pulse operations.
pub type PulseResult<T> = Result<T, PulseError>;

/// Top-level error type encompassing all Pulse subsystems.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("fetch error: frame {index} ({path}): {message}")]
    Fetch {
        index: usize,
        path: String,
        message: String,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("loader busy: batch {active:?} has not resolved")]
    LoaderBusy { active: std::ops::Range<usize> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl PulseError {
    /// Create a fetch error for a frame.
    pub fn fetch(index: usize, path: impl Into<String>, message: impl Into<String>) -> Self {
        PulseError::Fetch {
            index,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config validation error.
    pub fn config(message: impl Into<String>) -> Self {
        PulseError::InvalidConfig(message.into())
    }
}
