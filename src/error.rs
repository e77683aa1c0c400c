use std::fmt;

/// Result type for Mnemosyne operations
pub type Result<T> = std::result::Result<T, MnemosyneError>;

/// Main error type for the Mnemosyne library
#[derive(Debug, Clone)]
pub enum MnemosyneError {
    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Batch draw cannot terminate: fewer eligible indices than requested
    SamplerStarvation {
        requested: usize,
        eligible: usize,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for MnemosyneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MnemosyneError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            MnemosyneError::SamplerStarvation { requested, eligible } => {
                write!(
                    f,
                    "Sampler starvation: requested batch of {} but only {} indices are eligible",
                    requested, eligible
                )
            }
            MnemosyneError::IoError(msg) => write!(f, "IO error: {}", msg),
            MnemosyneError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for MnemosyneError {}

// Conversion from std::io::Error
impl From<std::io::Error> for MnemosyneError {
    fn from(err: std::io::Error) -> Self {
        MnemosyneError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for MnemosyneError {
    fn from(err: bincode::Error) -> Self {
        MnemosyneError::SerializationError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MnemosyneError {
    fn from(err: serde_json::Error) -> Self {
        MnemosyneError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl MnemosyneError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        MnemosyneError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
