//! Error types for the CAM tools crate.
//!
//! Box generation has exactly one failure mode: a supplied or derived value
//! violates a geometric precondition. It is reported once, before any path is
//! generated, naming the offending parameter.

use thiserror::Error;

/// Errors that can occur during CAM tool operations.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// A supplied or derived parameter violates a geometric precondition.
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CamToolError {
    pub fn invalid(name: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter, if any
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { name, .. } => Some(name),
            Self::SerializationError(_) => None,
        }
    }
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = CamToolError::invalid("x", -5.0, "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter 'x' = -5: must be positive");
        assert_eq!(err.parameter(), Some("x"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<f64>("not a number").unwrap_err();
        let err: CamToolError = json_err.into();
        assert!(matches!(err, CamToolError::SerializationError(_)));
        assert_eq!(err.parameter(), None);
    }
}
