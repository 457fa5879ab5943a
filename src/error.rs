//! Unified error handling for the activity-metrics library.
//!
//! Derivations themselves never fail: a metric whose inputs are missing is
//! simply absent. Errors only exist at the edges of the crate, where JSON
//! payloads are parsed, configuration is validated, or a logbook goes through
//! the persistence collaborator.

use thiserror::Error;

/// Unified error type for activity-metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Payload could not be parsed as JSON
    #[error("Invalid {what} payload: {source}")]
    InvalidPayload {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// Payload parsed but has the wrong shape
    #[error("Malformed {what} payload: {message}")]
    MalformedPayload { what: &'static str, message: String },
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
    /// Logbook content rejected before saving
    #[error("Invalid logbook for session '{session_id}': {message}")]
    InvalidLogbook { session_id: String, message: String },
    /// Persistence collaborator failed
    #[error("Logbook store error: {message}")]
    Store { message: String },
    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MetricsError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        MetricsError::Config {
            message: message.into(),
        }
    }

    pub(crate) fn store(message: impl Into<String>) -> Self {
        MetricsError::Store {
            message: message.into(),
        }
    }
}

/// Result type alias for activity-metrics operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Extension trait for converting Option to MetricsError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a malformed payload error.
    fn ok_or_malformed(self, what: &'static str, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_malformed(self, what: &'static str, message: &str) -> Result<T> {
        self.ok_or_else(|| MetricsError::MalformedPayload {
            what,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MetricsError::InvalidLogbook {
            session_id: "s-42".to_string(),
            message: "effort rating 12 outside 1..=10".to_string(),
        };
        assert!(err.to_string().contains("s-42"));
        assert!(err.to_string().contains("effort rating 12"));
    }

    #[test]
    fn test_payload_error_keeps_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = MetricsError::InvalidPayload {
            what: "activity",
            source: parse,
        };
        assert!(err.to_string().starts_with("Invalid activity payload"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_malformed("logbook", "expected an object");
        assert!(matches!(
            result,
            Err(MetricsError::MalformedPayload { what: "logbook", .. })
        ));
    }
}
