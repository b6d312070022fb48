//! Error types for the stream operators.

use thiserror::Error;

use search_stream_repository::EngineError;

/// Errors surfaced by the stream operators.
///
/// Remote failures are propagated unmodified; this layer performs no retry
/// or backoff. End of pages and end of the intent source are normal
/// termination, never errors.
#[derive(Error, Debug)]
pub enum StreamError {
    /// A remote engine call failed.
    #[error("Remote engine error: {0}")]
    RemoteError(#[from] EngineError),

    /// An intent violated the serialization contract.
    ///
    /// Detected before any remote call is issued for the affected batch.
    #[error("Malformed {action} intent: {reason}")]
    MalformedIntent {
        /// The intent's action name.
        action: &'static str,
        /// What the intent got wrong.
        reason: String,
    },

    /// Stream configuration rejected before any work started.
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
}

impl StreamError {
    /// Create a malformed-intent error.
    pub fn malformed_intent(action: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedIntent {
            action,
            reason: reason.into(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StreamError::malformed_intent("delete", "unexpected payload");
        assert_eq!(err.to_string(), "Malformed delete intent: unexpected payload");

        let err = StreamError::from(EngineError::scroll("context expired"));
        assert_eq!(
            err.to_string(),
            "Remote engine error: Scroll error: context expired"
        );
    }
}
