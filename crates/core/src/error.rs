//! Error taxonomy for the dual-agent engine.
//!
//! Configuration errors and transient generation errors are distinct variants so
//! callers can decide whether retrying a step makes sense.

use crate::llm_client::GenerationError;
use std::time::Duration;

/// Every failure the engine can surface to its caller.
#[derive(Debug, thiserror::Error)]
pub enum DuetError {
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("Unsupported learning mode: '{0}'")]
    UnsupportedLearningMode(String),

    #[error("Unsupported proficiency level: '{0}'")]
    UnsupportedProficiencyLevel(String),

    #[error("Unsupported session length: '{0}'")]
    UnsupportedSessionLength(String),

    #[error("Unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    #[error("Generation failed for {role}: {source}")]
    GenerationFailure {
        role: String,
        #[source]
        source: GenerationError,
    },

    #[error("Generation for {role} timed out after {elapsed:?}")]
    GenerationTimeout { role: String, elapsed: Duration },

    #[error("Translation failed: {0}")]
    TranslationFailure(#[source] GenerationError),

    #[error("Summary failed: {0}")]
    SummaryFailure(#[source] GenerationError),

    #[error("Session is closed")]
    SessionClosed,
}

impl DuetError {
    /// Maps a failed agent generation call, keeping timeouts distinguishable.
    pub(crate) fn from_generation(role: &str, err: GenerationError) -> Self {
        match err {
            GenerationError::Timeout(elapsed) => DuetError::GenerationTimeout {
                role: role.to_string(),
                elapsed,
            },
            source => DuetError::GenerationFailure {
                role: role.to_string(),
                source,
            },
        }
    }

    /// True for errors caused by the session configuration rather than by a backend.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DuetError::InvalidConfiguration { .. }
                | DuetError::UnsupportedLearningMode(_)
                | DuetError::UnsupportedProficiencyLevel(_)
                | DuetError::UnsupportedSessionLength(_)
                | DuetError::UnsupportedLanguage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DuetError::InvalidConfiguration {
            field: "scenario",
            reason: "must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'scenario': must not be empty"
        );
        assert_eq!(DuetError::SessionClosed.to_string(), "Session is closed");
    }

    #[test]
    fn test_timeout_is_kept_distinct() {
        let err =
            DuetError::from_generation("Baker", GenerationError::Timeout(Duration::from_secs(5)));
        assert!(matches!(err, DuetError::GenerationTimeout { ref role, .. } if role == "Baker"));

        let err = DuetError::from_generation("Baker", GenerationError::EmptyResponse);
        assert!(matches!(err, DuetError::GenerationFailure { .. }));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_configuration_errors_are_flagged() {
        assert!(DuetError::UnsupportedLanguage("Klingon".into()).is_configuration_error());
        assert!(DuetError::UnsupportedLearningMode("Lecture".into()).is_configuration_error());
        assert!(!DuetError::SessionClosed.is_configuration_error());
    }
}
