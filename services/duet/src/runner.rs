//! Drives a session from its first round to the closing summary.

use duet_core::{DualAgentSession, DuetError, Transcript};
use tracing::{info, instrument};

/// What a finished run hands to the renderer.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub role1: String,
    pub role2: String,
    pub transcript: Transcript,
    pub summary: Option<String>,
}

/// The headline printed above a failed run: bad parameters read differently
/// from a backend that gave up mid-session.
pub fn failure_headline(err: &DuetError) -> &'static str {
    if err.is_configuration_error() {
        "Invalid session parameters"
    } else {
        "Session failed"
    }
}

/// Steps the session `rounds` times (its exchange count by default), optionally
/// summarizes it, and closes it. The first failure ends the run.
#[instrument(skip_all, fields(rounds = tracing::field::Empty))]
pub async fn run_session(
    mut session: DualAgentSession,
    rounds: Option<usize>,
    summarize: bool,
) -> Result<SessionReport, DuetError> {
    let rounds = rounds.unwrap_or_else(|| session.exchange_count());
    tracing::Span::current().record("rounds", rounds);

    for round in 1..=rounds {
        session.step().await?;
        info!(round, of = rounds, "Round complete");
    }

    let summary = if summarize {
        Some(session.summarize().await?)
    } else {
        None
    };

    let (role1, role2) = session.role_names();
    let (role1, role2) = (role1.to_string(), role2.to_string());
    Ok(SessionReport {
        role1,
        role2,
        transcript: session.into_transcript(),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_core::llm_client::{GenerationError, OfflineClient};
    use duet_core::{
        Language, ProficiencyLevel, RawSessionConfig, RoleSpec, SessionConfig, SessionLength,
    };
    use std::sync::Arc;

    fn cafe() -> SessionConfig {
        SessionConfig::conversation(
            Language::Italian,
            ProficiencyLevel::Intermediate,
            SessionLength::Short,
            "in a café",
            RoleSpec::new("Tourist", "ordering coffee"),
            RoleSpec::new("Barista", "taking the order"),
        )
    }

    #[tokio::test]
    async fn test_runs_the_nominal_exchange_count() {
        let session = DualAgentSession::new(cafe(), Arc::new(OfflineClient)).unwrap();
        let report = run_session(session, None, true).await.unwrap();

        assert_eq!(report.transcript.len(), 8);
        assert_eq!(report.role1, "Tourist");
        assert_eq!(report.role2, "Barista");
        assert!(report.summary.is_some_and(|s| !s.is_empty()));
    }

    #[tokio::test]
    async fn test_round_override_and_no_summary() {
        let session = DualAgentSession::new(cafe(), Arc::new(OfflineClient)).unwrap();
        let report = run_session(session, Some(10), false).await.unwrap();

        assert_eq!(report.transcript.len(), 10);
        assert_eq!(report.summary, None);
    }

    #[test]
    fn test_failure_headline_separates_parameters_from_backend() {
        let raw = RawSessionConfig {
            learning_mode: "conversation".to_string(),
            language: "Klingon".to_string(),
            proficiency_level: "beginner".to_string(),
            session_length: "short".to_string(),
            scenario: "in a café".to_string(),
            role1_name: "Tourist".to_string(),
            role1_action: Some("ordering coffee".to_string()),
            role2_name: "Barista".to_string(),
            role2_action: Some("taking the order".to_string()),
        };
        let err = SessionConfig::try_from(raw).unwrap_err();
        assert_eq!(failure_headline(&err), "Invalid session parameters");

        let err = DuetError::TranslationFailure(GenerationError::EmptyResponse);
        assert_eq!(failure_headline(&err), "Session failed");
        assert_eq!(failure_headline(&DuetError::SessionClosed), "Session failed");
    }
}
