//! Dual-Agent Session
//!
//! Owns the two agents and drives them in strict alternation: role1 always
//! speaks first in a round, role2 always answers role1's latest utterance, and
//! role1's next input is role2's previous answer.
//!
//! A round is atomic. If any call fails, agent memory written during the round
//! is rolled back and nothing is appended to the transcript, so the caller can
//! retry the step or abandon the session without corrupting either agent.

use crate::agent::Agent;
use crate::error::DuetError;
use crate::instruction::{InstructionParams, build_instruction};
use crate::llm_client::LLMClient;
use crate::session_config::SessionConfig;
use crate::summary::SummaryService;
use crate::transcript::{Transcript, TranscriptEntry};
use crate::translation::TranslationService;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Input given to role1 on the first round.
pub const BOOTSTRAP_INPUT: &str = "Start the conversation.";

/// Lifecycle of a session. `Uninitialized` is the state before `new` succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Stepping,
    Closed,
}

/// Deployment knobs that do not change the exchange itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Issue the two per-round translations concurrently.
    pub parallel_translations: bool,
    /// Past turns each agent sends with a generation call. `None` sends all.
    pub memory_window: Option<usize>,
}

pub struct DualAgentSession {
    config: SessionConfig,
    role1: Agent,
    role2: Agent,
    translator: TranslationService,
    summarizer: SummaryService,
    transcript: Transcript,
    /// Next input for role1.
    carry_input: String,
    state: SessionState,
    options: SessionOptions,
}

impl DualAgentSession {
    pub fn new(config: SessionConfig, client: Arc<dyn LLMClient>) -> Result<Self, DuetError> {
        Self::with_options(config, client, SessionOptions::default())
    }

    /// Validates the configuration and builds both agents.
    ///
    /// Role1 leads, role2 waits; each is told about the other as its opponent.
    pub fn with_options(
        config: SessionConfig,
        client: Arc<dyn LLMClient>,
        options: SessionOptions,
    ) -> Result<Self, DuetError> {
        let config = config.validate()?;

        let instruction_for = |is_starter: bool| {
            let (role, oppo_role) = if is_starter {
                (&config.role1, &config.role2)
            } else {
                (&config.role2, &config.role1)
            };
            build_instruction(&InstructionParams {
                role,
                oppo_role,
                language: config.language,
                scenario: &config.scenario,
                proficiency_level: config.proficiency_level,
                learning_mode: config.learning_mode,
                session_length: config.session_length,
                is_starter,
            })
        };

        let role1 = Agent::new(
            config.role1.name.clone(),
            instruction_for(true),
            true,
            client.clone(),
        )
        .with_memory_window(options.memory_window);
        let role2 = Agent::new(
            config.role2.name.clone(),
            instruction_for(false),
            false,
            client.clone(),
        )
        .with_memory_window(options.memory_window);

        info!(
            mode = %config.learning_mode,
            language = %config.language,
            level = %config.proficiency_level,
            exchanges = config.exchange_count(),
            "Dual-agent session ready"
        );

        Ok(Self {
            translator: TranslationService::new(client.clone()),
            summarizer: SummaryService::new(client),
            config,
            role1,
            role2,
            transcript: Transcript::new(),
            carry_input: BOOTSTRAP_INPUT.to_string(),
            state: SessionState::Ready,
            options,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn role1(&self) -> &Agent {
        &self.role1
    }

    pub fn role2(&self) -> &Agent {
        &self.role2
    }

    pub fn role_names(&self) -> (&str, &str) {
        (self.role1.name(), self.role2.name())
    }

    /// Advisory number of rounds for this configuration. Not enforced by `step`.
    pub fn exchange_count(&self) -> usize {
        self.config.exchange_count()
    }

    pub fn rounds_completed(&self) -> usize {
        self.transcript.len()
    }

    /// Runs one round: role1 speaks, role2 answers, both lines are translated.
    #[instrument(skip_all, fields(round = self.transcript.len() + 1))]
    pub async fn step(&mut self) -> Result<TranscriptEntry, DuetError> {
        if self.state == SessionState::Closed {
            return Err(DuetError::SessionClosed);
        }
        self.state = SessionState::Stepping;

        let role1_utterance = self.role1.respond(&self.carry_input).await?;

        let role2_utterance = match self.role2.respond(&role1_utterance).await {
            Ok(utterance) => utterance,
            Err(e) => {
                warn!(error = %e, "Round aborted, rolling back role1's turn");
                self.role1.rollback_last_turn();
                return Err(e);
            }
        };

        let translations = self.translate_pair(&role1_utterance, &role2_utterance).await;
        let (role1_translation, role2_translation) = match translations {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Round aborted, rolling back both turns");
                self.role1.rollback_last_turn();
                self.role2.rollback_last_turn();
                return Err(e);
            }
        };

        self.carry_input = role2_utterance.clone();
        let entry = TranscriptEntry {
            role1_utterance,
            role1_translation,
            role2_utterance,
            role2_translation,
        };
        self.transcript.push(entry.clone());

        if self.transcript.len() == self.exchange_count() {
            info!(rounds = self.transcript.len(), "Nominal exchange count reached");
        }
        Ok(entry)
    }

    async fn translate_pair(
        &self,
        first: &str,
        second: &str,
    ) -> Result<(String, String), DuetError> {
        let language = self.config.language;
        if self.options.parallel_translations {
            futures::future::try_join(
                self.translator.translate(first, language),
                self.translator.translate(second, language),
            )
            .await
        } else {
            let first = self.translator.translate(first, language).await?;
            let second = self.translator.translate(second, language).await?;
            Ok((first, second))
        }
    }

    /// The whole session as `"<role>: <utterance>"` lines.
    pub fn script_lines(&self) -> Vec<String> {
        let (role1, role2) = self.role_names();
        self.transcript.script_lines(role1, role2)
    }

    /// Summarizes the transcript so far for the session's language and level.
    pub async fn summarize(&self) -> Result<String, DuetError> {
        self.summarizer
            .summarize(
                &self.script_lines(),
                self.config.language,
                self.config.proficiency_level,
            )
            .await
    }

    /// Rejects any further `step`. The transcript stays readable.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            info!(rounds = self.transcript.len(), "Session closed");
            self.state = SessionState::Closed;
        }
    }

    /// Closes the session and hands the transcript to the caller.
    pub fn into_transcript(mut self) -> Transcript {
        self.close();
        self.transcript
    }
}
