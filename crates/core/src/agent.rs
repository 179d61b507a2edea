//! Conversational Agent
//!
//! An agent pairs one role's compiled instruction with its own dialogue memory.
//! Memory is append-only and never shared with the other role.

use crate::error::DuetError;
use crate::llm_client::{LLMClient, Turn};
use std::sync::Arc;
use tracing::{debug, instrument};

/// One stateful side of the exchange.
pub struct Agent {
    /// Display name of the role this agent plays, used in logs and errors.
    name: String,
    instruction: String,
    is_starter: bool,
    memory: Vec<Turn>,
    /// When set, only the most recent turns are sent to the backend.
    memory_window: Option<usize>,
    client: Arc<dyn LLMClient>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        instruction: String,
        is_starter: bool,
        client: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction,
            is_starter,
            memory: Vec::new(),
            memory_window: None,
            client,
        }
    }

    /// Limits how many past turns accompany each generation call.
    pub fn with_memory_window(mut self, window: Option<usize>) -> Self {
        self.memory_window = window;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn is_starter(&self) -> bool {
        self.is_starter
    }

    pub fn memory(&self) -> &[Turn] {
        &self.memory
    }

    fn context(&self) -> &[Turn] {
        match self.memory_window {
            Some(window) if window < self.memory.len() => {
                &self.memory[self.memory.len() - window..]
            }
            _ => &self.memory,
        }
    }

    /// Generates a reply to `input` and records the exchange in memory.
    ///
    /// Memory is only extended once the backend has answered, so a failed call
    /// leaves the agent exactly as it was.
    #[instrument(skip_all, fields(role = %self.name, turn = self.memory.len() + 1))]
    pub async fn respond(&mut self, input: &str) -> Result<String, DuetError> {
        let output = self
            .client
            .generate(&self.instruction, self.context(), input)
            .await
            .map_err(|e| DuetError::from_generation(&self.name, e))?;

        debug!(chars = output.len(), "Agent responded");
        self.memory.push(Turn::new(input, output.clone()));
        Ok(output)
    }

    /// Drops the most recent turn. Used to undo a half-finished round.
    pub(crate) fn rollback_last_turn(&mut self) -> Option<Turn> {
        self.memory.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{GenerationError, MockLLMClient, OfflineClient};

    #[tokio::test]
    async fn test_respond_extends_memory() {
        let mut agent = Agent::new("Baker", "serve bread".into(), false, Arc::new(OfflineClient));

        let first = agent.respond("Bonjour").await.unwrap();
        let second = agent.respond("Une baguette, s'il vous plaît").await.unwrap();

        assert_eq!(first, "[turn 1] In reply to: Bonjour");
        assert!(second.starts_with("[turn 2]"));
        assert_eq!(
            agent.memory(),
            &[
                Turn::new("Bonjour", first),
                Turn::new("Une baguette, s'il vous plaît", second),
            ]
        );
    }

    #[tokio::test]
    async fn test_respond_sends_instruction_and_history() {
        let mut mock = MockLLMClient::new();
        mock.expect_generate()
            .withf(|instruction, history, input| {
                instruction == "fixed" && history.is_empty() && input == "hi"
            })
            .times(1)
            .returning(|_, _, _| Ok("salut".to_string()));
        mock.expect_generate()
            .withf(|instruction, history, input| {
                instruction == "fixed"
                    && history.len() == 1
                    && history[0] == Turn::new("hi", "salut")
                    && input == "ça va?"
            })
            .times(1)
            .returning(|_, _, _| Ok("oui".to_string()));

        let mut agent = Agent::new("Friend", "fixed".into(), true, Arc::new(mock));
        assert_eq!(agent.respond("hi").await.unwrap(), "salut");
        assert_eq!(agent.respond("ça va?").await.unwrap(), "oui");
        assert_eq!(agent.memory().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_leaves_memory_untouched() {
        let mut mock = MockLLMClient::new();
        mock.expect_generate()
            .returning(|_, _, _| Err(GenerationError::Other("quota exceeded".into())));

        let mut agent = Agent::new("Customer", "buy bread".into(), true, Arc::new(mock));
        let err = agent.respond("Start the conversation.").await.unwrap_err();

        assert!(matches!(err, DuetError::GenerationFailure { ref role, .. } if role == "Customer"));
        assert!(agent.memory().is_empty());
    }

    #[tokio::test]
    async fn test_memory_window_limits_context() {
        let mut mock = MockLLMClient::new();
        mock.expect_generate()
            .withf(|_, history, _| history.len() <= 1)
            .times(3)
            .returning(|_, _, input| Ok(format!("re: {input}")));

        let mut agent = Agent::new("Opponent", "argue".into(), false, Arc::new(mock))
            .with_memory_window(Some(1));
        for input in ["one", "two", "three"] {
            agent.respond(input).await.unwrap();
        }
        assert_eq!(agent.memory().len(), 3);
    }

    #[tokio::test]
    async fn test_rollback_removes_latest_turn() {
        let mut agent = Agent::new("Baker", "serve".into(), false, Arc::new(OfflineClient));
        agent.respond("a").await.unwrap();
        agent.respond("b").await.unwrap();

        let undone = agent.rollback_last_turn().unwrap();
        assert_eq!(undone.input, "b");
        assert_eq!(agent.memory().len(), 1);
    }
}
